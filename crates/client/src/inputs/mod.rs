pub mod input;
pub mod window;

use bevy::prelude::{App, Plugin, Update};

use crate::Headless;
use crate::inputs::window::{grab_cursor, handle_focus_change, toggle_cursor_grab};

pub struct ClientInputPlugin;

impl Plugin for ClientInputPlugin {
    fn build(&self, app: &mut App) {
        let is_headless = app
            .world()
            .get_resource::<Headless>()
            .is_some_and(|headless| headless.0);

        app.add_observer(grab_cursor);

        // Cursor and focus handling need a window
        if !is_headless {
            app.add_systems(Update, (toggle_cursor_grab, handle_focus_change));
        }
    }
}
