use bevy::prelude::Plugin;
use leafwing_input_manager::plugin::InputManagerPlugin;

use crate::inputs::{input::PlayerAction, look::LookSettings};

pub mod input;
pub mod look;

pub struct SharedInputPlugin;

impl Plugin for SharedInputPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.add_plugins(InputManagerPlugin::<PlayerAction>::default());
        app.init_resource::<LookSettings>();
    }
}
