pub mod animation;
pub mod cosmetics;
pub mod debug;
pub mod inputs;
pub mod lifecycle;

use bevy::prelude::{App, Plugin, Resource};

use crate::{
    animation::ClientAnimationPlugin, debug::ClientDebugPlugin, inputs::ClientInputPlugin,
    lifecycle::ClientLifecyclePlugin,
};

#[derive(Resource)]
pub struct Headless(pub bool);

pub struct ClientPlugin;

impl Plugin for ClientPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ClientInputPlugin);
        app.add_plugins(ClientLifecyclePlugin);
        app.add_plugins(ClientAnimationPlugin);
        app.add_plugins(ClientDebugPlugin);
    }
}
