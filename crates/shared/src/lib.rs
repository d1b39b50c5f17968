pub mod angles;
pub mod animation;
pub mod controller;
pub mod cosmetics;
pub mod inputs;
pub mod movement;
pub mod scene;
pub mod systems;


use avian3d::prelude::PhysicsPlugins;

use bevy::prelude::Plugin;

pub const FIXED_TIMESTEP_HZ: f64 = 60.0;

pub struct SharedPlugin;
impl Plugin for SharedPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.add_plugins(inputs::SharedInputPlugin);
        app.add_plugins(PhysicsPlugins::default());
        app.add_plugins(systems::PlayerControllerPlugin);
    }
}
