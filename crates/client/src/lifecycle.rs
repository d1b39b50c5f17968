use bevy::prelude::{
    Added, App, ChildOf, Entity, Plugin, PreUpdate, Query, Transform, With, debug, info,
};

use shared::controller::PlayerController;
use shared::cosmetics::SkinnedModel;

use crate::cosmetics::SceneCosmetics;

pub struct ClientLifecyclePlugin;

impl Plugin for ClientLifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, start_player_controllers);
    }
}

/// The player's skinned model: the player itself or one of its direct children.
pub fn find_skinned_model(
    player: Entity,
    models: &Query<(Entity, Option<&ChildOf>), With<SkinnedModel>>,
) -> Option<Entity> {
    if models.contains(player) {
        return Some(player);
    }
    models
        .iter()
        .find(|(_, child_of)| child_of.is_some_and(|child_of| child_of.parent() == player))
        .map(|(model, _)| model)
}

/// Run start-up once for every newly added controller, before its first tick or frame.
pub fn start_player_controllers(
    mut players: Query<(Entity, &mut PlayerController), Added<PlayerController>>,
    transforms: Query<&Transform>,
    models: Query<(Entity, Option<&ChildOf>), With<SkinnedModel>>,
    mut cosmetics: SceneCosmetics,
) {
    for (player, mut controller) in players.iter_mut() {
        let camera_transform = controller
            .camera
            .and_then(|camera| transforms.get(camera).ok());
        let model = find_skinned_model(player, &models);

        controller.on_start(camera_transform, model, &mut cosmetics);

        if controller.orbit_enabled() {
            info!("Player {:?} captured camera orbit reference", player);
        } else {
            debug!("Player {:?} has no camera, orbit disabled", player);
        }
    }
}
