use bevy::prelude::*;
use bevy_inspector_egui::{bevy_egui::EguiPlugin, quick::WorldInspectorPlugin};

use shared::controller::{EYE_GIZMO_RADIUS, PlayerController};

use crate::Headless;

pub struct ClientDebugPlugin;

impl Plugin for ClientDebugPlugin {
    fn build(&self, app: &mut App) {
        let is_headless = app
            .world()
            .get_resource::<Headless>()
            .is_some_and(|headless| headless.0);

        app.init_resource::<DebugGizmoSettings>();

        // Gizmos and the inspector need a renderer
        if !is_headless {
            app.add_systems(Update, (toggle_debug_gizmos, draw_eye_gizmos).chain());
            app.add_plugins((EguiPlugin::default(), WorldInspectorPlugin::default()));
        }
    }
}

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct DebugGizmoSettings {
    pub enabled: bool,
    pub color: Color,
    pub toggle_key: KeyCode,
}

impl Default for DebugGizmoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Color::srgb(1.0, 1.0, 0.0), // Yellow
            toggle_key: KeyCode::F3,
        }
    }
}

/// World-space position of a player's eye pivot.
pub fn eye_pivot_world(transform: &GlobalTransform, eye_position: Vec3) -> Vec3 {
    transform.transform_point(eye_position)
}

fn toggle_debug_gizmos(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut settings: ResMut<DebugGizmoSettings>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(settings.toggle_key) {
        settings.enabled = !settings.enabled;
        info!("Eye pivot gizmos {}", if settings.enabled { "on" } else { "off" });
    }
}

/// Debug system drawing the eye pivot the camera orbits around
fn draw_eye_gizmos(
    settings: Res<DebugGizmoSettings>,
    players: Query<(&GlobalTransform, &PlayerController)>,
    mut gizmos: Gizmos,
) {
    if !settings.enabled {
        return;
    }

    for (transform, controller) in players.iter() {
        let pivot = eye_pivot_world(transform, controller.eye_position);
        gizmos.sphere(
            Isometry3d::new(pivot, transform.rotation()),
            EYE_GIZMO_RADIUS,
            settings.color,
        );
    }
}
