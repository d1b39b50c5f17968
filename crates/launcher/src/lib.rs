pub mod level;
pub mod native;

use std::path::PathBuf;
use std::time::Duration;

use avian3d::collision::CollisionDiagnostics;
use avian3d::dynamics::solver::SolverDiagnostics;
use avian3d::prelude::Gravity;
use avian3d::spatial_query::SpatialQueryDiagnostics;
use bevy::log::LogPlugin;
use bevy::prelude::{
    App, AssetPlugin, DefaultPlugins, Fixed, MinimalPlugins, PluginGroup, Time, Vec3, Window,
    WindowPlugin, default,
};
use bevy::time::TimeUpdateStrategy;
use bevy::window::PresentMode;

use client::{ClientPlugin, Headless};
use shared::SharedPlugin;
use shared::controller::{DEFAULT_JUMP_STRENGTH, DEFAULT_RUN_SPEED, DEFAULT_WALK_SPEED};
use shared::cosmetics::LocalUserLoadout;
use shared::inputs::look::LookSettings;

use crate::level::{DemoLevelPlugin, PlayerSpawn};

pub const DEFAULT_GRAVITY: f32 = 800.0;
pub const DEFAULT_EYE_HEIGHT: f32 = 64.0;

const LOG_FILTER: &str = "wgpu=error,naga=warn,bevy_render=info,avian3d=info";

/// Everything the launcher needs to assemble an app.
#[derive(Clone, Debug)]
pub struct LaunchSettings {
    pub headless: bool,
    /// Install a `LogPlugin`. Tests leave this off, only one global logger may exist.
    pub log: bool,
    /// Advance time by exactly one fixed step per update instead of the wall clock.
    pub fixed_step_updates: bool,
    pub asset_path: String,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_strength: f32,
    pub eye_height: f32,
    pub gravity: f32,
    pub look: LookSettings,
    pub loadout: Option<PathBuf>,
    pub model: Option<String>,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            headless: false,
            log: true,
            fixed_step_updates: false,
            asset_path: "assets".to_string(),
            walk_speed: DEFAULT_WALK_SPEED,
            run_speed: DEFAULT_RUN_SPEED,
            jump_strength: DEFAULT_JUMP_STRENGTH,
            eye_height: DEFAULT_EYE_HEIGHT,
            gravity: DEFAULT_GRAVITY,
            look: LookSettings::default(),
            loadout: None,
            model: None,
        }
    }
}

pub fn create_app(settings: &LaunchSettings) -> App {
    let mut app = App::new();
    app.insert_resource(Headless(settings.headless));

    if settings.headless {
        app.add_plugins(MinimalPlugins);
        if settings.log {
            app.add_plugins(LogPlugin {
                filter: LOG_FILTER.to_string(),
                ..default()
            });
        }
        app.add_plugins(bevy::transform::TransformPlugin);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(bevy::diagnostic::DiagnosticsPlugin);
        app.add_plugins(AssetPlugin {
            file_path: settings.asset_path.clone(),
            ..default()
        });
        app.add_plugins(bevy::scene::ScenePlugin);
        app.add_plugins(bevy::mesh::MeshPlugin);
        app.add_plugins(bevy::animation::AnimationPlugin);

        // Avian reports into these even without a diagnostics overlay
        app.insert_resource(CollisionDiagnostics::default());
        app.insert_resource(SolverDiagnostics::default());
        app.insert_resource(SpatialQueryDiagnostics::default());
    } else {
        let plugins = DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Player Controller".to_string(),
                    resolution: (1280, 720).into(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: settings.asset_path.clone(),
                ..default()
            });

        if settings.log {
            app.add_plugins(plugins.set(LogPlugin {
                filter: LOG_FILTER.to_string(),
                ..default()
            }));
        } else {
            app.add_plugins(plugins.disable::<LogPlugin>());
        }
    }

    let tick = Duration::from_secs_f64(1.0 / shared::FIXED_TIMESTEP_HZ);
    app.insert_resource(Time::<Fixed>::from_duration(tick));
    if settings.fixed_step_updates {
        app.insert_resource(TimeUpdateStrategy::ManualDuration(tick));
    }

    app.add_plugins(SharedPlugin);
    app.add_plugins(ClientPlugin);

    app.insert_resource(Gravity(Vec3::NEG_Y * settings.gravity));
    app.insert_resource(settings.look.clone());
    app.insert_resource(match &settings.loadout {
        Some(path) => LocalUserLoadout::new(path.clone()),
        None => LocalUserLoadout::default(),
    });

    app.insert_resource(PlayerSpawn {
        walk_speed: settings.walk_speed,
        run_speed: settings.run_speed,
        jump_strength: settings.jump_strength,
        eye_height: settings.eye_height,
        model: settings.model.clone(),
        ..default()
    });
    app.add_plugins(DemoLevelPlugin);

    app
}
