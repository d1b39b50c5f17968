use avian3d::prelude::{Collider, RigidBody};
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::{
    GlobalAmbientLight, AnimationClip, AnimationGraph, App, AssetServer, Assets, Camera3d, Capsule3d, ChildOf, Color,
    Commands, Component, Cuboid, DirectionalLight, Entity, Handle, Mesh, Mesh3d, MeshMaterial3d, Name,
    Plugin, Quat, Res, ResMut, Resource, SceneRoot, StandardMaterial, Startup, Transform, Vec3,
    default, info,
};

use client::animation::{AnimationRig, PoseClips};
use shared::animation::LocomotionAnimator;
use shared::controller::{
    DEFAULT_JUMP_STRENGTH, DEFAULT_RUN_SPEED, DEFAULT_WALK_SPEED, PlayerController,
};
use shared::cosmetics::SkinnedModel;
use shared::movement::{CHARACTER_HEIGHT, CHARACTER_RADIUS, CharacterPhysicsBundle};

use crate::DEFAULT_EYE_HEIGHT;

pub const FLOOR_THICKNESS: f32 = 10.0;
pub const FLOOR_SIZE: f32 = 4000.0;

/// Distance from the capsule center to its lowest point.
pub const CHARACTER_HALF_EXTENT: f32 = CHARACTER_HEIGHT / 2.0 + CHARACTER_RADIUS;

/// Height above the floor the player drops in from.
const SPAWN_DROP: f32 = 8.0;

#[derive(Component, Clone, Copy, Debug)]
pub struct Floor;

#[derive(Component, Clone, Copy, Debug)]
pub struct PlayerCamera;

/// Tuning and placement of the demo player.
#[derive(Resource, Clone, Debug)]
pub struct PlayerSpawn {
    pub position: Vec3,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_strength: f32,
    /// Eye height above the feet.
    pub eye_height: f32,
    /// glTF file with the player's skinned model and its locomotion clips.
    pub model: Option<String>,
}

impl Default for PlayerSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::Y * (CHARACTER_HALF_EXTENT + SPAWN_DROP),
            walk_speed: DEFAULT_WALK_SPEED,
            run_speed: DEFAULT_RUN_SPEED,
            jump_strength: DEFAULT_JUMP_STRENGTH,
            eye_height: DEFAULT_EYE_HEIGHT,
            model: None,
        }
    }
}

impl PlayerSpawn {
    /// Eye pivot relative to the capsule center.
    pub fn eye_position(&self) -> Vec3 {
        Vec3::Y * (self.eye_height - CHARACTER_HALF_EXTENT)
    }
}

pub struct DemoLevelPlugin;

impl Plugin for DemoLevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSpawn>();
        app.add_systems(Startup, (setup_demo_level, spawn_player));
    }
}

pub fn setup_demo_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let mut floor = commands.spawn((
        Name::new("Floor"),
        Floor,
        Transform::from_xyz(0.0, -FLOOR_THICKNESS / 2.0, 0.0),
        RigidBody::Static,
        Collider::cuboid(FLOOR_SIZE, FLOOR_THICKNESS, FLOOR_SIZE),
    ));

    // Materials only exist when rendering
    if let Some(ref mut materials) = materials {
        floor.insert((
            Mesh3d(meshes.add(Cuboid::new(FLOOR_SIZE, FLOOR_THICKNESS, FLOOR_SIZE))),
            MeshMaterial3d(materials.add(Color::srgb(0.35, 0.4, 0.35))),
        ));

        commands.insert_resource(GlobalAmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
            affects_lightmapped_meshes: true,
        });
        commands.spawn((
            Name::new("Sun"),
            DirectionalLight {
                illuminance: 8000.0,
                shadows_enabled: true,
                ..default()
            },
            Transform::from_xyz(400.0, 800.0, 200.0).looking_at(Vec3::ZERO, Vec3::Y),
        ));
    }
}

pub fn spawn_player(
    mut commands: Commands,
    spawn: Res<PlayerSpawn>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let eye_position = spawn.eye_position();

    // The camera sits on the eye pivot so the orbit only rotates it.
    let camera = commands
        .spawn((
            Name::new("PlayerCamera"),
            PlayerCamera,
            Transform::from_translation(eye_position),
        ))
        .id();

    let controller = PlayerController::default()
        .with_camera(camera)
        .with_tuning(spawn.walk_speed, spawn.run_speed, spawn.jump_strength)
        .with_eye_position(eye_position);

    let player = commands
        .spawn((
            Name::new("Player"),
            controller,
            CharacterPhysicsBundle::default(),
            LocomotionAnimator::default(),
            Transform::from_translation(spawn.position),
        ))
        .id();
    commands.entity(camera).insert(ChildOf(player));

    let Some(ref mut materials) = materials else {
        info!("Spawned headless player {:?} at {}", player, spawn.position);
        return;
    };
    commands.entity(camera).insert(Camera3d::default());

    match &spawn.model {
        Some(path) => {
            spawn_player_model(&mut commands, &asset_server, &mut graphs, player, path);
            info!("Spawned player {:?} with model {}", player, path);
        }
        None => {
            commands.entity(player).insert((
                Mesh3d(meshes.add(Capsule3d::new(CHARACTER_RADIUS, CHARACTER_HEIGHT))),
                MeshMaterial3d(materials.add(Color::srgb(0.8, 0.7, 0.6))),
            ));
            info!("Spawned player {:?} with capsule body", player);
        }
    }
}

/// Attach a skinned model scene and its locomotion clips (idle, walk, run, jump, fall).
fn spawn_player_model(
    commands: &mut Commands,
    asset_server: &AssetServer,
    graphs: &mut Assets<AnimationGraph>,
    player: Entity,
    path: &str,
) {
    let clip = |index: usize| -> Handle<AnimationClip> {
        asset_server.load(GltfAssetLabel::Animation(index).from_asset(path.to_string()))
    };
    let rig = AnimationRig::from_clips(
        graphs,
        PoseClips {
            idle: clip(0),
            walk: clip(1),
            run: clip(2),
            jump: clip(3),
            fall: clip(4),
        },
    );
    commands.entity(player).insert(rig);

    commands.spawn((
        Name::new("PlayerModel"),
        SkinnedModel,
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.to_string()))),
        // Models face +Z, the controller walks toward -Z
        Transform::from_xyz(0.0, -CHARACTER_HALF_EXTENT, 0.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
        ChildOf(player),
    ));
}
