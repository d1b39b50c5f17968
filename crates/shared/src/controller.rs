//! First-person player controller.
//!
//! Two update paths are driven by the host at different cadences:
//! [`PlayerController::on_frame`] once per rendered frame for look and camera,
//! and [`PlayerController::on_tick`] once per fixed tick for locomotion.
//! Collaborators are passed in explicitly so both paths run without an engine.

use bevy::prelude::{Component, Entity, Quat, Reflect, Transform, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::angles::EyeAngles;
use crate::animation::AnimationSink;
use crate::cosmetics::CosmeticsLoader;
use crate::inputs::input::{PlayerAction, PlayerInput};
use crate::inputs::look::PITCH_LIMIT_DEGREES;
use crate::movement::Locomotion;
use crate::scene::SceneClock;

pub const DEFAULT_WALK_SPEED: f32 = 120.0;
pub const DEFAULT_RUN_SPEED: f32 = 320.0;
pub const DEFAULT_JUMP_STRENGTH: f32 = 400.0;

pub const GROUND_ACCELERATION: f32 = 10.0;
pub const AIR_ACCELERATION: f32 = 5.0;
pub const GROUND_FRICTION: f32 = 5.0;

/// Radius of the eye pivot gizmo.
pub const EYE_GIZMO_RADIUS: f32 = 10.0;

#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlayerController {
    /// Camera entity, expected to be a child of the player so its transform is local.
    #[serde(skip)]
    pub camera: Option<Entity>,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_strength: f32,
    /// Where the camera rotates around the player.
    pub eye_position: Vec3,
    pub eye_angles: EyeAngles,
    #[serde(skip)]
    pub(crate) initial_camera_transform: Option<Transform>,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            camera: None,
            walk_speed: DEFAULT_WALK_SPEED,
            run_speed: DEFAULT_RUN_SPEED,
            jump_strength: DEFAULT_JUMP_STRENGTH,
            eye_position: Vec3::ZERO,
            eye_angles: EyeAngles::ZERO,
            initial_camera_transform: None,
        }
    }
}

/// What a locomotion tick did, for tracing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionTick {
    pub grounded: bool,
    pub jumped: bool,
    pub wish_velocity: Vec3,
}

/// Camera pose for `angles` orbiting `reference` around `pivot`.
///
/// Yaw is dropped: the body already carries it, so only pitch and roll orbit.
pub fn orbit_camera(reference: Transform, pivot: Vec3, angles: EyeAngles) -> Transform {
    let mut transform = reference;
    transform.rotate_around(pivot, angles.with_yaw(0.0).to_quat());
    transform
}

/// Desired velocity in world space: `x` strafes right, `y` walks forward (-Z).
pub fn wish_velocity(move_input: Vec2, speed: f32, facing: Quat) -> Vec3 {
    let local = Vec3::new(move_input.x, 0.0, -move_input.y).normalize_or_zero();
    facing * (local * speed)
}

impl PlayerController {
    pub fn with_camera(mut self, camera: Entity) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_tuning(mut self, walk_speed: f32, run_speed: f32, jump_strength: f32) -> Self {
        self.walk_speed = walk_speed;
        self.run_speed = run_speed;
        self.jump_strength = jump_strength;
        self
    }

    pub fn with_eye_position(mut self, eye_position: Vec3) -> Self {
        self.eye_position = eye_position;
        self
    }

    pub fn initial_camera_transform(&self) -> Option<Transform> {
        self.initial_camera_transform
    }

    /// Whether the camera orbit reference was captured on start.
    pub fn orbit_enabled(&self) -> bool {
        self.initial_camera_transform.is_some()
    }

    pub fn target_speed(&self, input: &dyn PlayerInput) -> f32 {
        if input.is_held(PlayerAction::Run) {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Capture the camera's local pose as the orbit reference and dress the model.
    ///
    /// Without a camera nothing happens and the orbit stays disabled for good.
    pub fn on_start(
        &mut self,
        camera_transform: Option<&Transform>,
        model: Option<Entity>,
        cosmetics: &mut dyn CosmeticsLoader,
    ) {
        if self.camera.is_none() {
            return;
        }
        let Some(camera_transform) = camera_transform else {
            return;
        };
        self.initial_camera_transform = Some(*camera_transform);

        if let Some(model) = model {
            let set = cosmetics.load_for_current_user();
            cosmetics.apply(&set, model);
        }
    }

    /// Per-frame look update: accumulate, clamp, turn the body, orbit the camera.
    pub fn on_frame(
        &mut self,
        input: &dyn PlayerInput,
        body: &mut Transform,
        camera: Option<&mut Transform>,
    ) {
        self.eye_angles += input.look_delta();
        self.eye_angles = self.eye_angles.clamp_pitch(PITCH_LIMIT_DEGREES);
        body.rotation = self.eye_angles.yaw_rotation();

        if let (Some(camera), Some(reference)) = (camera, self.initial_camera_transform) {
            *camera = orbit_camera(reference, self.eye_position, self.eye_angles);
        }
    }

    /// Per-tick locomotion update. Returns `None` when no locomotion is attached.
    pub fn on_tick(
        &self,
        input: &dyn PlayerInput,
        scene: &dyn SceneClock,
        facing: Quat,
        locomotion: Option<&mut dyn Locomotion>,
        mut animator: Option<&mut dyn AnimationSink>,
    ) -> Option<LocomotionTick> {
        let locomotion = locomotion?;

        let speed = self.target_speed(input);
        let wish = wish_velocity(input.move_vector(), speed, facing);
        locomotion.accelerate(wish);

        let grounded = locomotion.is_grounded();
        let mut jumped = false;
        if grounded {
            locomotion.set_acceleration_rate(GROUND_ACCELERATION);
            locomotion.apply_friction(GROUND_FRICTION);

            if input.was_pressed(PlayerAction::Jump) {
                locomotion.apply_impulse(Vec3::Y * self.jump_strength);
                jumped = true;

                if let Some(animator) = animator.as_deref_mut() {
                    animator.trigger_jump();
                }
            }
        } else {
            locomotion.set_acceleration_rate(AIR_ACCELERATION);
            let velocity = locomotion.velocity() + scene.gravity() * scene.tick_delta();
            locomotion.set_velocity(velocity);
        }

        locomotion.resolve_move();

        if let Some(animator) = animator {
            animator.set_grounded(locomotion.is_grounded());
            animator.set_velocity(locomotion.velocity());
        }

        Some(LocomotionTick {
            grounded,
            jumped,
            wish_velocity: wish,
        })
    }
}
