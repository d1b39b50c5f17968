//! Physics-backed character body implementing the locomotion collaborator.

use avian3d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const CHARACTER_RADIUS: f32 = 16.0;
/// Length of the capsule's cylindrical segment.
pub const CHARACTER_HEIGHT: f32 = 40.0;
pub const DEFAULT_ACCELERATION: f32 = 10.0;
pub const STOP_SPEED: f32 = 140.0;
pub const GROUND_ANGLE_DEGREES: f32 = 45.0;
pub const GROUNDED_DISTANCE: f32 = 2.0;
/// Upward speed above which a ground contact no longer counts as standing.
pub const GROUND_RELEASE_SPEED: f32 = 40.0;
pub const MAX_SPEED: f32 = 3000.0;
const FRICTION_SPEED_CUTOFF: f32 = 0.01;

/// Locomotion collaborator consumed by the player controller.
pub trait Locomotion {
    fn is_grounded(&self) -> bool;
    /// Accelerate toward `wish_velocity` at the current acceleration rate.
    fn accelerate(&mut self, wish_velocity: Vec3);
    fn set_acceleration_rate(&mut self, rate: f32);
    fn apply_friction(&mut self, amount: f32);
    /// Instantaneous velocity change, leaves the ground.
    fn apply_impulse(&mut self, impulse: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    /// Finish the tick's movement and hand the velocity to the solver.
    fn resolve_move(&mut self);
}

/// Ground detection state - separated for testability
#[derive(Reflect, Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct GroundState {
    pub is_grounded: bool,
    pub ground_normal: Vec3,
    pub ground_distance: f32,
}

#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CharacterBody {
    pub velocity: Vec3,
    pub acceleration: f32,
    pub stop_speed: f32,
    /// Steepest walkable slope, in degrees.
    pub ground_angle: f32,
    pub grounded_distance: f32,
    pub max_speed: f32,
    pub ground: GroundState,
    #[serde(skip)]
    pub tick_delta: f32,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            acceleration: DEFAULT_ACCELERATION,
            stop_speed: STOP_SPEED,
            ground_angle: GROUND_ANGLE_DEGREES,
            grounded_distance: GROUNDED_DISTANCE,
            max_speed: MAX_SPEED,
            ground: GroundState::default(),
            tick_delta: 0.0,
        }
    }
}

impl CharacterBody {
    pub fn with_tick_delta(mut self, tick_delta: f32) -> Self {
        self.tick_delta = tick_delta;
        self
    }

    /// Minimum `normal.y` a surface needs to be walkable.
    pub fn traction_normal_cutoff(&self) -> f32 {
        self.ground_angle.to_radians().cos()
    }

    pub fn set_ground(&mut self, ground: GroundState) {
        self.ground = ground;
    }
}

/// Calculate acceleration for desired movement direction
pub fn calculate_acceleration(
    wish_direction: Vec3,
    wish_speed: f32,
    acceleration: f32,
    current_velocity: Vec3,
    dt: f32,
) -> Vec3 {
    let velocity_projection = Vec3::dot(current_velocity, wish_direction);
    let add_speed = wish_speed - velocity_projection;

    if add_speed <= 0.0 {
        return Vec3::ZERO;
    }

    let acceleration_speed = (acceleration * wish_speed * dt).min(add_speed);
    wish_direction * acceleration_speed
}

/// Scale velocity down by friction, never reversing it.
pub fn apply_friction_to(velocity: Vec3, friction: f32, stop_speed: f32, dt: f32) -> Vec3 {
    let speed = velocity.length();
    if speed < FRICTION_SPEED_CUTOFF {
        return velocity;
    }

    let control = speed.max(stop_speed);
    let drop = control * friction * dt;
    let new_speed = (speed - drop).max(0.0) / speed;
    velocity * new_speed
}

pub fn remove_ground_penetration(velocity: Vec3, ground_normal: Vec3) -> Vec3 {
    let into_ground = Vec3::dot(velocity, ground_normal);
    if into_ground < 0.0 {
        velocity - into_ground * ground_normal
    } else {
        velocity
    }
}

pub fn clamp_max_velocity(velocity: Vec3, max_velocity: f32) -> Vec3 {
    velocity.clamp_length_max(max_velocity)
}

impl Locomotion for CharacterBody {
    fn is_grounded(&self) -> bool {
        self.ground.is_grounded
    }

    fn accelerate(&mut self, wish_velocity: Vec3) {
        let wish_speed = wish_velocity.length();
        if wish_speed <= f32::EPSILON {
            return;
        }
        let wish_direction = wish_velocity / wish_speed;
        self.velocity += calculate_acceleration(
            wish_direction,
            wish_speed,
            self.acceleration,
            self.velocity,
            self.tick_delta,
        );
    }

    fn set_acceleration_rate(&mut self, rate: f32) {
        self.acceleration = rate;
    }

    fn apply_friction(&mut self, amount: f32) {
        self.velocity = apply_friction_to(self.velocity, amount, self.stop_speed, self.tick_delta);
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.ground.is_grounded = false;
        self.velocity += impulse;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn resolve_move(&mut self) {
        if self.ground.is_grounded {
            self.velocity = remove_ground_penetration(self.velocity, self.ground.ground_normal);
        }
        self.velocity = clamp_max_velocity(self.velocity, self.max_speed);
    }
}

pub fn detect_ground(
    entity: Entity,
    body: &CharacterBody,
    collider: &Collider,
    position: Vec3,
    rotation: Quat,
    spatial_query: &SpatialQuery,
) -> GroundState {
    let filter = SpatialQueryFilter::default().with_excluded_entities([entity]);

    let Some(hit) = spatial_query.cast_shape(
        collider,
        position,
        rotation,
        Dir3::NEG_Y,
        &ShapeCastConfig::from_max_distance(body.grounded_distance),
        &filter,
    ) else {
        return GroundState::default();
    };

    let has_traction = Vec3::dot(hit.normal1, Vec3::Y) >= body.traction_normal_cutoff();
    let rising = body.velocity.y > GROUND_RELEASE_SPEED;

    GroundState {
        is_grounded: has_traction && !rising,
        ground_normal: hit.normal1,
        ground_distance: hit.distance,
    }
}

/// System: pull the solver's velocity back into each body and refresh its ground state.
pub fn sync_character_bodies(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut query: Query<(
        Entity,
        &Position,
        &Rotation,
        &Collider,
        &LinearVelocity,
        &mut CharacterBody,
    )>,
) {
    let dt = time.delta_secs();

    for (entity, position, rotation, collider, linear_velocity, mut body) in query.iter_mut() {
        body.tick_delta = dt;
        body.velocity = linear_velocity.0;

        let ground = detect_ground(entity, &body, collider, position.0, rotation.0, &spatial_query);
        if ground.is_grounded != body.ground.is_grounded {
            debug!(
                "{:?} grounded changed to {} (distance {:.2})",
                entity, ground.is_grounded, ground.ground_distance
            );
        }
        body.set_ground(ground);
    }
}

/// System: hand the resolved velocity to the physics solver.
pub fn write_character_velocity(mut query: Query<(&CharacterBody, &mut LinearVelocity)>) {
    for (body, mut linear_velocity) in query.iter_mut() {
        linear_velocity.0 = body.velocity;
    }
}

#[derive(Bundle)]
pub struct CharacterPhysicsBundle {
    pub rigid_body: RigidBody,
    pub collider: Collider,
    pub mass: Mass,
    pub restitution: Restitution,
    pub friction: Friction,
    pub linear_damping: LinearDamping,
    pub gravity_scale: GravityScale,
    pub locked_axes: LockedAxes,
    /// Smooths translation between fixed ticks. Rotation is left out, the look
    /// system writes it every frame.
    pub interpolation: TranslationInterpolation,
    pub body: CharacterBody,
}

impl Default for CharacterPhysicsBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            collider: Collider::capsule(CHARACTER_RADIUS, CHARACTER_HEIGHT),
            mass: Mass(80.0),
            restitution: Restitution::ZERO,
            // Friction and gravity are applied by the controller, not the solver.
            friction: Friction::ZERO,
            linear_damping: LinearDamping(0.0),
            gravity_scale: GravityScale(0.0),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            interpolation: TranslationInterpolation,
            body: CharacterBody::default(),
        }
    }
}
