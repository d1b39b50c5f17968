use avian3d::prelude::Gravity;
use bevy::prelude::{Res, Time, Vec3};

/// World state the locomotion updater reads each tick.
pub trait SceneClock {
    fn gravity(&self) -> Vec3;
    /// Elapsed seconds for the current fixed tick.
    fn tick_delta(&self) -> f32;
}

/// Snapshot of the physics world's gravity and the fixed-step delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsScene {
    pub gravity: Vec3,
    pub tick_delta: f32,
}

impl PhysicsScene {
    pub fn new(gravity: Vec3, tick_delta: f32) -> Self {
        Self {
            gravity,
            tick_delta,
        }
    }

    pub fn from_world(gravity: &Res<Gravity>, time: &Res<Time>) -> Self {
        Self::new(gravity.0, time.delta_secs())
    }
}

impl SceneClock for PhysicsScene {
    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn tick_delta(&self) -> f32 {
        self.tick_delta
    }
}
