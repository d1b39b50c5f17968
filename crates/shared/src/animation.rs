use bevy::prelude::{Component, Reflect, Vec3};
use serde::{Deserialize, Serialize};

/// Animation collaborator consumed by the player controller.
pub trait AnimationSink {
    fn set_grounded(&mut self, grounded: bool);
    fn set_velocity(&mut self, velocity: Vec3);
    fn trigger_jump(&mut self);
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Reflect, Serialize, Deserialize, Default)]
pub enum LocomotionPose {
    #[default]
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
}

/// Animation parameters reported by the controller every tick.
#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LocomotionAnimator {
    pub is_grounded: bool,
    pub velocity: Vec3,
    /// Jump triggers not yet consumed by the animation driver.
    pub pending_jumps: u32,
    /// Horizontal speed above which the walk cycle plays.
    pub walk_threshold: f32,
    /// Horizontal speed above which the run cycle plays.
    pub run_threshold: f32,
}

impl Default for LocomotionAnimator {
    fn default() -> Self {
        Self {
            is_grounded: true,
            velocity: Vec3::ZERO,
            pending_jumps: 0,
            walk_threshold: 10.0,
            run_threshold: 200.0,
        }
    }
}

impl LocomotionAnimator {
    pub fn ground_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Pose implied by the reported state, ignoring pending jump triggers.
    pub fn pose(&self) -> LocomotionPose {
        if !self.is_grounded {
            return if self.velocity.y > 0.0 {
                LocomotionPose::Jump
            } else {
                LocomotionPose::Fall
            };
        }

        let speed = self.ground_speed();
        if speed >= self.run_threshold {
            LocomotionPose::Run
        } else if speed >= self.walk_threshold {
            LocomotionPose::Walk
        } else {
            LocomotionPose::Idle
        }
    }

    /// Take every pending jump trigger, returning whether there was one.
    pub fn take_jump(&mut self) -> bool {
        let triggered = self.pending_jumps > 0;
        self.pending_jumps = 0;
        triggered
    }
}

impl AnimationSink for LocomotionAnimator {
    fn set_grounded(&mut self, grounded: bool) {
        self.is_grounded = grounded;
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn trigger_jump(&mut self) {
        self.pending_jumps = self.pending_jumps.saturating_add(1);
    }
}
