//! Euler look angles, kept in degrees.

use std::ops::{Add, AddAssign};

use bevy::prelude::{EulerRot, Quat, Reflect};
use serde::{Deserialize, Serialize};

/// Accumulated look direction of the player.
///
/// Positive yaw turns left (counter-clockwise around +Y), positive pitch looks up.
#[derive(Reflect, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct EyeAngles {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl EyeAngles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    pub fn with_yaw(self, yaw: f32) -> Self {
        Self { yaw, ..self }
    }

    pub fn with_pitch(self, pitch: f32) -> Self {
        Self { pitch, ..self }
    }

    /// Clamp pitch to `[-limit, limit]` degrees. Yaw and roll are untouched.
    pub fn clamp_pitch(self, limit: f32) -> Self {
        self.with_pitch(self.pitch.clamp(-limit, limit))
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    /// Rotation around the up axis only.
    pub fn yaw_rotation(self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }
}

impl Add for EyeAngles {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.yaw + rhs.yaw, self.pitch + rhs.pitch, self.roll + rhs.roll)
    }
}

impl AddAssign for EyeAngles {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::EyeAngles;
    use bevy::prelude::{Quat, Vec3};

    #[test]
    fn clamp_pitch_keeps_yaw_and_roll() {
        let angles = EyeAngles::new(370.0, 95.0, 3.0).clamp_pitch(80.0);
        assert_eq!(angles, EyeAngles::new(370.0, 80.0, 3.0));

        let angles = EyeAngles::new(-10.0, -300.0, 0.0).clamp_pitch(80.0);
        assert_eq!(angles.pitch, -80.0);
    }

    #[test]
    fn yaw_rotation_turns_forward_left() {
        let forward = EyeAngles::new(90.0, 45.0, 0.0).yaw_rotation() * Vec3::NEG_Z;
        assert!(
            forward.abs_diff_eq(Vec3::NEG_X, 1e-5),
            "yaw of +90 should face -X, got {:?}",
            forward
        );
    }

    #[test]
    fn positive_pitch_looks_up() {
        let forward = EyeAngles::new(0.0, 30.0, 0.0).to_quat() * Vec3::NEG_Z;
        assert!(forward.y > 0.0, "positive pitch should raise the view, got {:?}", forward);
    }

    #[test]
    fn zero_angles_are_identity() {
        let dot = EyeAngles::ZERO.to_quat().dot(Quat::IDENTITY).abs();
        assert!(dot > 0.9999);
    }

    #[test]
    fn add_assign_accumulates_every_axis() {
        let mut angles = EyeAngles::new(10.0, -5.0, 0.0);
        angles += EyeAngles::new(2.5, 1.0, 0.5);
        assert_eq!(angles, EyeAngles::new(12.5, -4.0, 0.5));
    }
}
