use bevy::prelude::{Reflect, Resource, Vec2};
use leafwing_input_manager::prelude::ActionState;
use serde::{Deserialize, Serialize};

use crate::angles::EyeAngles;
use crate::inputs::input::PlayerAction;

const LOOK_DEADZONE_SQUARED: f32 = 0.000001;

/// Pitch limit of the first-person view, in degrees.
pub const PITCH_LIMIT_DEGREES: f32 = 80.0;

#[derive(Resource, Reflect, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LookSettings {
    /// Degrees of rotation per unit of look input.
    pub sensitivity: f32,
    pub invert_pitch: bool,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.12,
            invert_pitch: false,
        }
    }
}

pub fn get_mouse_look_delta(action_state: &ActionState<PlayerAction>) -> Vec2 {
    let look_input = action_state.axis_pair(&PlayerAction::Look);
    if look_input.length_squared() < LOOK_DEADZONE_SQUARED {
        Vec2::ZERO
    } else {
        look_input
    }
}

/// Convert raw look input into a yaw/pitch change in degrees.
///
/// Moving right turns right (negative yaw), moving down looks down.
pub fn look_input_to_angles(mouse_delta: Vec2, settings: &LookSettings) -> EyeAngles {
    let pitch_sign = if settings.invert_pitch { 1.0 } else { -1.0 };
    EyeAngles::new(
        -mouse_delta.x * settings.sensitivity,
        pitch_sign * mouse_delta.y * settings.sensitivity,
        0.0,
    )
}

pub fn get_look_delta(action_state: &ActionState<PlayerAction>, settings: &LookSettings) -> EyeAngles {
    look_input_to_angles(get_mouse_look_delta(action_state), settings)
}

#[cfg(test)]
mod tests {
    use super::{LookSettings, get_look_delta, get_mouse_look_delta, look_input_to_angles};
    use crate::inputs::input::PlayerAction;
    use bevy::prelude::Vec2;
    use leafwing_input_manager::prelude::ActionState;

    #[test]
    fn look_delta_applies_deadzone() {
        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.set_axis_pair(&PlayerAction::Look, Vec2::new(0.0001, 0.0001));

        let delta = get_mouse_look_delta(&action_state);
        assert_eq!(delta, Vec2::ZERO);
    }

    #[test]
    fn look_delta_preserves_valid_input() {
        let mut action_state = ActionState::<PlayerAction>::default();
        let expected = Vec2::new(0.25, -0.75);
        action_state.set_axis_pair(&PlayerAction::Look, expected);

        let delta = get_mouse_look_delta(&action_state);
        assert_eq!(delta, expected);
    }

    #[test]
    fn horizontal_motion_only_changes_yaw() {
        let settings = LookSettings {
            sensitivity: 0.5,
            invert_pitch: false,
        };
        let angles = look_input_to_angles(Vec2::new(10.0, 0.0), &settings);

        assert_eq!(angles.yaw, -5.0);
        assert_eq!(angles.pitch, 0.0);
    }

    #[test]
    fn invert_pitch_flips_vertical_sign() {
        let normal = LookSettings {
            sensitivity: 1.0,
            invert_pitch: false,
        };
        let inverted = LookSettings {
            invert_pitch: true,
            ..normal.clone()
        };

        let down = look_input_to_angles(Vec2::new(0.0, 4.0), &normal);
        let up = look_input_to_angles(Vec2::new(0.0, 4.0), &inverted);
        assert_eq!(down.pitch, -4.0);
        assert_eq!(up.pitch, 4.0);
    }

    #[test]
    fn look_delta_scales_by_sensitivity() {
        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.set_axis_pair(&PlayerAction::Look, Vec2::new(-100.0, 0.0));

        let angles = get_look_delta(&action_state, &LookSettings::default());
        assert!((angles.yaw - 12.0).abs() < 1e-4, "yaw was {}", angles.yaw);
    }
}
