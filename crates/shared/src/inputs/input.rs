use bevy::prelude::{Reflect, Vec2};
use leafwing_input_manager::Actionlike;
use leafwing_input_manager::prelude::ActionState;
use serde::{Deserialize, Serialize};

use crate::angles::EyeAngles;
use crate::inputs::look::{LookSettings, get_look_delta};

#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Reflect, Serialize, Deserialize, Actionlike, Default,
)]
pub enum PlayerAction {
    #[default]
    #[actionlike(DualAxis)]
    Move,

    #[actionlike(DualAxis)]
    Look,

    #[actionlike(Button)]
    Jump,

    #[actionlike(Button)]
    Run,
}

const MOVEMENT_DEADZONE_SQUARED: f32 = 0.000001;

/// Input collaborator consumed by the player controller.
pub trait PlayerInput {
    /// Look change for this frame, in degrees.
    fn look_delta(&self) -> EyeAngles;
    /// Analog move vector: `x` strafes right, `y` walks forward.
    fn move_vector(&self) -> Vec2;
    fn is_held(&self, action: PlayerAction) -> bool;
    fn was_pressed(&self, action: PlayerAction) -> bool;
}

/// Reads a leafwing [`ActionState`] as the controller's input source.
pub struct ActionInput<'a> {
    pub state: &'a ActionState<PlayerAction>,
    pub look: &'a LookSettings,
}

impl<'a> ActionInput<'a> {
    pub fn new(state: &'a ActionState<PlayerAction>, look: &'a LookSettings) -> Self {
        Self { state, look }
    }
}

/// Get movement direction from input action state
pub fn get_movement_direction(action_state: &ActionState<PlayerAction>) -> Vec2 {
    let move_input = action_state.axis_pair(&PlayerAction::Move);
    if move_input.length_squared() < MOVEMENT_DEADZONE_SQUARED {
        Vec2::ZERO
    } else {
        move_input.clamp_length_max(1.0)
    }
}

impl PlayerInput for ActionInput<'_> {
    fn look_delta(&self) -> EyeAngles {
        if self.state.disabled() {
            return EyeAngles::ZERO;
        }
        get_look_delta(self.state, self.look)
    }

    fn move_vector(&self) -> Vec2 {
        if self.state.disabled() {
            return Vec2::ZERO;
        }
        get_movement_direction(self.state)
    }

    fn is_held(&self, action: PlayerAction) -> bool {
        !self.state.disabled() && self.state.pressed(&action)
    }

    fn was_pressed(&self, action: PlayerAction) -> bool {
        !self.state.disabled() && self.state.just_pressed(&action)
    }
}
