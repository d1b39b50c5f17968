use bevy::prelude::{GamepadButton, KeyCode};

use leafwing_input_manager::prelude::{
    GamepadStick, InputMap, MouseMove, VirtualDPad, WithDualAxisProcessingPipelineExt,
};

use shared::inputs::input::PlayerAction;

pub fn get_player_input_map() -> InputMap<PlayerAction> {
    InputMap::<PlayerAction>::default()
        .with(PlayerAction::Jump, KeyCode::Space)
        .with(PlayerAction::Jump, GamepadButton::South)
        .with(PlayerAction::Run, KeyCode::ShiftLeft)
        .with(PlayerAction::Run, GamepadButton::LeftThumb)
        .with_dual_axis(PlayerAction::Move, VirtualDPad::wasd())
        .with_dual_axis(PlayerAction::Move, VirtualDPad::arrow_keys())
        .with_dual_axis(PlayerAction::Move, GamepadStick::LEFT)
        .with_dual_axis(PlayerAction::Look, MouseMove::default())
        .with_dual_axis(
            PlayerAction::Look,
            GamepadStick::RIGHT.inverted_y().sensitivity(20.0),
        )
}

