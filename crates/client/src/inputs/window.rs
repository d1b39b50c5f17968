use bevy::prelude::{
    Add, ButtonInput, Commands, KeyCode, MessageReader, MouseButton, On, Query, Res, With,
};

use bevy::math::Vec2;
use bevy::window::WindowFocused;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use leafwing_input_manager::prelude::ActionState;

use crate::inputs::input::get_player_input_map;

use shared::controller::PlayerController;
use shared::inputs::input::PlayerAction;

/// Release held movement so nothing stays stuck across a focus or grab change.
///
/// Look is left alone to avoid a camera jump.
pub fn release_movement(action_state: &mut ActionState<PlayerAction>) {
    action_state.set_axis_pair(&PlayerAction::Move, Vec2::ZERO);
    action_state.release(&PlayerAction::Jump);
    action_state.release(&PlayerAction::Run);
}

fn set_cursor_locked(cursor_options: &mut CursorOptions, locked: bool) {
    if locked {
        cursor_options.grab_mode = CursorGrabMode::Locked;
        cursor_options.visible = false;
    } else {
        cursor_options.grab_mode = CursorGrabMode::None;
        cursor_options.visible = true;
    }
}

pub fn toggle_cursor_grab(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut action_query: Query<&mut ActionState<PlayerAction>, With<PlayerController>>,
    mut cursor_options_query: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok(mut cursor_options) = cursor_options_query.single_mut() else {
        return;
    };

    let unlocked = cursor_options.grab_mode == CursorGrabMode::None;
    let lock = if keys.just_pressed(KeyCode::Escape) {
        unlocked
    } else if unlocked && mouse.just_pressed(MouseButton::Left) {
        // Re-lock cursor on click when unlocked
        true
    } else {
        return;
    };

    set_cursor_locked(&mut cursor_options, lock);
    for mut action_state in action_query.iter_mut() {
        release_movement(&mut action_state);
        if lock {
            action_state.enable();
        } else {
            action_state.disable();
        }
    }
}

pub fn handle_focus_change(
    mut focus_events: MessageReader<WindowFocused>,
    mut action_query: Query<&mut ActionState<PlayerAction>, With<PlayerController>>,
    cursor_options_query: Query<&CursorOptions, With<PrimaryWindow>>,
) {
    // Focus never re-locks the cursor; Escape or a click does.
    let cursor_locked = cursor_options_query
        .single()
        .is_ok_and(|cursor_options| cursor_options.grab_mode != CursorGrabMode::None);

    for event in focus_events.read() {
        for mut action_state in action_query.iter_mut() {
            release_movement(&mut action_state);

            if event.focused && cursor_locked && action_state.disabled() {
                action_state.enable();
            }
        }
    }
}

/// Give a freshly spawned player its input bindings and lock the cursor.
pub fn grab_cursor(
    trigger: On<Add, PlayerController>,
    mut commands: Commands,
    mut cursor_options_query: Query<&mut CursorOptions, With<PrimaryWindow>>,
    mut action_query: Query<&mut ActionState<PlayerAction>>,
) {
    if let Ok(mut cursor_options) = cursor_options_query.single_mut() {
        set_cursor_locked(&mut cursor_options, true);
    }

    let player = trigger.entity;

    match action_query.get_mut(player) {
        Ok(mut action_state) => {
            action_state.enable();
        }
        Err(_) => {
            let input_map = get_player_input_map();
            let mut action_state = ActionState::<PlayerAction>::default();
            action_state.enable();
            commands.entity(player).insert((input_map, action_state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{grab_cursor, handle_focus_change, release_movement};
    use bevy::prelude::{App, Entity, Update, Vec2};
    use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowFocused};
    use leafwing_input_manager::prelude::{ActionState, InputMap};
    use shared::controller::PlayerController;
    use shared::inputs::input::PlayerAction;

    fn focus_app(grab_mode: CursorGrabMode) -> (App, Entity, Entity) {
        let mut app = App::new();
        app.add_message::<WindowFocused>();
        app.add_systems(Update, handle_focus_change);

        let window = app
            .world_mut()
            .spawn((
                PrimaryWindow,
                CursorOptions {
                    grab_mode,
                    ..Default::default()
                },
            ))
            .id();

        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.disable();
        let player = app
            .world_mut()
            .spawn((PlayerController::default(), action_state))
            .id();

        (app, window, player)
    }

    fn regain_focus(app: &mut App, window: Entity) {
        app.world_mut().write_message(WindowFocused {
            window,
            focused: true,
        });
        app.update();
    }

    #[test]
    fn regaining_focus_keeps_unlocked_cursor_idle() {
        let (mut app, window, player) = focus_app(CursorGrabMode::None);

        regain_focus(&mut app, window);

        let action_state = app
            .world()
            .get::<ActionState<PlayerAction>>(player)
            .expect("action state");
        assert!(
            action_state.disabled(),
            "look must stay off while the cursor is free"
        );
    }

    #[test]
    fn regaining_focus_restores_locked_cursor_input() {
        let (mut app, window, player) = focus_app(CursorGrabMode::Locked);

        regain_focus(&mut app, window);

        let action_state = app
            .world()
            .get::<ActionState<PlayerAction>>(player)
            .expect("action state");
        assert!(!action_state.disabled());
    }

    #[test]
    fn release_movement_keeps_look() {
        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.set_axis_pair(&PlayerAction::Move, Vec2::new(0.0, 1.0));
        action_state.set_axis_pair(&PlayerAction::Look, Vec2::new(3.0, 4.0));
        action_state.press(&PlayerAction::Run);

        release_movement(&mut action_state);

        assert_eq!(action_state.axis_pair(&PlayerAction::Move), Vec2::ZERO);
        assert_eq!(action_state.axis_pair(&PlayerAction::Look), Vec2::new(3.0, 4.0));
        assert!(!action_state.pressed(&PlayerAction::Run));
    }

    #[test]
    fn new_player_receives_input_bindings() {
        let mut app = App::new();
        app.add_observer(grab_cursor);

        let player = app.world_mut().spawn(PlayerController::default()).id();
        app.update();

        assert!(app.world().get::<InputMap<PlayerAction>>(player).is_some());
        let action_state = app
            .world()
            .get::<ActionState<PlayerAction>>(player)
            .expect("player should get an action state");
        assert!(!action_state.disabled());
    }
}
