use avian3d::prelude::Gravity;
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;

use crate::animation::{AnimationSink, LocomotionAnimator};
use crate::controller::PlayerController;
use crate::inputs::input::{ActionInput, PlayerAction};
use crate::inputs::look::LookSettings;
use crate::movement::{
    CharacterBody, Locomotion, sync_character_bodies, write_character_velocity,
};
use crate::scene::PhysicsScene;

/// Frame cadence: integrate look input, turn the body and orbit the camera.
pub fn update_player_look(
    look_settings: Res<LookSettings>,
    mut player_query: Query<(
        &ActionState<PlayerAction>,
        &mut PlayerController,
        &mut Transform,
    )>,
    mut camera_query: Query<&mut Transform, Without<PlayerController>>,
) {
    for (action_state, mut controller, mut body) in player_query.iter_mut() {
        let input = ActionInput::new(action_state, &look_settings);

        let mut camera = controller
            .camera
            .and_then(|camera| camera_query.get_mut(camera).ok());

        controller.on_frame(&input, &mut body, camera.as_deref_mut());
    }
}

/// Tick cadence: run the locomotion state machine for every player.
pub fn tick_player_locomotion(
    time: Res<Time>,
    gravity: Res<Gravity>,
    look_settings: Res<LookSettings>,
    mut player_query: Query<(
        Entity,
        &ActionState<PlayerAction>,
        &PlayerController,
        &Transform,
        Option<&mut CharacterBody>,
        Option<&mut LocomotionAnimator>,
    )>,
) {
    let scene = PhysicsScene::from_world(&gravity, &time);

    for (entity, action_state, controller, transform, mut body, mut animator) in
        player_query.iter_mut()
    {
        let input = ActionInput::new(action_state, &look_settings);
        let locomotion = body.as_deref_mut().map(|body| body as &mut dyn Locomotion);
        let animator = animator
            .as_deref_mut()
            .map(|animator| animator as &mut dyn AnimationSink);

        let Some(tick) = controller.on_tick(&input, &scene, transform.rotation, locomotion, animator)
        else {
            continue;
        };

        if tick.jumped {
            debug!("{:?} jumped (wish velocity {:?})", entity, tick.wish_velocity);
        }
    }
}

pub struct PlayerControllerPlugin;

impl Plugin for PlayerControllerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerController>()
            .register_type::<CharacterBody>()
            .register_type::<LocomotionAnimator>()
            .register_type::<LookSettings>();

        app.init_resource::<LookSettings>();

        // Movement systems (FixedUpdate for physics)
        app.add_systems(
            FixedUpdate,
            (
                sync_character_bodies,
                tick_player_locomotion,
                write_character_velocity,
            )
                .chain(),
        );

        app.add_systems(Update, update_player_look);
    }
}

#[cfg(test)]
mod tests {
    use super::{tick_player_locomotion, update_player_look};
    use crate::angles::EyeAngles;
    use crate::animation::LocomotionAnimator;
    use crate::controller::PlayerController;
    use crate::inputs::input::PlayerAction;
    use crate::inputs::look::LookSettings;
    use crate::movement::{CharacterBody, GroundState};
    use avian3d::prelude::Gravity;
    use bevy::prelude::*;
    use leafwing_input_manager::prelude::ActionState;
    use std::time::Duration;

    fn look_app() -> App {
        let mut app = App::new();
        app.insert_resource(LookSettings {
            sensitivity: 1.0,
            invert_pitch: false,
        });
        app.add_systems(Update, update_player_look);
        app
    }

    fn tick_app(gravity: Vec3, dt: f32) -> App {
        let mut app = App::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs_f32(dt));
        app.insert_resource(time);
        app.insert_resource(Gravity(gravity));
        app.init_resource::<LookSettings>();
        app.add_systems(Update, tick_player_locomotion);
        app
    }

    #[test]
    fn look_turns_body_and_orbits_camera_child() {
        let mut app = look_app();

        let camera = app
            .world_mut()
            .spawn(Transform::from_xyz(0.0, 64.0, 0.0))
            .id();

        let mut controller = PlayerController::default()
            .with_camera(camera)
            .with_eye_position(Vec3::new(0.0, 64.0, 0.0));
        controller.on_start(Some(&Transform::from_xyz(0.0, 64.0, 20.0)), None, &mut NoCosmetics);

        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.set_axis_pair(&PlayerAction::Look, Vec2::new(-90.0, -30.0));

        let player = app
            .world_mut()
            .spawn((controller, Transform::default(), action_state))
            .id();

        app.update();

        let controller = app
            .world()
            .get::<PlayerController>(player)
            .expect("player should keep its controller");
        assert_eq!(controller.eye_angles, EyeAngles::new(90.0, 30.0, 0.0));

        let body = app.world().get::<Transform>(player).expect("player transform");
        let dot = body.rotation.dot(Quat::from_rotation_y(90f32.to_radians())).abs();
        assert!(dot > 0.9999, "body should carry yaw only, dot={}", dot);

        let camera_transform = app.world().get::<Transform>(camera).expect("camera transform");
        assert!(
            camera_transform.translation.y < 64.0,
            "looking up should swing a trailing camera below the pivot, got {:?}",
            camera_transform.translation
        );
        let forward = camera_transform.rotation * Vec3::NEG_Z;
        assert!(forward.y > 0.0, "camera should look up, forward={:?}", forward);
    }

    #[test]
    fn tick_skips_players_without_character_body() {
        let mut app = tick_app(Vec3::new(0.0, -800.0, 0.0), 0.016);

        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.press(&PlayerAction::Jump);

        let player = app
            .world_mut()
            .spawn((
                PlayerController::default(),
                Transform::default(),
                action_state,
                LocomotionAnimator::default(),
            ))
            .id();

        app.update();

        let animator = app
            .world()
            .get::<LocomotionAnimator>(player)
            .expect("animator should remain");
        assert_eq!(*animator, LocomotionAnimator::default());
    }

    #[test]
    fn tick_applies_gravity_to_airborne_body() {
        let mut app = tick_app(Vec3::new(0.0, -800.0, 0.0), 0.016);

        let player = app
            .world_mut()
            .spawn((
                PlayerController::default(),
                Transform::default(),
                ActionState::<PlayerAction>::default(),
                CharacterBody::default().with_tick_delta(0.016),
                LocomotionAnimator::default(),
            ))
            .id();

        app.update();

        let body = app.world().get::<CharacterBody>(player).expect("body");
        assert!((body.velocity.y + 12.8).abs() < 1e-3, "velocity was {:?}", body.velocity);

        let animator = app.world().get::<LocomotionAnimator>(player).expect("animator");
        assert!(!animator.is_grounded);
        assert_eq!(animator.velocity, body.velocity);
    }

    #[test]
    fn tick_jumps_grounded_body() {
        let mut app = tick_app(Vec3::new(0.0, -800.0, 0.0), 0.016);

        let mut body = CharacterBody::default().with_tick_delta(0.016);
        body.set_ground(GroundState {
            is_grounded: true,
            ground_normal: Vec3::Y,
            ground_distance: 0.0,
        });

        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.press(&PlayerAction::Jump);

        let player = app
            .world_mut()
            .spawn((
                PlayerController::default(),
                Transform::default(),
                action_state,
                body,
                LocomotionAnimator::default(),
            ))
            .id();

        app.update();

        let body = app.world().get::<CharacterBody>(player).expect("body");
        assert!((body.velocity.y - 400.0).abs() < 1e-3, "velocity was {:?}", body.velocity);

        let animator = app.world().get::<LocomotionAnimator>(player).expect("animator");
        assert_eq!(animator.pending_jumps, 1);
        assert!(!animator.is_grounded, "impulse should report the body airborne");
    }

    struct NoCosmetics;

    impl crate::cosmetics::CosmeticsLoader for NoCosmetics {
        fn load_for_current_user(&mut self) -> crate::cosmetics::CosmeticsSet {
            crate::cosmetics::CosmeticsSet::default()
        }

        fn apply(&mut self, _set: &crate::cosmetics::CosmeticsSet, _model: Entity) {}
    }
}
