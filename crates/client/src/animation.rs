//! Plays locomotion clips on the player model from the controller's animation parameters.

use bevy::prelude::*;

use shared::animation::{LocomotionAnimator, LocomotionPose};

pub struct ClientAnimationPlugin;

impl Plugin for ClientAnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(link_animation_player);
        app.add_systems(Update, drive_locomotion_animation);
    }
}

/// Clip handles for each locomotion pose.
#[derive(Clone, Debug)]
pub struct PoseClips {
    pub idle: Handle<AnimationClip>,
    pub walk: Handle<AnimationClip>,
    pub run: Handle<AnimationClip>,
    pub jump: Handle<AnimationClip>,
    pub fall: Handle<AnimationClip>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoseNodes {
    pub idle: AnimationNodeIndex,
    pub walk: AnimationNodeIndex,
    pub run: AnimationNodeIndex,
    pub jump: AnimationNodeIndex,
    pub fall: AnimationNodeIndex,
}

impl PoseNodes {
    pub fn node(&self, pose: LocomotionPose) -> AnimationNodeIndex {
        match pose {
            LocomotionPose::Idle => self.idle,
            LocomotionPose::Walk => self.walk,
            LocomotionPose::Run => self.run,
            LocomotionPose::Jump => self.jump,
            LocomotionPose::Fall => self.fall,
        }
    }
}

/// Animation graph of a player, attached next to its [`LocomotionAnimator`].
#[derive(Component, Clone, Debug)]
pub struct AnimationRig {
    pub graph: Handle<AnimationGraph>,
    pub nodes: PoseNodes,
    /// The model's `AnimationPlayer`, found once the model scene spawns.
    pub animation_player: Option<Entity>,
    pub current: Option<LocomotionPose>,
}

impl AnimationRig {
    pub fn from_clips(graphs: &mut Assets<AnimationGraph>, clips: PoseClips) -> Self {
        let (graph, indices) = AnimationGraph::from_clips([
            clips.idle, clips.walk, clips.run, clips.jump, clips.fall,
        ]);
        let nodes = PoseNodes {
            idle: indices[0],
            walk: indices[1],
            run: indices[2],
            jump: indices[3],
            fall: indices[4],
        };

        Self {
            graph: graphs.add(graph),
            nodes,
            animation_player: None,
            current: None,
        }
    }
}

pub fn pose_loops(pose: LocomotionPose) -> bool {
    !matches!(pose, LocomotionPose::Jump)
}

/// Pose to start playing this frame, if any.
///
/// A jump trigger always restarts the jump clip; otherwise only a pose change does.
pub fn next_pose(
    reported: LocomotionPose,
    jumped: bool,
    current: Option<LocomotionPose>,
) -> Option<LocomotionPose> {
    if jumped {
        return Some(LocomotionPose::Jump);
    }
    (current != Some(reported)).then_some(reported)
}

pub fn link_animation_player(
    trigger: On<Add, AnimationPlayer>,
    parents: Query<&ChildOf>,
    mut rigs: Query<&mut AnimationRig>,
    mut commands: Commands,
) {
    let animation_player = trigger.entity;

    for ancestor in parents.iter_ancestors(animation_player) {
        if let Ok(mut rig) = rigs.get_mut(ancestor) {
            rig.animation_player = Some(animation_player);
            rig.current = None;
            commands
                .entity(animation_player)
                .insert(AnimationGraphHandle(rig.graph.clone()));
            debug!("Linked animation player {:?} to rig on {:?}", animation_player, ancestor);
            return;
        }
    }
}

pub fn drive_locomotion_animation(
    mut rigs: Query<(&mut LocomotionAnimator, &mut AnimationRig)>,
    mut players: Query<&mut AnimationPlayer>,
) {
    for (mut animator, mut rig) in rigs.iter_mut() {
        let jumped = animator.take_jump();

        let Some(entity) = rig.animation_player else {
            continue;
        };
        let Ok(mut player) = players.get_mut(entity) else {
            continue;
        };
        let Some(pose) = next_pose(animator.pose(), jumped, rig.current) else {
            continue;
        };

        player.stop_all();
        let active = player.play(rig.nodes.node(pose));
        if pose_loops(pose) {
            active.repeat();
        }
        rig.current = Some(pose);
    }
}

#[cfg(test)]
mod tests {
    use super::{next_pose, pose_loops};
    use shared::animation::LocomotionPose;

    #[test]
    fn unchanged_pose_does_not_restart() {
        assert_eq!(
            next_pose(LocomotionPose::Walk, false, Some(LocomotionPose::Walk)),
            None
        );
        assert_eq!(
            next_pose(LocomotionPose::Run, false, Some(LocomotionPose::Walk)),
            Some(LocomotionPose::Run)
        );
    }

    #[test]
    fn first_pose_always_plays() {
        assert_eq!(
            next_pose(LocomotionPose::Idle, false, None),
            Some(LocomotionPose::Idle)
        );
    }

    #[test]
    fn jump_trigger_restarts_jump() {
        assert_eq!(
            next_pose(LocomotionPose::Idle, true, Some(LocomotionPose::Jump)),
            Some(LocomotionPose::Jump)
        );
    }

    #[test]
    fn rising_keeps_jump_then_falls() {
        assert_eq!(
            next_pose(LocomotionPose::Jump, false, Some(LocomotionPose::Jump)),
            None
        );
        assert_eq!(
            next_pose(LocomotionPose::Fall, false, Some(LocomotionPose::Jump)),
            Some(LocomotionPose::Fall)
        );
    }

    #[test]
    fn only_jump_is_one_shot() {
        assert!(!pose_loops(LocomotionPose::Jump));
        assert!(pose_loops(LocomotionPose::Fall));
        assert!(pose_loops(LocomotionPose::Idle));
    }
}
