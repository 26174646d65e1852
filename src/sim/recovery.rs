//! Self-righting dominoes and guardrails
//!
//! AtRest → Returning when the body drifts or tilts past the detection
//! thresholds. While returning the pose closes a fixed fraction of the gap to
//! rest each tick and velocities decay. Inside the tighter settle thresholds
//! the body snaps to rest and stops.

use super::object::{KindState, ObjectId, Returnable};
use super::scene::Scene;
use crate::engine::{BodyState, PhysicsWorld};
use crate::rotation_similarity;
use crate::tuning::RecoveryTuning;

/// Outcome of one recovery tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    /// Close enough to rest, nothing to do
    AtRest,
    /// Just knocked over; the first approach step was applied
    Started,
    Returning,
    /// Snapped onto the rest pose this tick
    Settled,
}

/// Run one tick of the recovery state machine on a single body
pub fn recover(
    rest: &mut Returnable,
    state: &mut BodyState,
    tuning: &RecoveryTuning,
) -> RecoveryStep {
    let target_position = rest.rest_position();
    let mut target_rotation = rest.rest_rotation();

    let started = !rest.returning;
    if started {
        let displaced = state.position.distance(target_position) > tuning.detect_distance;
        let similarity = rotation_similarity(state.rotation, target_rotation);
        let tilted = similarity < tuning.detect_similarity;
        if !displaced && !tilted {
            return RecoveryStep::AtRest;
        }
        rest.returning = true;
    }

    // Short way round
    if state.rotation.dot(target_rotation) < 0.0 {
        target_rotation = -target_rotation;
    }
    state.position = state.position.lerp(target_position, tuning.lerp_factor);
    state.rotation = state
        .rotation
        .lerp(target_rotation, tuning.lerp_factor)
        .normalize();
    state.velocity *= tuning.velocity_damping;
    state.angular_velocity *= tuning.velocity_damping;

    let near = state.position.distance(target_position) < tuning.settle_distance;
    let upright = rotation_similarity(state.rotation, target_rotation) > tuning.settle_similarity;
    if near && upright {
        state.position = target_position;
        state.rotation = rest.rest_rotation();
        state.velocity = glam::Vec3::ZERO;
        state.angular_velocity = glam::Vec3::ZERO;
        rest.returning = false;
        return RecoveryStep::Settled;
    }

    if started {
        RecoveryStep::Started
    } else {
        RecoveryStep::Returning
    }
}

/// Recover every returnable object except `skip`
pub fn update(scene: &mut Scene, physics: &mut dyn PhysicsWorld, skip: Option<ObjectId>) {
    let tuning = scene.tuning.recovery.clone();
    for object in scene.objects_mut().iter_mut().filter(|o| Some(o.id) != skip) {
        let KindState::Returnable(rest) = &mut object.state else {
            continue;
        };
        let Some(state) = physics.body_mut(object.body) else {
            continue;
        };
        match recover(rest, state, &tuning) {
            RecoveryStep::Started => {
                log::debug!("{} {:?} knocked over, returning", object.kind, object.id)
            }
            RecoveryStep::Settled => log::debug!("{} {:?} back at rest", object.kind, object.id),
            RecoveryStep::AtRest | RecoveryStep::Returning => {}
        }
    }
}
