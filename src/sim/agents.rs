//! Wandering penguins and cows
//!
//! Each agent holds a heading for a random dwell time, then picks a new one.
//! Agents near the arena edge are turned back toward the centre at once.
//! Cows stop to graze while inside the pasture, bobbing their heads.

use glam::{Quat, Vec2, Vec3};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::kind::ObjectKind;
use super::object::{KindState, ObjectId, Patrol};
use super::scene::Scene;
use super::uniform;
use crate::consts::ARENA_RADIUS;
use crate::engine::{BodyHandle, NodeHandle, PhysicsWorld, RenderScene};
use crate::tuning::AgentTuning;
use crate::{ground_point, yaw_rotation};

/// Yaw that turns local +Z toward a ground direction (x, z)
pub fn heading_yaw(heading: Vec2) -> f32 {
    heading.x.atan2(heading.y)
}

/// Uniformly random unit heading on the ground plane
pub fn random_heading(rng: &mut Pcg32) -> Vec2 {
    let angle = uniform(rng, 0.0, TAU);
    Vec2::new(angle.cos(), angle.sin())
}

/// Advance every patrolling agent by `dt` seconds
pub fn update(
    scene: &mut Scene,
    physics: &mut dyn PhysicsWorld,
    render: &mut dyn RenderScene,
    dt: f32,
    skip: Option<ObjectId>,
) {
    let parts = scene.parts_mut();
    let tuning = &parts.tuning.agents;
    for object in parts.objects.iter_mut().filter(|o| Some(o.id) != skip) {
        let kind = object.kind;
        let body = object.body;
        let KindState::Patrolling(patrol) = &mut object.state else {
            continue;
        };
        let Some((position, _)) = physics.pose(body) else {
            continue;
        };
        step_agent(
            kind,
            patrol,
            body,
            ground_point(position),
            physics,
            render,
            parts.rng,
            tuning,
            dt,
            parts.elapsed,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn step_agent(
    kind: ObjectKind,
    patrol: &mut Patrol,
    body: BodyHandle,
    at: Vec2,
    physics: &mut dyn PhysicsWorld,
    render: &mut dyn RenderScene,
    rng: &mut Pcg32,
    tuning: &AgentTuning,
    dt: f32,
    elapsed: f32,
) {
    if let Some(graze) = patrol.graze.as_mut() {
        if graze.grazing {
            graze.remaining -= dt;
            if graze.remaining <= 0.0 {
                graze.grazing = false;
                tilt_head(render, graze.head, 0.0);
                patrol.heading = random_heading(rng);
                patrol.timer = uniform(rng, tuning.dwell_min, tuning.dwell_max);
                log::debug!("{} finished grazing at ({:.1}, {:.1})", kind, at.x, at.y);
            } else {
                let bob = (elapsed * tuning.head_bob_rate).sin() * tuning.head_bob;
                let pitch = tuning.head_tilt + bob;
                tilt_head(render, graze.head, pitch);
            }
            return;
        }
        if tuning.pasture.contains(at) {
            graze.grazing = true;
            graze.remaining = uniform(rng, tuning.graze_min, tuning.graze_max);
            if let Some(state) = physics.body_mut(body) {
                state.velocity.x = 0.0;
                state.velocity.z = 0.0;
            }
            log::debug!("{} started grazing for {:.1}s", kind, graze.remaining);
            return;
        }
    }

    if at.length() > ARENA_RADIUS - tuning.boundary_margin {
        patrol.heading = (-at).normalize_or(Vec2::X);
        patrol.timer = tuning.boundary_dwell;
    } else {
        patrol.timer -= dt;
        if patrol.timer <= 0.0 {
            patrol.heading = random_heading(rng);
            patrol.timer = uniform(rng, tuning.dwell_min, tuning.dwell_max);
        }
    }

    let speed = match kind {
        ObjectKind::Cow => tuning.cow_speed,
        _ => tuning.penguin_speed,
    };
    if let Some(state) = physics.body_mut(body) {
        state.velocity.x = patrol.heading.x * speed;
        state.velocity.z = patrol.heading.y * speed;
        state.rotation = yaw_rotation(heading_yaw(patrol.heading));
        state.angular_velocity = Vec3::ZERO;
    }
}

/// Pitch the head group about its local X axis, keeping its offset
///
/// Negative pitch dips the muzzle (+Z) toward the ground.
fn tilt_head(render: &mut dyn RenderScene, head: NodeHandle, pitch: f32) {
    let Some((local, _)) = render.transform(head) else {
        return;
    };
    render.set_transform(head, local, Quat::from_rotation_x(-pitch));
}
