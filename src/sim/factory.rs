//! Per-kind factories
//!
//! Every factory creates the physics body (or bodies) and the visual nodes of
//! one object in a single call and hands both back, so an object can never
//! exist with only half of its representation. Factories take a ground-level
//! placement point and lift the body to its resting height.

use glam::{Quat, Vec2, Vec3};
use rand_pcg::Pcg32;

use super::agents;
use super::catalog::spec;
use super::kind::ObjectKind;
use super::object::{
    BuildParams, Graze, Hinge, KindState, Orbit, Patrol, Returnable, StepBody, StepSize, Visual,
};
use super::orbit;
use crate::consts::{
    DOMINO_DEPTH, DOMINO_HEIGHT, DOMINO_WIDTH, GOAL_DEPTH, GOAL_HEIGHT, GOAL_WIDTH, MAX_STAIR_STEPS,
    SPHERE_RADIUS,
};
use crate::engine::{
    BodyDesc, BodyHandle, Collider, MaterialId, NodeDesc, NodeHandle, PhysicsWorld, RenderScene,
    Shape, SurfaceMaterial,
};
use crate::tuning::Tuning;
use crate::yaw_rotation;

/// Ramp box (length x height x depth), tilted 30° about Z
pub const RAMP_SIZE: Vec3 = Vec3::new(3.0, 1.0, 2.0);
pub const BOX_SIZE: f32 = 0.5;
/// Seesaw plank (length x thickness x width)
pub const SEESAW_PLANK: Vec3 = Vec3::new(4.0, 0.1, 0.5);
pub const SEESAW_PIVOT_HALF: Vec3 = Vec3::new(0.1, 0.3, 0.1);
pub const SHRINE_SIZE: Vec3 = Vec3::new(2.0, 3.0, 1.5);
pub const TRAMPOLINE_RADIUS: f32 = 1.5;
pub const TRAMPOLINE_THICKNESS: f32 = 0.1;
pub const GUARDRAIL_THICKNESS: f32 = 0.1;
/// Guardrail mass per unit volume
pub const GUARDRAIL_DENSITY: f32 = 2.0;
pub const PENGUIN_RADIUS: f32 = 0.35;
pub const PENGUIN_HEIGHT: f32 = 0.8;
pub const COW_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 0.5, 0.6);
/// Vehicle car (length x height x width)
pub const VEHICLE_SIZE: Vec3 = Vec3::new(3.0, 1.2, 1.0);

/// Engines and shared state a factory builds into
pub struct Build<'a> {
    pub physics: &'a mut dyn PhysicsWorld,
    pub render: &'a mut dyn RenderScene,
    pub rng: &'a mut Pcg32,
    pub tuning: &'a Tuning,
}

/// Everything a factory created for one object
#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    pub body: BodyHandle,
    pub visual: Visual,
    pub state: KindState,
    pub params: BuildParams,
}

/// Factory signature shared by every catalog row
pub type Factory = fn(&mut Build<'_>, Vec3, &BuildParams) -> Built;

/// Body with the catalog's mass and material for `kind`
fn body_desc(kind: ObjectKind, collider: Collider, position: Vec3) -> BodyDesc {
    let row = spec(kind);
    BodyDesc::new(collider, row.mass, position).with_material(row.material)
}

fn cuboid_collider(half_extents: Vec3) -> Collider {
    Collider::Cuboid { half_extents }
}

fn cuboid(half_extents: Vec3) -> Shape {
    Shape::Cuboid { half_extents }
}

/// Top-level mesh at a body pose
fn mesh(
    b: &mut Build<'_>,
    shape: Shape,
    position: Vec3,
    rotation: Quat,
    color: MaterialId,
) -> NodeHandle {
    b.render
        .create_node(&NodeDesc::new(shape, position, color).with_rotation(rotation))
}

/// Mesh attached to a parent node
fn child(
    b: &mut Build<'_>,
    parent: NodeHandle,
    shape: Shape,
    local: Vec3,
    color: u32,
) -> NodeHandle {
    b.render
        .create_node(&NodeDesc::new(shape, local, MaterialId(color)).child_of(parent))
}

/// Push `velocity` into a sphere, with the spin of rolling without slip
pub fn launch_sphere(physics: &mut dyn PhysicsWorld, body: BodyHandle, velocity: Vec3) {
    if let Some(state) = physics.body_mut(body) {
        state.velocity = velocity;
        state.angular_velocity = Vec3::new(
            -velocity.z / SPHERE_RADIUS,
            0.0,
            velocity.x / SPHERE_RADIUS,
        );
    }
}

pub fn sphere(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let collider = Collider::Ball {
        radius: SPHERE_RADIUS,
    };
    let body = b
        .physics
        .add_body(&body_desc(ObjectKind::Sphere, collider, base).with_damping(0.01, 0.01));
    let node = mesh(
        b,
        Shape::Ball { radius: SPHERE_RADIUS },
        base,
        Quat::IDENTITY,
        spec(ObjectKind::Sphere).color,
    );
    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Plain,
        params: BuildParams::None,
    }
}

pub fn domino(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half = Vec3::new(DOMINO_WIDTH, DOMINO_HEIGHT, DOMINO_DEPTH) * 0.5;
    let position = base + Vec3::Y * half.y;
    let body = b.physics.add_body(
        &body_desc(ObjectKind::Domino, cuboid_collider(half), position).with_damping(0.01, 0.005),
    );
    let node = mesh(b, cuboid(half), position, Quat::IDENTITY, spec(ObjectKind::Domino).color);
    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Returnable(Returnable::new(position, Quat::IDENTITY)),
        params: BuildParams::None,
    }
}

pub fn ramp(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half = RAMP_SIZE * 0.5;
    let position = base + Vec3::Y * half.y;
    let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_6);
    let body = b.physics.add_body(
        &body_desc(ObjectKind::Ramp, cuboid_collider(half), position).with_rotation(rotation),
    );
    let node = mesh(b, cuboid(half), position, rotation, spec(ObjectKind::Ramp).color);
    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Plain,
        params: BuildParams::None,
    }
}

pub fn block(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half = Vec3::splat(BOX_SIZE * 0.5);
    let position = base + Vec3::Y * half.y;
    let body = b.physics.add_body(&body_desc(ObjectKind::Box, cuboid_collider(half), position));
    let node = mesh(b, cuboid(half), position, Quat::IDENTITY, spec(ObjectKind::Box).color);
    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Plain,
        params: BuildParams::None,
    }
}

/// Plank balanced on the top of a fixed pivot post centred on `base`
pub fn seesaw(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half = SEESAW_PLANK * 0.5;
    let position = base + Vec3::Y * (SEESAW_PIVOT_HALF.y + half.y);
    let body = b.physics.add_body(&body_desc(ObjectKind::Seesaw, cuboid_collider(half), position));
    let node = mesh(b, cuboid(half), position, Quat::IDENTITY, spec(ObjectKind::Seesaw).color);

    let pivot_body = b.physics.add_body(
        &BodyDesc::new(
            Collider::Cuboid {
                half_extents: SEESAW_PIVOT_HALF,
            },
            0.0,
            base,
        )
        .with_material(SurfaceMaterial::new(0.8, 0.1)),
    );
    let pivot_node = mesh(b, cuboid(SEESAW_PIVOT_HALF), base, Quat::IDENTITY, MaterialId(0x34495e));
    let joint = b.physics.add_point_constraint(
        body,
        Vec3::new(0.0, -half.y, 0.0),
        pivot_body,
        Vec3::new(0.0, SEESAW_PIVOT_HALF.y, 0.0),
    );

    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Hinged(Hinge {
            pivot_body,
            pivot_node,
            joint,
        }),
        params: BuildParams::None,
    }
}

pub fn mountain(b: &mut Build<'_>, base: Vec3, params: &BuildParams) -> Built {
    let (height, radius) = match *params {
        BuildParams::Mountain { height, radius } => (height, radius),
        _ => (5.0, 3.0),
    };
    let position = base + Vec3::Y * height * 0.5;
    let body = b.physics.add_body(&body_desc(
        ObjectKind::Mountain,
        Collider::Cylinder {
            radius,
            half_height: height * 0.5,
        },
        position,
    ));
    let node = mesh(
        b,
        Shape::Cone { radius, height },
        position,
        Quat::IDENTITY,
        spec(ObjectKind::Mountain).color,
    );
    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Plain,
        params: BuildParams::Mountain { height, radius },
    }
}

pub fn shrine(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half = SHRINE_SIZE * 0.5;
    let position = base + Vec3::Y * half.y;
    let body = b.physics.add_body(&body_desc(ObjectKind::Shrine, cuboid_collider(half), position));
    let hall = mesh(b, cuboid(half), position, Quat::IDENTITY, spec(ObjectKind::Shrine).color);
    let roof = child(
        b,
        hall,
        cuboid(Vec3::new(half.x * 1.25, 0.25, half.z * 1.3)),
        Vec3::new(0.0, half.y + 0.25, 0.0),
        0x8b4513,
    );
    Built {
        body,
        visual: Visual {
            root: hall,
            parts: vec![hall, roof],
        },
        state: KindState::Plain,
        params: BuildParams::None,
    }
}

/// Yaw that turns local +X toward a ground direction (x, z)
fn yaw_along_x(dir: Vec2) -> f32 {
    (-dir.y).atan2(dir.x)
}

pub fn road(b: &mut Build<'_>, base: Vec3, params: &BuildParams) -> Built {
    let (start, end, width, height) = match *params {
        BuildParams::Road {
            start,
            end,
            width,
            height,
        } => (start, end, width, height),
        _ => (
            base - Vec3::new(2.0, 0.0, 2.0),
            base + Vec3::new(2.0, 0.0, 2.0),
            1.5,
            0.1,
        ),
    };
    let delta = end - start;
    let run = Vec2::new(delta.x, delta.z);
    let length = delta.length().max(0.1);
    let slope = delta.y.atan2(run.length());
    let rotation = yaw_rotation(yaw_along_x(run)) * Quat::from_rotation_z(slope);
    let position = (start + end) * 0.5 + Vec3::Y * height * 0.5;
    let half = Vec3::new(length * 0.5, height * 0.5, width * 0.5);

    let body = b.physics.add_body(
        &body_desc(ObjectKind::Road, cuboid_collider(half), position).with_rotation(rotation),
    );
    let node = mesh(b, cuboid(half), position, rotation, spec(ObjectKind::Road).color);
    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Plain,
        params: BuildParams::Road {
            start,
            end,
            width,
            height,
        },
    }
}

pub fn plank(b: &mut Build<'_>, base: Vec3, params: &BuildParams) -> Built {
    let (length, width, height, yaw) = match *params {
        BuildParams::Plank {
            length,
            width,
            height,
            yaw,
        } => (length, width, height, yaw),
        _ => (4.0, 1.5, 0.2, 0.0),
    };
    let half = Vec3::new(length, height, width) * 0.5;
    let position = base + Vec3::Y * half.y;
    let rotation = yaw_rotation(yaw);
    let body = b.physics.add_body(
        &body_desc(ObjectKind::Plank, cuboid_collider(half), position).with_rotation(rotation),
    );
    let node = mesh(b, cuboid(half), position, rotation, spec(ObjectKind::Plank).color);
    Built {
        body,
        visual: Visual::single(node),
        state: KindState::Plain,
        params: BuildParams::Plank {
            length,
            width,
            height,
            yaw,
        },
    }
}

pub fn guardrail(b: &mut Build<'_>, base: Vec3, params: &BuildParams) -> Built {
    let (length, height, yaw) = match *params {
        BuildParams::Guardrail { length, height, yaw } => (length, height, yaw),
        _ => (3.0, 0.5, 0.0),
    };
    let half = Vec3::new(length, height, GUARDRAIL_THICKNESS) * 0.5;
    let position = base + Vec3::Y * half.y;
    let rotation = yaw_rotation(yaw);
    let mass = length * height * GUARDRAIL_THICKNESS * GUARDRAIL_DENSITY;

    let mut desc = body_desc(ObjectKind::Guardrail, cuboid_collider(half), position)
        .with_rotation(rotation)
        .with_damping(0.3, 0.3);
    desc.mass = mass;
    let body = b.physics.add_body(&desc);

    let rail = mesh(b, cuboid(half), position, rotation, spec(ObjectKind::Guardrail).color);
    let top_bar = child(
        b,
        rail,
        cuboid(Vec3::new(half.x, 0.025, GUARDRAIL_THICKNESS * 0.75)),
        Vec3::new(0.0, half.y - 0.025, 0.0),
        spec(ObjectKind::Guardrail).color.0,
    );

    Built {
        body,
        visual: Visual {
            root: rail,
            parts: vec![rail, top_bar],
        },
        state: KindState::Returnable(Returnable::new(position, rotation)),
        params: BuildParams::Guardrail { length, height, yaw },
    }
}

/// One fixed body per step, all under one visual group centred between the
/// endpoints. Steps face the direction of travel.
pub fn stairs(b: &mut Build<'_>, base: Vec3, params: &BuildParams) -> Built {
    let (start, end, step) = match *params {
        BuildParams::Stairs { start, end, step } => (start, end, step),
        _ => (base, base + Vec3::new(2.0, 2.0, 2.0), StepSize::default()),
    };
    let delta = end - start;
    let count = (step.steps_between(start, end) as usize).clamp(1, MAX_STAIR_STEPS);
    let center = (start + end) * 0.5;
    let rotation = yaw_rotation(agents::heading_yaw(Vec2::new(delta.x, delta.z)));
    let half = Vec3::new(step.width, step.height, step.depth) * 0.5;
    let row = spec(ObjectKind::Stairs);

    let group = b.render.create_node(&NodeDesc::group(center));
    let mut steps = Vec::with_capacity(count);
    let mut parts = Vec::with_capacity(count);
    for i in 0..count {
        let offset = start + delta * ((i as f32 + 0.5) / count as f32) - center;
        let body = b.physics.add_body(
            &BodyDesc::new(cuboid_collider(half), 0.0, center + offset)
                .with_rotation(rotation)
                .with_material(row.material),
        );
        let node = b.render.create_node(
            &NodeDesc::new(cuboid(half), offset, row.color)
                .with_rotation(rotation)
                .child_of(group),
        );
        steps.push(StepBody { body, offset });
        parts.push(node);
    }

    Built {
        body: steps[0].body,
        visual: Visual { root: group, parts },
        state: KindState::MultiBody(steps),
        params: BuildParams::Stairs { start, end, step },
    }
}

pub fn trampoline(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half_height = TRAMPOLINE_THICKNESS * 0.5;
    let position = base + Vec3::Y * half_height;
    let body = b.physics.add_body(&body_desc(
        ObjectKind::Trampoline,
        Collider::Cylinder {
            radius: TRAMPOLINE_RADIUS,
            half_height,
        },
        position,
    ));
    let mat = mesh(
        b,
        Shape::Cylinder {
            radius: TRAMPOLINE_RADIUS,
            half_height,
        },
        position,
        Quat::IDENTITY,
        spec(ObjectKind::Trampoline).color,
    );
    let frame = child(
        b,
        mat,
        Shape::Cylinder {
            radius: TRAMPOLINE_RADIUS + 0.1,
            half_height: 0.05,
        },
        Vec3::new(0.0, 0.1, 0.0),
        0x888888,
    );
    Built {
        body,
        visual: Visual {
            root: mat,
            parts: vec![mat, frame],
        },
        state: KindState::Plain,
        params: BuildParams::None,
    }
}

/// Open box with a flag; the body spans the whole box
pub fn goal(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half = Vec3::new(GOAL_WIDTH, GOAL_HEIGHT, GOAL_DEPTH) * 0.5;
    let wall = 0.05;
    let position = base + Vec3::Y * half.y;
    let body = b.physics.add_body(&body_desc(ObjectKind::Goal, cuboid_collider(half), position));

    let color = spec(ObjectKind::Goal).color.0;
    let group = b.render.create_node(&NodeDesc::group(position));
    let walls = [
        (Vec3::new(half.x, wall, half.z), Vec3::new(0.0, wall - half.y, 0.0)),
        (Vec3::new(half.x, half.y, wall), Vec3::new(0.0, 0.0, half.z)),
        (Vec3::new(half.x, half.y, wall), Vec3::new(0.0, 0.0, -half.z)),
        (Vec3::new(wall, half.y, half.z), Vec3::new(-half.x, 0.0, 0.0)),
        (Vec3::new(wall, half.y, half.z), Vec3::new(half.x, 0.0, 0.0)),
    ];
    let mut parts: Vec<NodeHandle> = walls
        .iter()
        .map(|&(h, local)| child(b, group, cuboid(h), local, color))
        .collect();
    parts.push(child(
        b,
        group,
        Shape::Cylinder {
            radius: 0.03,
            half_height: 1.0,
        },
        Vec3::new(0.0, half.y + 1.0, 0.0),
        0x888888,
    ));
    parts.push(child(
        b,
        group,
        cuboid(Vec3::new(0.4, 0.3, 0.01)),
        Vec3::new(0.45, half.y + 1.7, 0.0),
        0xff0000,
    ));

    Built {
        body,
        visual: Visual { root: group, parts },
        state: KindState::Triggerable { triggered: false },
        params: BuildParams::None,
    }
}

/// Fresh random heading and dwell time
fn wander_start(b: &mut Build<'_>) -> (Vec2, f32) {
    let heading = agents::random_heading(b.rng);
    let dwell = super::uniform(b.rng, b.tuning.agents.dwell_min, b.tuning.agents.dwell_max);
    (heading, dwell)
}

pub fn penguin(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half_height = PENGUIN_HEIGHT * 0.5;
    let position = base + Vec3::Y * half_height;
    let (heading, timer) = wander_start(b);
    let rotation = yaw_rotation(agents::heading_yaw(heading));
    let body = b.physics.add_body(
        &body_desc(
            ObjectKind::Penguin,
            Collider::Cylinder {
                radius: PENGUIN_RADIUS,
                half_height,
            },
            position,
        )
        .with_rotation(rotation)
        .with_damping(0.5, 0.5),
    );

    let group = b
        .render
        .create_node(&NodeDesc::group(position).with_rotation(rotation));
    let torso = child(
        b,
        group,
        Shape::Cylinder {
            radius: PENGUIN_RADIUS,
            half_height,
        },
        Vec3::ZERO,
        spec(ObjectKind::Penguin).color.0,
    );
    let head = child(b, group, Shape::Ball { radius: 0.25 }, Vec3::new(0.0, 0.45, 0.0), 0x1a1a1a);
    let beak = child(
        b,
        group,
        Shape::Cone {
            radius: 0.06,
            height: 0.15,
        },
        Vec3::new(0.0, 0.55, 0.2),
        0xffa500,
    );

    Built {
        body,
        visual: Visual {
            root: group,
            parts: vec![torso, head, beak],
        },
        state: KindState::Patrolling(Patrol {
            heading,
            timer,
            graze: None,
        }),
        params: BuildParams::None,
    }
}

pub fn cow(b: &mut Build<'_>, base: Vec3, _params: &BuildParams) -> Built {
    let half = COW_HALF_EXTENTS;
    let position = base + Vec3::Y * half.y;
    let (heading, timer) = wander_start(b);
    let rotation = yaw_rotation(agents::heading_yaw(heading));
    let body = b.physics.add_body(
        &body_desc(ObjectKind::Cow, cuboid_collider(half), position)
            .with_rotation(rotation)
            .with_damping(0.6, 0.6),
    );

    let white = spec(ObjectKind::Cow).color.0;
    let group = b
        .render
        .create_node(&NodeDesc::group(position).with_rotation(rotation));
    let torso = child(
        b,
        group,
        cuboid(Vec3::new(half.x, 0.3, half.z)),
        Vec3::new(0.0, 0.1, 0.0),
        white,
    );
    let head = b
        .render
        .create_node(&NodeDesc::group(Vec3::new(0.0, 0.2, half.z)).child_of(group));
    let face = child(b, head, cuboid(Vec3::splat(0.2)), Vec3::new(0.0, 0.0, 0.15), white);
    let mut parts = vec![torso, face];
    for (x, z) in [(-0.25, 0.4), (0.25, 0.4), (-0.25, -0.4), (0.25, -0.4)] {
        parts.push(child(
            b,
            group,
            Shape::Cylinder {
                radius: 0.08,
                half_height: 0.25,
            },
            Vec3::new(x, -0.25, z),
            0x000000,
        ));
    }

    Built {
        body,
        visual: Visual { root: group, parts },
        state: KindState::Patrolling(Patrol {
            heading,
            timer,
            graze: Some(Graze {
                head,
                grazing: false,
                remaining: 0.0,
            }),
        }),
        params: BuildParams::None,
    }
}

/// Kinematic car on the track; the placement point is ignored
pub fn vehicle(b: &mut Build<'_>, _base: Vec3, params: &BuildParams) -> Built {
    let angle = match *params {
        BuildParams::Vehicle { angle } => angle,
        _ => b.tuning.orbit.start_angle,
    }
    .rem_euclid(std::f32::consts::TAU);
    let (position, rotation) = orbit::pose_at(angle, &b.tuning.orbit);
    let half = VEHICLE_SIZE * 0.5;
    let body = b.physics.add_body(
        &body_desc(ObjectKind::Vehicle, cuboid_collider(half), position).with_rotation(rotation),
    );

    let group = b
        .render
        .create_node(&NodeDesc::group(position).with_rotation(rotation));
    let car = child(b, group, cuboid(Vec3::new(half.x, 0.5, half.z)), Vec3::ZERO, 0xffffff);
    let stripe = child(
        b,
        group,
        cuboid(Vec3::new(half.x, 0.05, half.z + 0.01)),
        Vec3::new(0.0, -0.1, 0.0),
        spec(ObjectKind::Vehicle).color.0,
    );

    Built {
        body,
        visual: Visual {
            root: group,
            parts: vec![car, stripe],
        },
        state: KindState::Orbiting(Orbit {
            angle,
            speed: b.tuning.orbit.angular_speed,
        }),
        params: BuildParams::Vehicle { angle },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessPhysics, HeadlessRender};
    use rand::SeedableRng;

    fn with_build<T>(f: impl FnOnce(&mut Build<'_>) -> T) -> (T, HeadlessPhysics, HeadlessRender) {
        let mut physics = HeadlessPhysics::new();
        let mut render = HeadlessRender::new();
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = Tuning::default();
        let out = {
            let mut b = Build {
                physics: &mut physics,
                render: &mut render,
                rng: &mut rng,
                tuning: &tuning,
            };
            f(&mut b)
        };
        (out, physics, render)
    }

    #[test]
    fn test_domino_stands_on_placement_point() {
        let (built, physics, _) =
            with_build(|b| domino(b, Vec3::new(1.0, 0.0, 2.0), &BuildParams::None));
        let (pos, rot) = physics.pose(built.body).unwrap();
        assert!((pos - Vec3::new(1.0, 0.4, 2.0)).length() < 1e-6);
        assert_eq!(rot, Quat::IDENTITY);
        assert_eq!(physics.mass(built.body), Some(0.3));
        match built.state {
            KindState::Returnable(r) => assert_eq!(r.rest_position(), pos),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_seesaw_owns_pivot_and_joint() {
        let (built, physics, render) = with_build(|b| seesaw(b, Vec3::ZERO, &BuildParams::None));
        assert!(matches!(built.state, KindState::Hinged(_)));
        assert_eq!(physics.body_count(), 2);
        assert_eq!(physics.constraint_count(), 1);
        assert_eq!(render.node_count(), 2);
    }

    #[test]
    fn test_stairs_one_body_per_step() {
        let params = BuildParams::Stairs {
            start: Vec3::new(0.0, 0.2, 0.0),
            end: Vec3::new(3.0, 2.2, 0.0),
            step: StepSize {
                width: 2.5,
                height: 0.5,
                depth: 0.8,
            },
        };
        let (built, physics, _) = with_build(|b| stairs(b, Vec3::ZERO, &params));
        let KindState::MultiBody(steps) = &built.state else {
            panic!("stairs must be multi-body");
        };
        // 2.0 rise / 0.5 step height
        assert_eq!(steps.len(), 4);
        assert_eq!(physics.body_count(), 4);
        assert_eq!(built.body, steps[0].body);
        assert!(steps.iter().all(|s| physics.mass(s.body) == Some(0.0)));
        assert_eq!(built.visual.parts.len(), 4);
    }

    #[test]
    fn test_stairs_step_count_is_capped() {
        let params = BuildParams::Stairs {
            start: Vec3::ZERO,
            end: Vec3::new(1.0, 1e30, 1.0),
            step: StepSize::default(),
        };
        let (built, physics, _) = with_build(|b| stairs(b, Vec3::ZERO, &params));
        let KindState::MultiBody(steps) = &built.state else {
            panic!("stairs must be multi-body");
        };
        assert_eq!(steps.len(), MAX_STAIR_STEPS);
        assert_eq!(physics.body_count(), MAX_STAIR_STEPS);
    }

    #[test]
    fn test_guardrail_mass_from_volume() {
        let params = BuildParams::Guardrail {
            length: 4.0,
            height: 0.5,
            yaw: 0.3,
        };
        let (built, physics, _) = with_build(|b| guardrail(b, Vec3::ZERO, &params));
        let mass = physics.mass(built.body).unwrap();
        assert!((mass - 4.0 * 0.5 * 0.1 * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_launch_sphere_rolls() {
        let (built, mut physics, _) =
            with_build(|b| sphere(b, Vec3::new(0.0, 0.2, 0.0), &BuildParams::None));
        launch_sphere(&mut physics, built.body, Vec3::new(10.0, 0.0, 2.0));
        let state = physics.body(built.body).unwrap();
        assert_eq!(state.velocity, Vec3::new(10.0, 0.0, 2.0));
        assert!((state.angular_velocity - Vec3::new(-10.0, 0.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_road_spans_endpoints() {
        let params = BuildParams::Road {
            start: Vec3::new(0.0, 0.0, 0.0),
            end: Vec3::new(4.0, 0.0, -3.0),
            width: 1.5,
            height: 0.1,
        };
        let (built, physics, _) = with_build(|b| road(b, Vec3::ZERO, &params));
        let (pos, rot) = physics.pose(built.body).unwrap();
        assert!((pos - Vec3::new(2.0, 0.05, -1.5)).length() < 1e-5);
        let along = rot * Vec3::X;
        assert!((along - Vec3::new(0.8, 0.0, -0.6)).length() < 1e-5);
    }
}
