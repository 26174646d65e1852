//! Initial arrangement and always-present fixtures
//!
//! A fresh arena gets a mountain with a shrine on its summit, a road and a
//! staircase down its flank, the pasture, a few penguins, a herd of cows and
//! the vehicle on its track. After a snapshot load the same fixtures are
//! synthesized again if the snapshot lacked them.

use glam::Vec3;

use super::kind::ObjectKind;
use super::object::{BuildParams, StepSize};
use super::scene::Scene;
use super::uniform;
use crate::engine::{MaterialId, NodeDesc, PhysicsWorld, RenderScene, Shape};

const MOUNTAIN_SITE: Vec3 = Vec3::new(-8.0, 0.0, -8.0);
const MOUNTAIN_HEIGHT: f32 = 5.0;
const MOUNTAIN_RADIUS: f32 = 3.0;
const PENGUINS: usize = 3;
/// Penguins start inside a square of this half-size around the origin
const PENGUIN_SPREAD: f32 = 10.0;
const COWS: usize = 10;
/// Cows start within this distance (per axis) of the pasture centre
const COW_SPREAD: f32 = 4.0;
const PASTURE_COLOR: MaterialId = MaterialId(0x228b22);

/// Populate an empty scene with the default arrangement
pub fn initial_scene(
    scene: &mut Scene,
    physics: &mut dyn PhysicsWorld,
    render: &mut dyn RenderScene,
) {
    reconcile(scene, physics, render);

    let summit = MOUNTAIN_SITE + Vec3::Y * MOUNTAIN_HEIGHT;
    let road = BuildParams::Road {
        start: Vec3::new(summit.x + 1.0, summit.y, summit.z + 1.0),
        end: Vec3::new(-3.5, 0.0, -3.5),
        width: 1.5,
        height: 0.1,
    };
    scene.spawn(physics, render, ObjectKind::Road, Vec3::ZERO, &road);

    let stairs = BuildParams::Stairs {
        start: Vec3::new(-6.5, summit.y - 0.5, -8.5),
        end: Vec3::new(-3.0, 0.2, -5.0),
        step: StepSize {
            width: 2.5,
            height: 0.5,
            depth: 0.8,
        },
    };
    scene.spawn(physics, render, ObjectKind::Stairs, Vec3::ZERO, &stairs);

    log::info!("Initial scene built with {} objects", scene.len());
}

/// Synthesize any missing always-present fixture; returns what was added
pub fn reconcile(
    scene: &mut Scene,
    physics: &mut dyn PhysicsWorld,
    render: &mut dyn RenderScene,
) -> Vec<ObjectKind> {
    let mut added = Vec::new();

    if scene.count(ObjectKind::Mountain) == 0 {
        let params = BuildParams::Mountain {
            height: MOUNTAIN_HEIGHT,
            radius: MOUNTAIN_RADIUS,
        };
        scene.spawn(physics, render, ObjectKind::Mountain, MOUNTAIN_SITE, &params);
        added.push(ObjectKind::Mountain);
    }

    if scene.count(ObjectKind::Shrine) == 0 {
        let summit = MOUNTAIN_SITE + Vec3::Y * MOUNTAIN_HEIGHT;
        scene.spawn(physics, render, ObjectKind::Shrine, summit, &BuildParams::None);
        added.push(ObjectKind::Shrine);
    }

    if scene.count(ObjectKind::Penguin) == 0 {
        for _ in 0..PENGUINS {
            let x = uniform(&mut scene.rng, -PENGUIN_SPREAD, PENGUIN_SPREAD);
            let z = uniform(&mut scene.rng, -PENGUIN_SPREAD, PENGUIN_SPREAD);
            scene.spawn(
                physics,
                render,
                ObjectKind::Penguin,
                Vec3::new(x, 0.0, z),
                &BuildParams::None,
            );
            added.push(ObjectKind::Penguin);
        }
    }

    if scene.count(ObjectKind::Cow) == 0 {
        let center = scene.tuning.agents.pasture.center;
        for _ in 0..COWS {
            let x = center.x + uniform(&mut scene.rng, -COW_SPREAD, COW_SPREAD);
            let z = center.y + uniform(&mut scene.rng, -COW_SPREAD, COW_SPREAD);
            scene.spawn(physics, render, ObjectKind::Cow, Vec3::new(x, 0.0, z), &BuildParams::None);
            added.push(ObjectKind::Cow);
        }
    }

    if scene.count(ObjectKind::Vehicle) == 0 {
        let params = BuildParams::Vehicle {
            angle: scene.tuning.orbit.start_angle,
        };
        scene.spawn(physics, render, ObjectKind::Vehicle, Vec3::ZERO, &params);
        added.push(ObjectKind::Vehicle);
    }

    if scene.decorations().is_empty() {
        let pasture = scene.tuning.agents.pasture;
        let half = pasture.size * 0.5;
        let node = render.create_node(&NodeDesc::new(
            Shape::Cuboid {
                half_extents: Vec3::new(half.x, 0.01, half.y),
            },
            Vec3::new(pasture.center.x, 0.01, pasture.center.y),
            PASTURE_COLOR,
        ));
        scene.add_decoration(node);
    }

    if !added.is_empty() {
        log::info!("Synthesized {} missing fixtures", added.len());
    }
    added
}
