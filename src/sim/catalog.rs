//! Object catalog
//!
//! One row per kind: placement footprint, body mass, surface material, base
//! colour and the factory that builds it. Placement, recovery, persistence
//! and the add actions all read kind metadata from here.

use glam::{Vec2, Vec3};

use super::factory::{self, Factory};
use super::kind::ObjectKind;
use super::object::{BuildParams, StepSize};
use crate::engine::{MaterialId, SurfaceMaterial};

/// Static metadata of one kind
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub kind: ObjectKind,
    /// Nominal ground footprint (x width, z depth), independent of yaw
    pub footprint: Vec2,
    /// Mass with default parameters; zero means fixed
    pub mass: f32,
    pub material: SurfaceMaterial,
    pub color: MaterialId,
    /// Survives a snapshot round trip
    pub persisted: bool,
    pub factory: Factory,
}

static CATALOG: [KindSpec; 16] = [
    KindSpec {
        kind: ObjectKind::Sphere,
        footprint: Vec2::ZERO,
        mass: 1.0,
        material: SurfaceMaterial::new(0.05, 0.6),
        color: MaterialId(0x00ff00),
        persisted: false,
        factory: factory::sphere,
    },
    KindSpec {
        kind: ObjectKind::Domino,
        footprint: Vec2::new(0.1, 0.3),
        mass: 0.3,
        material: SurfaceMaterial::new(0.2, 0.6),
        color: MaterialId(0xff6b6b),
        persisted: true,
        factory: factory::domino,
    },
    KindSpec {
        kind: ObjectKind::Ramp,
        footprint: Vec2::new(3.0, 2.0),
        mass: 0.0,
        material: SurfaceMaterial::new(0.1, 0.6),
        color: MaterialId(0x4ecdc4),
        persisted: true,
        factory: factory::ramp,
    },
    KindSpec {
        kind: ObjectKind::Box,
        footprint: Vec2::new(0.5, 0.5),
        mass: 0.5,
        material: SurfaceMaterial::new(0.6, 0.4),
        color: MaterialId(0xffd93d),
        persisted: true,
        factory: factory::block,
    },
    KindSpec {
        kind: ObjectKind::Seesaw,
        footprint: Vec2::new(4.0, 0.5),
        mass: 1.0,
        material: SurfaceMaterial::new(0.6, 0.3),
        color: MaterialId(0x9b59b6),
        persisted: true,
        factory: factory::seesaw,
    },
    KindSpec {
        kind: ObjectKind::Mountain,
        footprint: Vec2::new(6.0, 6.0),
        mass: 0.0,
        material: SurfaceMaterial::new(0.8, 0.1),
        color: MaterialId(0x6b5b52),
        persisted: true,
        factory: factory::mountain,
    },
    KindSpec {
        kind: ObjectKind::Shrine,
        footprint: Vec2::new(2.0, 1.5),
        mass: 0.0,
        material: SurfaceMaterial::new(0.6, 0.2),
        color: MaterialId(0xd4a574),
        persisted: true,
        factory: factory::shrine,
    },
    KindSpec {
        kind: ObjectKind::Road,
        footprint: Vec2::new(1.5, 1.5),
        mass: 0.0,
        material: SurfaceMaterial::new(0.3, 0.1),
        color: MaterialId(0x4a4a4a),
        persisted: true,
        factory: factory::road,
    },
    KindSpec {
        kind: ObjectKind::Plank,
        footprint: Vec2::new(4.0, 1.5),
        mass: 0.0,
        material: SurfaceMaterial::new(0.3, 0.1),
        color: MaterialId(0x8b6914),
        persisted: true,
        factory: factory::plank,
    },
    KindSpec {
        kind: ObjectKind::Guardrail,
        footprint: Vec2::new(3.0, 0.1),
        mass: 0.3,
        material: SurfaceMaterial::new(0.5, 0.4),
        color: MaterialId(0xc0c0c0),
        persisted: true,
        factory: factory::guardrail,
    },
    KindSpec {
        kind: ObjectKind::Stairs,
        footprint: Vec2::new(1.5, 0.5),
        mass: 0.0,
        material: SurfaceMaterial::new(0.3, 0.1),
        color: MaterialId(0xaa9a8a),
        persisted: true,
        factory: factory::stairs,
    },
    KindSpec {
        kind: ObjectKind::Trampoline,
        footprint: Vec2::new(3.0, 3.0),
        mass: 0.0,
        material: SurfaceMaterial::new(0.1, 1.5),
        color: MaterialId(0xff69b4),
        persisted: true,
        factory: factory::trampoline,
    },
    KindSpec {
        kind: ObjectKind::Goal,
        footprint: Vec2::new(2.0, 2.0),
        mass: 0.0,
        material: SurfaceMaterial::new(0.3, 0.3),
        color: MaterialId(0xffd700),
        persisted: true,
        factory: factory::goal,
    },
    KindSpec {
        kind: ObjectKind::Penguin,
        footprint: Vec2::ZERO,
        mass: 1.0,
        material: SurfaceMaterial::new(0.5, 0.3),
        color: MaterialId(0x1a1a1a),
        persisted: true,
        factory: factory::penguin,
    },
    KindSpec {
        kind: ObjectKind::Cow,
        footprint: Vec2::ZERO,
        mass: 5.0,
        material: SurfaceMaterial::new(0.7, 0.2),
        color: MaterialId(0xffffff),
        persisted: true,
        factory: factory::cow,
    },
    KindSpec {
        kind: ObjectKind::Vehicle,
        footprint: Vec2::ZERO,
        mass: 0.0,
        material: SurfaceMaterial::new(0.3, 0.3),
        color: MaterialId(0x0066cc),
        persisted: true,
        factory: factory::vehicle,
    },
];

/// Catalog row for a kind
pub fn spec(kind: ObjectKind) -> &'static KindSpec {
    &CATALOG[kind as usize]
}

/// Parameters used when an add action or a snapshot entry supplies none
pub fn default_params(kind: ObjectKind) -> BuildParams {
    match kind {
        ObjectKind::Plank => BuildParams::Plank {
            length: 4.0,
            width: 1.5,
            height: 0.2,
            yaw: 0.0,
        },
        ObjectKind::Guardrail => BuildParams::Guardrail {
            length: 3.0,
            height: 0.5,
            yaw: 0.0,
        },
        ObjectKind::Mountain => BuildParams::Mountain {
            height: 5.0,
            radius: 3.0,
        },
        ObjectKind::Road => BuildParams::Road {
            start: Vec3::new(-2.0, 0.0, -2.0),
            end: Vec3::new(2.0, 0.0, 2.0),
            width: 1.5,
            height: 0.1,
        },
        ObjectKind::Stairs => BuildParams::Stairs {
            start: Vec3::new(0.0, 0.2, 0.0),
            end: Vec3::new(2.0, 2.2, 2.0),
            step: StepSize::default(),
        },
        ObjectKind::Vehicle => BuildParams::Vehicle { angle: 0.0 },
        _ => BuildParams::None,
    }
}

/// Height of the primary body's centre above the placement point
///
/// Factories take a ground-level placement point and lift the body by this
/// much; restoring a saved body position subtracts it again.
pub fn anchor_height(kind: ObjectKind, params: &BuildParams) -> f32 {
    match (kind, params) {
        (ObjectKind::Plank, BuildParams::Plank { height, .. }) => height * 0.5,
        (ObjectKind::Guardrail, BuildParams::Guardrail { height, .. }) => height * 0.5,
        (ObjectKind::Mountain, BuildParams::Mountain { height, .. }) => height * 0.5,
        (ObjectKind::Domino, _) => crate::consts::DOMINO_HEIGHT * 0.5,
        (ObjectKind::Ramp, _) => factory::RAMP_SIZE.y * 0.5,
        (ObjectKind::Box, _) => factory::BOX_SIZE * 0.5,
        (ObjectKind::Seesaw, _) => factory::SEESAW_PIVOT_HALF.y + factory::SEESAW_PLANK.y * 0.5,
        (ObjectKind::Shrine, _) => factory::SHRINE_SIZE.y * 0.5,
        (ObjectKind::Trampoline, _) => factory::TRAMPOLINE_THICKNESS * 0.5,
        (ObjectKind::Goal, _) => crate::consts::GOAL_HEIGHT * 0.5,
        (ObjectKind::Penguin, _) => factory::PENGUIN_HEIGHT * 0.5,
        (ObjectKind::Cow, _) => factory::COW_HALF_EXTENTS.y,
        (ObjectKind::Vehicle, _) => factory::VEHICLE_SIZE.y * 0.5,
        _ => 0.0,
    }
}

/// Whether two kinds' footprints (with `buffer` added to each) overlap at the
/// given ground positions
pub fn footprints_overlap(a: ObjectKind, pa: Vec2, b: ObjectKind, pb: Vec2, buffer: f32) -> bool {
    let ha = spec(a).footprint * 0.5 + Vec2::splat(buffer);
    let hb = spec(b).footprint * 0.5 + Vec2::splat(buffer);
    let d = (pa - pb).abs();
    d.x < ha.x + hb.x && d.y < ha.y + hb.y
}
