//! Marble Contraption - chain-reaction sandbox on a circular arena
//!
//! Core modules:
//! - `sim`: Scene state, object catalog, per-frame controllers
//! - `engine`: Render/physics boundary traits plus a headless implementation
//! - `sandbox`: Frame orchestrator and user-facing actions
//! - `persistence`: Snapshot save/load with validation
//! - `tuning`: Data-driven behaviour constants

pub mod engine;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod sandbox;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::SnapshotError;
pub use sandbox::Sandbox;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::{Quat, Vec2, Vec3};

/// Scene configuration constants
pub mod consts {
    /// Fixed simulation timestep (one physics step per rendered frame)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Arena ground disk
    pub const ARENA_RADIUS: f32 = 25.0;
    pub const GROUND_LEVEL: f32 = 0.0;
    pub const GRAVITY: f32 = -9.82;

    /// Sphere defaults
    pub const SPHERE_RADIUS: f32 = 0.2;
    pub const MIN_SPHERES: u32 = 1;
    pub const MAX_SPHERES: u32 = 50;
    /// Spheres start inside a square of this half-size around the origin
    pub const SPHERE_SPAWN_HALF_EXTENT: f32 = 5.0;

    /// Domino box (width x height x depth)
    pub const DOMINO_WIDTH: f32 = 0.1;
    pub const DOMINO_HEIGHT: f32 = 0.8;
    pub const DOMINO_DEPTH: f32 = 0.3;
    pub const DOMINO_ROW_SPACING: f32 = 0.3;

    /// Goal open box
    pub const GOAL_WIDTH: f32 = 2.0;
    pub const GOAL_HEIGHT: f32 = 1.0;
    pub const GOAL_DEPTH: f32 = 2.0;

    /// Most steps one staircase may have
    pub const MAX_STAIR_STEPS: usize = 200;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotation about +Y only (no pitch or roll)
#[inline]
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_axis_angle(Vec3::Y, yaw)
}

/// Project a world position onto the ground plane (x, z)
#[inline]
pub fn ground_point(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Orientation similarity of two rotations in [0, 1]; q and -q compare equal
#[inline]
pub fn rotation_similarity(a: Quat, b: Quat) -> f32 {
    a.dot(b).abs()
}

#[cfg(target_arch = "wasm32")]
mod wasm_entry {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(start)]
    pub fn start() {
        crate::platform::init_logging();
        log::info!("Marble Contraption core loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle_wraps() {
        use std::f32::consts::PI;
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_similarity_ignores_sign() {
        let q = yaw_rotation(0.7);
        assert!((rotation_similarity(q, -q) - 1.0).abs() < 1e-6);
        assert!(rotation_similarity(q, Quat::IDENTITY) < 1.0);
    }
}
