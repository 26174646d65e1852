//! Data-driven behaviour constants
//!
//! Every controller reads its constants from here rather than from literals,
//! so a tuning file can be swapped without touching the simulation code.
//! Missing fields in a tuning file fall back to the defaults below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ARENA_RADIUS;

/// Autonomous righting of dominoes and guardrails
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryTuning {
    /// Fraction of the remaining gap closed per tick
    pub lerp_factor: f32,
    /// Displacement beyond this counts as fallen
    pub detect_distance: f32,
    /// Rotation similarity below this counts as fallen
    pub detect_similarity: f32,
    /// Snap to rest once closer than this...
    pub settle_distance: f32,
    /// ...and more similar than this
    pub settle_similarity: f32,
    /// Velocity multiplier applied every returning tick
    pub velocity_damping: f32,
}

impl Default for RecoveryTuning {
    fn default() -> Self {
        Self {
            lerp_factor: 0.02,
            detect_distance: 0.1,
            detect_similarity: 0.9,
            settle_distance: 0.05,
            settle_similarity: 0.98,
            velocity_damping: 0.9,
        }
    }
}

/// Rectangular grazing area on the ground plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pasture {
    pub center: Vec2,
    pub size: Vec2,
}

impl Pasture {
    pub fn contains(&self, p: Vec2) -> bool {
        let half = self.size * 0.5;
        p.x >= self.center.x - half.x
            && p.x <= self.center.x + half.x
            && p.y >= self.center.y - half.y
            && p.y <= self.center.y + half.y
    }
}

/// Penguin and cow wandering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    pub penguin_speed: f32,
    pub cow_speed: f32,
    /// Heading dwell time range (seconds)
    pub dwell_min: f32,
    pub dwell_max: f32,
    /// Distance inside the arena edge at which agents turn back
    pub boundary_margin: f32,
    /// Dwell assigned after a forced turn-back
    pub boundary_dwell: f32,
    /// Grazing duration range (seconds)
    pub graze_min: f32,
    pub graze_max: f32,
    pub pasture: Pasture,
    /// Head pitch while grazing (radians, negative = down)
    pub head_tilt: f32,
    /// Oscillation amplitude around the tilt
    pub head_bob: f32,
    /// Oscillation rate (radians per second)
    pub head_bob_rate: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            penguin_speed: 1.5,
            cow_speed: 1.0,
            dwell_min: 2.0,
            dwell_max: 5.0,
            boundary_margin: 2.0,
            boundary_dwell: 3.0,
            graze_min: 3.0,
            graze_max: 8.0,
            pasture: Pasture {
                center: Vec2::new(10.0, 10.0),
                size: Vec2::new(10.0, 10.0),
            },
            head_tilt: -0.3,
            head_bob: 0.03,
            head_bob_rate: 5.0,
        }
    }
}

/// Circling vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitTuning {
    pub track_radius: f32,
    pub ride_height: f32,
    /// Radians added per tick
    pub angular_speed: f32,
    /// Added to the path angle before mapping to the circle, so angle 0
    /// starts at -Z
    pub phase_offset: f32,
    /// Path angle for freshly synthesized vehicles
    pub start_angle: f32,
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            track_radius: ARENA_RADIUS + 0.5,
            ride_height: 0.8,
            angular_speed: 0.02,
            phase_offset: -std::f32::consts::FRAC_PI_2,
            start_angle: std::f32::consts::FRAC_PI_4,
        }
    }
}

/// Goal fireworks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkTuning {
    /// Initial upward speed of the launch particle (units/s)
    pub launch_speed: f32,
    /// Vertical acceleration shared by every particle (units/s²)
    pub gravity: f32,
    /// Explosion altitude above the goal mouth, drawn per launch
    pub altitude_min: f32,
    pub altitude_max: f32,
    pub particles_per_explosion: usize,
    /// Explosion particle speed range (units/s)
    pub speed_min: f32,
    pub speed_max: f32,
    /// Explosion particle lifetime in ticks
    pub lifetime_ticks: u32,
    /// Fraction of lifetime (at the end) spent fading out
    pub fade_fraction: f32,
    /// Scale at zero opacity; full opacity is scale 1
    pub min_scale: f32,
    /// Explosion colours (0xRRGGBB)
    pub palette: Vec<u32>,
}

impl Default for FireworkTuning {
    fn default() -> Self {
        Self {
            launch_speed: 12.0,
            gravity: -4.0,
            altitude_min: 8.0,
            altitude_max: 15.0,
            particles_per_explosion: 300,
            speed_min: 8.0,
            speed_max: 20.0,
            lifetime_ticks: 400,
            fade_fraction: 0.3,
            min_scale: 0.3,
            palette: vec![0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff],
        }
    }
}

/// Free-spot search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    /// Margin added around every footprint before comparison
    pub buffer: f32,
    /// Grid fallback step for single objects
    pub grid_step: f32,
    /// Grid fallback step for domino rows
    pub row_grid_step: f32,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            buffer: 0.2,
            grid_step: 1.0,
            row_grid_step: 0.5,
        }
    }
}

/// All behaviour constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub recovery: RecoveryTuning,
    pub agents: AgentTuning,
    pub orbit: OrbitTuning,
    pub fireworks: FireworkTuning,
    pub placement: PlacementTuning,
}

impl Tuning {
    /// Parse a tuning file; absent sections and fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
