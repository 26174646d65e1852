//! User tunables driven by the control panel
//!
//! Persisted separately from scene snapshots, and also copied into every
//! snapshot so an exported arrangement replays with the same launch.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SPHERES, MIN_SPHERES};
use crate::error::SnapshotError;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

/// Per-axis limit of the launch velocity sliders
pub const LAUNCH_AXIS_LIMIT: f32 = 20.0;

/// Launch settings for spheres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Initial velocity given to every dropped sphere
    pub launch_velocity: Vec3,
    /// Number of spheres dropped per release
    pub sphere_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            launch_velocity: Vec3::new(10.0, 0.0, 0.0),
            sphere_count: 1,
        }
    }
}

impl Settings {
    /// Set one slider axis (0 = x, 1 = y, 2 = z), clamped to the slider range
    pub fn set_launch_axis(&mut self, axis: usize, value: f32) {
        let value = if value.is_finite() {
            value.clamp(-LAUNCH_AXIS_LIMIT, LAUNCH_AXIS_LIMIT)
        } else {
            0.0
        };
        match axis {
            0 => self.launch_velocity.x = value,
            1 => self.launch_velocity.y = value,
            2 => self.launch_velocity.z = value,
            _ => log::warn!("Ignoring launch velocity for axis {}", axis),
        }
    }

    /// Set the launch velocity, clamping each axis
    pub fn set_launch_velocity(&mut self, velocity: Vec3) {
        for (axis, value) in velocity.to_array().into_iter().enumerate() {
            self.set_launch_axis(axis, value);
        }
    }

    /// Set the requested sphere count, clamped to the supported range
    pub fn set_sphere_count(&mut self, count: u32) {
        self.sphere_count = count.clamp(MIN_SPHERES, MAX_SPHERES);
    }

    /// Storage key
    const STORAGE_KEY: &'static str = "marble_contraption_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SnapshotError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| SnapshotError::Storage("LocalStorage unavailable".into()))?;
        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| SnapshotError::Storage(format!("{:?}", e)))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load settings from a JSON file next to the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = format!("{}.json", Self::STORAGE_KEY);
        match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings in {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), SnapshotError> {
        self.save_in(Path::new("."))
    }

    /// Write the settings file into `dir`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_in(&self, dir: &Path) -> Result<(), SnapshotError> {
        let path = dir.join(format!("{}.json", Self::STORAGE_KEY));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
