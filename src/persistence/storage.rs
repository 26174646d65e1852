//! Single local snapshot slot
//!
//! Browser builds keep the JSON in LocalStorage; native builds write
//! `<dir>/<key>.json`.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use super::snapshot::Snapshot;
use crate::error::SnapshotError;

/// Storage key of the saved scene
pub const SCENE_STORAGE_KEY: &str = "marble_contraption_scene";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    key: String,
    #[cfg(not(target_arch = "wasm32"))]
    dir: PathBuf,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(SCENE_STORAGE_KEY)
    }
}

impl SnapshotStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            #[cfg(not(target_arch = "wasm32"))]
            dir: PathBuf::from("."),
        }
    }

    /// Keep the snapshot file in `dir` instead of the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Result<web_sys::Storage, SnapshotError> {
        web_sys::window()
            .ok_or_else(|| SnapshotError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| SnapshotError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| SnapshotError::Storage("LocalStorage unavailable".into()))
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_string(snapshot)?;
        Self::local_storage()?
            .set_item(&self.key, &json)
            .map_err(|e| SnapshotError::Storage(format!("{:?}", e)))?;
        log::info!("Scene saved ({} objects)", snapshot.objects.len());
        Ok(())
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(&self) -> Result<Snapshot, SnapshotError> {
        let json = Self::local_storage()?
            .get_item(&self.key)
            .map_err(|e| SnapshotError::Storage(format!("{:?}", e)))?
            .ok_or(SnapshotError::NotFound)?;
        Snapshot::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let path = self.path();
        std::fs::write(&path, snapshot.to_json()?)?;
        log::info!("Scene saved to {} ({} objects)", path.display(), snapshot.objects.len());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(&self) -> Result<Snapshot, SnapshotError> {
        let json = match std::fs::read_to_string(self.path()) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SnapshotError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        Snapshot::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{SNAPSHOT_VERSION, Xyz};
    use tempfile::tempdir;

    fn snapshot() -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION.into(),
            timestamp: 1.0,
            launch_velocity: Xyz { x: 1.0, y: 2.0, z: 3.0 },
            last_sphere_count: 4,
            objects: Vec::new(),
        }
    }

    #[test]
    fn test_missing_slot_is_not_found() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::default().with_dir(dir.path());
        assert!(matches!(store.load(), Err(SnapshotError::NotFound)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new("slot").with_dir(dir.path());
        store.save(&snapshot()).unwrap();
        assert!(dir.path().join("slot.json").exists());
        assert_eq!(store.load().unwrap(), snapshot());
    }

    #[test]
    fn test_corrupt_slot_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::default().with_dir(dir.path());
        std::fs::write(dir.path().join(format!("{}.json", SCENE_STORAGE_KEY)), "not json").unwrap();
        assert!(matches!(store.load(), Err(SnapshotError::Parse(_))));
    }
}
