//! Scene snapshots
//!
//! - `snapshot`: versioned JSON model, validation, capture and restore
//! - `storage`: one local slot (browser LocalStorage or a JSON file)
//!
//! A snapshot is parsed and validated in full before the live scene is
//! touched, so a rejected load leaves the scene exactly as it was.

pub mod snapshot;
pub mod storage;

pub use snapshot::{EntryParams, LoadReport, SNAPSHOT_VERSION, Snapshot, SnapshotEntry, Xyz, Xyzw};
pub use storage::{SCENE_STORAGE_KEY, SnapshotStore};
