//! Versioned snapshot model
//!
//! JSON layout:
//! `{ version, timestamp, launchVelocity, lastSphereCount, objects: [ { kind,
//! position, rotation, params? } ] }`. Field names of the older format
//! (`type`, `ballInitialSpeed`, `ballCount`) are accepted on input.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::engine::{PhysicsWorld, RenderScene};
use crate::consts::MAX_STAIR_STEPS;
use crate::error::SnapshotError;
use crate::platform;
use crate::sim::catalog::{anchor_height, default_params, spec};
use crate::sim::{BuildParams, ObjectKind, PlacedObject, Scene, StepSize, bootstrap, orbit};

/// Format version written by this build
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Half-diagonal used to rebuild a road around its saved centre
const ROAD_HALF_SPAN: Vec3 = Vec3::new(2.0, 0.0, 2.0);

/// Smallest quaternion length accepted before normalizing
const MIN_ROTATION_LENGTH: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Xyz {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Xyz> for Vec3 {
    fn from(v: Xyz) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyzw {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl From<Quat> for Xyzw {
    fn from(q: Quat) -> Self {
        Self {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
    }
}

impl From<Xyzw> for Quat {
    fn from(q: Xyzw) -> Self {
        Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

/// Kind-specific reconstruction parameters; absent fields use kind defaults
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_pos: Option<Xyz>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_pos: Option<Xyz>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mountain_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mountain_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_depth: Option<f32>,
}

impl EntryParams {
    /// Build parameters for `kind`, filling gaps from the kind's defaults
    pub fn to_build(&self, kind: ObjectKind) -> BuildParams {
        match default_params(kind) {
            BuildParams::Plank {
                length,
                width,
                height,
                yaw,
            } => BuildParams::Plank {
                length: self.length.unwrap_or(length),
                width: self.width.unwrap_or(width),
                height: self.height.unwrap_or(height),
                yaw: self.rotation_y.unwrap_or(yaw),
            },
            BuildParams::Guardrail { length, height, yaw } => BuildParams::Guardrail {
                length: self.length.unwrap_or(length),
                height: self.height.unwrap_or(height),
                yaw: self.rotation_y.unwrap_or(yaw),
            },
            BuildParams::Mountain { height, radius } => BuildParams::Mountain {
                height: self.mountain_height.unwrap_or(height),
                radius: self.mountain_radius.unwrap_or(radius),
            },
            BuildParams::Road {
                start,
                end,
                width,
                height,
            } => BuildParams::Road {
                start: self.start_pos.map_or(start, Vec3::from),
                end: self.end_pos.map_or(end, Vec3::from),
                width: self.width.unwrap_or(width),
                height: self.height.unwrap_or(height),
            },
            BuildParams::Stairs { start, end, step } => BuildParams::Stairs {
                start: self.start_pos.map_or(start, Vec3::from),
                end: self.end_pos.map_or(end, Vec3::from),
                step: StepSize {
                    width: self.step_width.unwrap_or(step.width),
                    height: self.step_height.unwrap_or(step.height),
                    depth: self.step_depth.unwrap_or(step.depth),
                },
            },
            BuildParams::Vehicle { angle } => BuildParams::Vehicle {
                angle: self.orbit_angle.unwrap_or(angle),
            },
            BuildParams::None => BuildParams::None,
        }
    }

    fn numbers(&self) -> Vec<f32> {
        let mut out: Vec<f32> = [
            self.length,
            self.width,
            self.height,
            self.rotation_y,
            self.mountain_height,
            self.mountain_radius,
            self.orbit_angle,
            self.step_width,
            self.step_height,
            self.step_depth,
        ]
        .into_iter()
        .flatten()
        .collect();
        for p in [self.start_pos, self.end_pos].into_iter().flatten() {
            out.extend([p.x, p.y, p.z]);
        }
        out
    }
}

/// One persisted object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    /// Kind tag; unknown tags are skipped on restore
    #[serde(alias = "type")]
    pub kind: String,
    pub position: Xyz,
    pub rotation: Xyzw,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<EntryParams>,
}

/// Serialized arrangement plus the launch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default = "default_launch_velocity", alias = "ballInitialSpeed")]
    pub launch_velocity: Xyz,
    #[serde(default = "default_sphere_count", alias = "ballCount")]
    pub last_sphere_count: u32,
    pub objects: Vec<SnapshotEntry>,
}

fn default_launch_velocity() -> Xyz {
    crate::Settings::default().launch_velocity.into()
}

fn default_sphere_count() -> u32 {
    crate::Settings::default().sphere_count
}

/// Outcome of a successful restore
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Entries rebuilt into the scene
    pub restored: usize,
    /// Kind tags that were skipped (unknown or never persisted)
    pub skipped: Vec<String>,
    /// Fixtures added because the snapshot lacked them
    pub synthesized: Vec<ObjectKind>,
}

impl Snapshot {
    /// Parse and validate snapshot JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Pretty-printed JSON for export
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject snapshots that could not be restored faithfully
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let major = self.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(SnapshotError::Invalid(format!(
                "unsupported version {:?}",
                self.version
            )));
        }
        if self.last_sphere_count == 0 {
            return Err(SnapshotError::Invalid("sphere count must be at least 1".into()));
        }
        let v = self.launch_velocity;
        if ![v.x, v.y, v.z].iter().all(|n| n.is_finite()) {
            return Err(SnapshotError::Invalid("launch velocity is not finite".into()));
        }
        for (i, entry) in self.objects.iter().enumerate() {
            let p = entry.position;
            let r = entry.rotation;
            let mut numbers = vec![p.x, p.y, p.z, r.x, r.y, r.z, r.w];
            if let Some(params) = &entry.params {
                numbers.extend(params.numbers());
            }
            if !numbers.iter().all(|n| n.is_finite()) {
                return Err(SnapshotError::Invalid(format!(
                    "object {} ({}) has a non-finite number",
                    i, entry.kind
                )));
            }
            if Quat::from(r).length() < MIN_ROTATION_LENGTH {
                return Err(SnapshotError::Invalid(format!(
                    "object {} ({}) has a degenerate rotation",
                    i, entry.kind
                )));
            }
            if ObjectKind::from_tag(&entry.kind) == Some(ObjectKind::Stairs) {
                validate_stairs(i, entry.params.as_ref())?;
            }
        }
        Ok(())
    }
}

fn validate_stairs(index: usize, params: Option<&EntryParams>) -> Result<(), SnapshotError> {
    let build = params.map_or_else(
        || default_params(ObjectKind::Stairs),
        |p| p.to_build(ObjectKind::Stairs),
    );
    let BuildParams::Stairs { start, end, step } = build else {
        return Ok(());
    };
    if !step.is_positive() {
        return Err(SnapshotError::Invalid(format!(
            "object {} (stairs) has a non-positive step size",
            index
        )));
    }
    let steps = step.steps_between(start, end);
    if steps > MAX_STAIR_STEPS as f32 {
        return Err(SnapshotError::Invalid(format!(
            "object {} (stairs) needs {} steps, more than {}",
            index, steps, MAX_STAIR_STEPS
        )));
    }
    Ok(())
}

/// Capture every persisted object and the launch settings
pub fn capture(scene: &Scene, physics: &dyn PhysicsWorld) -> Snapshot {
    let objects = scene
        .objects()
        .iter()
        .filter(|o| spec(o.kind).persisted)
        .filter_map(|o| {
            let (position, rotation) = scene.anchor_pose(physics, o.id)?;
            Some(SnapshotEntry {
                kind: o.kind.tag().to_string(),
                position: position.into(),
                rotation: rotation.into(),
                params: entry_params(o, position),
            })
        })
        .collect();

    Snapshot {
        version: SNAPSHOT_VERSION.to_string(),
        timestamp: platform::now_millis(),
        launch_velocity: scene.settings.launch_velocity.into(),
        last_sphere_count: scene.settings.sphere_count,
        objects,
    }
}

fn entry_params(object: &PlacedObject, anchor: Vec3) -> Option<EntryParams> {
    let params = match object.params {
        BuildParams::Plank {
            length,
            width,
            height,
            yaw,
        } => EntryParams {
            length: Some(length),
            width: Some(width),
            height: Some(height),
            rotation_y: Some(yaw),
            ..Default::default()
        },
        BuildParams::Guardrail { length, height, yaw } => EntryParams {
            length: Some(length),
            height: Some(height),
            rotation_y: Some(yaw),
            ..Default::default()
        },
        BuildParams::Mountain { height, radius } => EntryParams {
            mountain_height: Some(height),
            mountain_radius: Some(radius),
            ..Default::default()
        },
        // Only the centre survives; the endpoints are rebuilt around it
        BuildParams::Road { .. } => EntryParams {
            start_pos: Some((anchor - ROAD_HALF_SPAN).into()),
            end_pos: Some((anchor + ROAD_HALF_SPAN).into()),
            ..Default::default()
        },
        BuildParams::Stairs { start, end, step } => {
            // Follow the group if it was dragged since it was built
            let shift = anchor - (start + end) * 0.5;
            EntryParams {
                start_pos: Some((start + shift).into()),
                end_pos: Some((end + shift).into()),
                step_width: Some(step.width),
                step_height: Some(step.height),
                step_depth: Some(step.depth),
                ..Default::default()
            }
        }
        BuildParams::Vehicle { angle } => EntryParams {
            orbit_angle: Some(object.orbit().map_or(angle, |o| o.angle)),
            ..Default::default()
        },
        BuildParams::None => return None,
    };
    Some(params)
}

/// Replace every non-sphere object with the snapshot's contents
///
/// The snapshot is validated before anything is removed. Each entry is
/// rebuilt through its factory and then forced onto the saved pose. Missing
/// fixtures are synthesized afterwards.
pub fn restore(
    snapshot: &Snapshot,
    scene: &mut Scene,
    physics: &mut dyn PhysicsWorld,
    render: &mut dyn RenderScene,
) -> Result<LoadReport, SnapshotError> {
    snapshot.validate()?;

    scene.remove_where(physics, render, |o| o.kind != ObjectKind::Sphere);

    let mut report = LoadReport::default();
    for entry in &snapshot.objects {
        let Some(kind) = ObjectKind::from_tag(&entry.kind).filter(|k| spec(*k).persisted) else {
            log::warn!("Skipping snapshot entry of kind {:?}", entry.kind);
            report.skipped.push(entry.kind.clone());
            continue;
        };
        let position = Vec3::from(entry.position);
        let rotation = Quat::from(entry.rotation).normalize();

        let mut params = entry
            .params
            .as_ref()
            .map_or_else(|| default_params(kind), |p| p.to_build(kind));
        if kind == ObjectKind::Vehicle && entry.params.and_then(|p| p.orbit_angle).is_none() {
            params = BuildParams::Vehicle {
                angle: orbit::angle_from_rotation(rotation, &scene.tuning.orbit),
            };
        }

        let base = position - Vec3::Y * anchor_height(kind, &params);
        let id = scene.spawn(physics, render, kind, base, &params);
        if kind != ObjectKind::Vehicle {
            scene.set_anchor_pose(physics, id, position, rotation);
        }
        scene.sync_visual(physics, render, id);
        report.restored += 1;
    }

    scene.settings.set_launch_velocity(snapshot.launch_velocity.into());
    scene.settings.set_sphere_count(snapshot.last_sphere_count);
    report.synthesized = bootstrap::reconcile(scene, physics, render);

    log::info!(
        "Restored {} objects ({} skipped, {} synthesized)",
        report.restored,
        report.skipped.len(),
        report.synthesized.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessPhysics, HeadlessRender};
    use crate::settings::Settings;
    use crate::tuning::Tuning;

    fn setup() -> (Scene, HeadlessPhysics, HeadlessRender) {
        (
            Scene::new(5, Tuning::default(), Settings::default()),
            HeadlessPhysics::new(),
            HeadlessRender::new(),
        )
    }

    #[test]
    fn test_legacy_field_names_are_accepted() {
        let json = r#"{
            "version": "1.0.0",
            "timestamp": 1700000000000,
            "ballInitialSpeed": { "x": 4, "y": 1, "z": -2 },
            "ballCount": 12,
            "objects": [
                { "type": "domino", "position": { "x": 1, "y": 0.4, "z": 2 },
                  "rotation": { "x": 0, "y": 0, "z": 0, "w": 1 } },
                { "type": "train", "position": { "x": 0, "y": 0.8, "z": -25.5 },
                  "rotation": { "x": 0, "y": 0, "z": 0, "w": 1 },
                  "params": { "orbitAngle": 0.5 } }
            ]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.launch_velocity, Xyz { x: 4.0, y: 1.0, z: -2.0 });
        assert_eq!(snapshot.last_sphere_count, 12);
        assert_eq!(snapshot.objects[1].kind, "train");
        assert_eq!(snapshot.objects[1].params.unwrap().orbit_angle, Some(0.5));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(Snapshot::from_json("{ nope"), Err(SnapshotError::Parse(_))));
        assert!(matches!(
            Snapshot::from_json(r#"{ "version": "1.0.0" }"#),
            Err(SnapshotError::Parse(_))
        ));
        assert!(matches!(
            Snapshot::from_json(r#"{ "version": "2.0.0", "objects": [] }"#),
            Err(SnapshotError::Invalid(_))
        ));
        assert!(matches!(
            Snapshot::from_json(r#"{ "version": "1.0.0", "lastSphereCount": 0, "objects": [] }"#),
            Err(SnapshotError::Invalid(_))
        ));
        let zero_rotation = r#"{ "version": "1.0.0", "objects": [
            { "kind": "box", "position": { "x": 0, "y": 0, "z": 0 },
              "rotation": { "x": 0, "y": 0, "z": 0, "w": 0 } } ] }"#;
        assert!(matches!(Snapshot::from_json(zero_rotation), Err(SnapshotError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unbuildable_stairs() {
        let stairs = |params: &str| {
            format!(
                r#"{{ "version": "1.0.0", "objects": [
                {{ "kind": "stairs", "position": {{ "x": 0, "y": 1, "z": 0 }},
                  "rotation": {{ "x": 0, "y": 0, "z": 0, "w": 1 }}, "params": {} }} ] }}"#,
                params
            )
        };
        let towering = stairs(
            r#"{ "startPos": { "x": 0, "y": 0, "z": 0 },
                 "endPos": { "x": 1, "y": 1e30, "z": 1 } }"#,
        );
        assert!(matches!(Snapshot::from_json(&towering), Err(SnapshotError::Invalid(_))));

        let tiny_steps = stairs(
            r#"{ "startPos": { "x": 0, "y": 0, "z": 0 }, "endPos": { "x": 1, "y": 1000, "z": 1 },
                 "stepHeight": 0.01 }"#,
        );
        assert!(matches!(Snapshot::from_json(&tiny_steps), Err(SnapshotError::Invalid(_))));

        let flat_steps = stairs(r#"{ "stepWidth": 0 }"#);
        assert!(matches!(Snapshot::from_json(&flat_steps), Err(SnapshotError::Invalid(_))));

        let normal = stairs(
            r#"{ "startPos": { "x": 0, "y": 0, "z": 0 }, "endPos": { "x": 2, "y": 3, "z": 2 } }"#,
        );
        assert!(Snapshot::from_json(&normal).is_ok());
    }

    #[test]
    fn test_missing_params_fall_back_to_defaults() {
        let params = EntryParams {
            length: Some(6.0),
            ..Default::default()
        };
        assert_eq!(
            params.to_build(ObjectKind::Plank),
            BuildParams::Plank {
                length: 6.0,
                width: 1.5,
                height: 0.2,
                yaw: 0.0,
            }
        );
        assert_eq!(EntryParams::default().to_build(ObjectKind::Box), BuildParams::None);
    }

    #[test]
    fn test_capture_skips_spheres_and_records_params() {
        let (mut scene, mut physics, mut render) = setup();
        scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Sphere,
            Vec3::new(0.0, 0.2, 0.0),
            &BuildParams::None,
        );
        let mountain = BuildParams::Mountain {
            height: 7.0,
            radius: 2.0,
        };
        scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Mountain,
            Vec3::new(3.0, 0.0, 3.0),
            &mountain,
        );

        let snapshot = capture(&scene, &physics);
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.objects.len(), 1);
        let entry = &snapshot.objects[0];
        assert_eq!(entry.kind, "mountain");
        assert_eq!(entry.position, Xyz { x: 3.0, y: 3.5, z: 3.0 });
        let params = entry.params.unwrap();
        assert_eq!(params.mountain_height, Some(7.0));
        assert_eq!(params.mountain_radius, Some(2.0));
    }

    #[test]
    fn test_restore_rebuilds_saved_poses_and_keeps_spheres() {
        let (mut scene, mut physics, mut render) = setup();
        let plank = BuildParams::Plank {
            length: 5.0,
            width: 1.0,
            height: 0.4,
            yaw: 0.7,
        };
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Plank,
            Vec3::new(2.0, 1.0, -3.0),
            &plank,
        );
        let saved_pose = scene.anchor_pose(&physics, id).unwrap();
        let snapshot = capture(&scene, &physics);

        scene.clear(&mut physics, &mut render);
        scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Sphere,
            Vec3::new(0.0, 0.2, 0.0),
            &BuildParams::None,
        );
        scene.spawn(&mut physics, &mut render, ObjectKind::Box, Vec3::ZERO, &BuildParams::None);

        let report = restore(&snapshot, &mut scene, &mut physics, &mut render).unwrap();
        assert_eq!(report.restored, 1);
        assert_eq!(scene.count(ObjectKind::Box), 0);
        assert_eq!(scene.count(ObjectKind::Sphere), 1);
        assert!(report.synthesized.contains(&ObjectKind::Vehicle));

        let restored = scene.ids_of(ObjectKind::Plank)[0];
        let (pos, rot) = scene.anchor_pose(&physics, restored).unwrap();
        assert!(pos.distance(saved_pose.0) < 1e-4);
        assert!(crate::rotation_similarity(rot, saved_pose.1) > 1.0 - 1e-5);
        assert_eq!(scene.get(restored).unwrap().params, plank);
    }

    #[test]
    fn test_stairs_follow_their_group_through_a_round_trip() {
        let (mut scene, mut physics, mut render) = setup();
        let stairs = BuildParams::Stairs {
            start: Vec3::new(0.0, 0.2, 0.0),
            end: Vec3::new(2.0, 1.7, 2.0),
            step: StepSize::default(),
        };
        let id = scene.spawn(&mut physics, &mut render, ObjectKind::Stairs, Vec3::ZERO, &stairs);
        let moved = Vec3::new(6.0, 0.95, -4.0);
        scene.set_anchor_pose(&mut physics, id, moved, Quat::IDENTITY);
        let steps = scene.get(id).unwrap().bodies().len();

        let snapshot = capture(&scene, &physics);
        scene.clear(&mut physics, &mut render);
        restore(&snapshot, &mut scene, &mut physics, &mut render).unwrap();

        let restored = scene.ids_of(ObjectKind::Stairs)[0];
        let (pos, _) = scene.anchor_pose(&physics, restored).unwrap();
        assert!(pos.distance(moved) < 1e-4);
        assert_eq!(scene.get(restored).unwrap().bodies().len(), steps);
    }

    #[test]
    fn test_unknown_kinds_are_skipped() {
        let (mut scene, mut physics, mut render) = setup();
        let json = r#"{ "version": "1.0.0", "objects": [
            { "kind": "spaceship", "position": { "x": 0, "y": 0, "z": 0 },
              "rotation": { "x": 0, "y": 0, "z": 0, "w": 1 } },
            { "kind": "ball", "position": { "x": 0, "y": 0.2, "z": 0 },
              "rotation": { "x": 0, "y": 0, "z": 0, "w": 1 } },
            { "kind": "box", "position": { "x": 4, "y": 0.25, "z": 4 },
              "rotation": { "x": 0, "y": 0, "z": 0, "w": 1 } } ] }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let report = restore(&snapshot, &mut scene, &mut physics, &mut render).unwrap();
        assert_eq!(report.restored, 1);
        assert_eq!(report.skipped, vec!["spaceship".to_string(), "ball".to_string()]);
        assert_eq!(scene.count(ObjectKind::Box), 1);
        assert_eq!(scene.count(ObjectKind::Sphere), 0);
    }

    #[test]
    fn test_vehicle_angle_recovered_from_rotation() {
        let (mut scene, mut physics, mut render) = setup();
        let tuning = scene.tuning.orbit.clone();
        let (pos, rot) = orbit::pose_at(1.2, &tuning);
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION.into(),
            timestamp: 0.0,
            launch_velocity: Xyz::default(),
            last_sphere_count: 3,
            objects: vec![SnapshotEntry {
                kind: "vehicle".into(),
                position: pos.into(),
                rotation: rot.into(),
                params: None,
            }],
        };
        restore(&snapshot, &mut scene, &mut physics, &mut render).unwrap();
        let id = scene.ids_of(ObjectKind::Vehicle)[0];
        let angle = scene.get(id).unwrap().orbit().unwrap().angle;
        assert!((angle - 1.2).abs() < 1e-4);
        assert_eq!(scene.settings.sphere_count, 3);
        assert_eq!(scene.settings.launch_velocity, Vec3::ZERO);
    }
}
