//! Circling vehicle
//!
//! The vehicle is kinematic: each tick its path angle advances by a fixed
//! step and the pose is computed from the angle alone, then written to both
//! the physics body and the visual root.

use glam::{Quat, Vec3};
use std::f32::consts::TAU;

use super::object::{KindState, ObjectId};
use super::scene::Scene;
use crate::engine::{PhysicsWorld, RenderScene};
use crate::tuning::OrbitTuning;
use crate::yaw_rotation;

/// Pose on the track for a path angle
///
/// Orientation turns local +X along the direction of travel.
pub fn pose_at(angle: f32, tuning: &OrbitTuning) -> (Vec3, Quat) {
    let a = angle + tuning.phase_offset;
    let (sin, cos) = a.sin_cos();
    let position = Vec3::new(
        tuning.track_radius * cos,
        tuning.ride_height,
        tuning.track_radius * sin,
    );
    let (tx, tz) = (-sin, cos);
    (position, yaw_rotation((-tz).atan2(tx)))
}

/// Advance every orbiting object by one tick
pub fn update(
    scene: &mut Scene,
    physics: &mut dyn PhysicsWorld,
    render: &mut dyn RenderScene,
    skip: Option<ObjectId>,
) {
    let tuning = scene.tuning.orbit.clone();
    for object in scene.objects_mut().iter_mut().filter(|o| Some(o.id) != skip) {
        let KindState::Orbiting(orbit) = &mut object.state else {
            continue;
        };
        orbit.angle = (orbit.angle + orbit.speed).rem_euclid(TAU);
        let (position, rotation) = pose_at(orbit.angle, &tuning);
        physics.set_pose(object.body, position, rotation);
        physics.halt(object.body);
        render.set_transform(object.visual.root, position, rotation);
    }
}

/// Recover a path angle from a stored yaw, for snapshots without one
pub fn angle_from_rotation(rotation: Quat, tuning: &OrbitTuning) -> f32 {
    let along = rotation * Vec3::X;
    // Tangent at track angle a is (-sin a, cos a)
    let a = (-along.x).atan2(along.z) - tuning.phase_offset;
    a.rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessPhysics, HeadlessRender};
    use crate::settings::Settings;
    use crate::sim::kind::ObjectKind;
    use crate::sim::object::BuildParams;
    use crate::tuning::Tuning;

    #[test]
    fn test_angle_zero_starts_at_negative_z() {
        let tuning = OrbitTuning::default();
        let (pos, _) = pose_at(0.0, &tuning);
        assert!(pos.x.abs() < 1e-4);
        assert!((pos.z + tuning.track_radius).abs() < 1e-4);
        assert_eq!(pos.y, tuning.ride_height);
    }

    #[test]
    fn test_orientation_follows_tangent() {
        let tuning = OrbitTuning::default();
        for i in 0..16 {
            let angle = i as f32 * TAU / 16.0;
            let eps = 1e-3;
            let (a, rot) = pose_at(angle, &tuning);
            let (b, _) = pose_at(angle + eps, &tuning);
            let tangent = (b - a).normalize();
            assert!((rot * Vec3::X - tangent).length() < 1e-2, "angle {}", angle);
        }
    }

    #[test]
    fn test_angle_recovered_from_rotation() {
        let tuning = OrbitTuning::default();
        for angle in [0.3_f32, 1.7, 3.0, 5.5] {
            let (_, rot) = pose_at(angle, &tuning);
            assert!((angle_from_rotation(rot, &tuning) - angle).abs() < 1e-4);
        }
    }

    #[test]
    fn test_update_wraps_angle_and_moves_body() {
        let mut scene = Scene::new(1, Tuning::default(), Settings::default());
        let mut physics = HeadlessPhysics::new();
        let mut render = HeadlessRender::new();
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Vehicle,
            Vec3::ZERO,
            &BuildParams::Vehicle { angle: TAU - 0.01 },
        );
        update(&mut scene, &mut physics, &mut render, None);

        let orbit = *scene.get(id).unwrap().orbit().unwrap();
        assert!((orbit.angle - 0.01).abs() < 1e-4);
        let (expected, _) = pose_at(orbit.angle, &scene.tuning.orbit);
        let (pos, _) = physics.pose(scene.get(id).unwrap().body).unwrap();
        assert!((pos - expected).length() < 1e-5);
    }

    #[test]
    fn test_skipped_vehicle_holds_still() {
        let mut scene = Scene::new(1, Tuning::default(), Settings::default());
        let mut physics = HeadlessPhysics::new();
        let mut render = HeadlessRender::new();
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Vehicle,
            Vec3::ZERO,
            &BuildParams::None,
        );
        let before = scene.get(id).unwrap().orbit().unwrap().angle;
        update(&mut scene, &mut physics, &mut render, Some(id));
        assert_eq!(scene.get(id).unwrap().orbit().unwrap().angle, before);
    }
}
