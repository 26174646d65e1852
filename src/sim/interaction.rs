//! Pointer selection, drag and delete
//!
//! Idle ⇄ Dragging. Pressing on a non-sphere object selects it and starts a
//! drag: its bodies are suspended (mass zeroed, velocities cleared) and its
//! pose follows the pointer across the ground plane at the grabbed height.
//! Releasing writes the final pose back and resumes every body with its
//! original mass. Camera navigation is off for the whole drag.

use glam::{Quat, Vec2, Vec3};

use super::kind::ObjectKind;
use super::object::ObjectId;
use super::scene::Scene;
use crate::consts::{DOMINO_HEIGHT, GROUND_LEVEL};
use crate::engine::{BodyHandle, MaterialId, NodeHandle, PhysicsWorld, RenderScene};
use crate::ground_point;

/// Which button a pointer press came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Select and drag
    Primary,
    /// Delete the object under the pointer
    Secondary,
}

/// A body taken out of the simulation by zeroing its mass
///
/// Holding the original mass here means a suspended body can only come back
/// through `resume`, with exactly the mass it had.
#[derive(Debug, PartialEq)]
#[must_use]
pub struct Suspension {
    body: BodyHandle,
    mass: f32,
}

impl Suspension {
    /// Zero a body's mass and velocities; `None` if the body does not exist
    pub fn suspend(physics: &mut dyn PhysicsWorld, body: BodyHandle) -> Option<Self> {
        let mass = physics.mass(body)?;
        physics.set_mass(body, 0.0);
        physics.halt(body);
        Some(Self { body, mass })
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn original_mass(&self) -> f32 {
        self.mass
    }

    /// Give the body back to the simulation at rest
    pub fn resume(self, physics: &mut dyn PhysicsWorld) {
        physics.halt(self.body);
        physics.set_mass(self.body, self.mass);
    }
}

/// An object being moved by the pointer
#[derive(Debug)]
pub struct DragSession {
    pub object: ObjectId,
    /// Anchor minus pointer, on the ground plane
    grab_offset: Vec2,
    held_height: f32,
    held_rotation: Quat,
    /// Current anchor target
    position: Vec3,
    suspended: Vec<Suspension>,
}

impl DragSession {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.held_rotation
    }
}

/// Highlighted object and the materials it had before
#[derive(Debug, Clone, PartialEq)]
struct Selection {
    object: ObjectId,
    originals: Vec<(NodeHandle, MaterialId)>,
}

/// Selection and drag state of the whole scene
#[derive(Debug, Default)]
pub struct Interaction {
    selection: Option<Selection>,
    drag: Option<DragSession>,
}

impl Interaction {
    pub fn selected(&self) -> Option<ObjectId> {
        self.selection.as_ref().map(|s| s.object)
    }

    pub fn dragging(&self) -> Option<ObjectId> {
        self.drag.as_ref().map(|d| d.object)
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Highlight an object, restoring whatever was highlighted before
    pub fn select(&mut self, scene: &Scene, render: &mut dyn RenderScene, id: ObjectId) {
        if self.selected() == Some(id) {
            return;
        }
        self.deselect(render);
        let Some(object) = scene.get(id) else {
            return;
        };
        let originals = object
            .visual
            .parts
            .iter()
            .filter_map(|&node| {
                render
                    .set_material(node, MaterialId::HIGHLIGHT)
                    .map(|previous| (node, previous))
            })
            .collect();
        self.selection = Some(Selection { object: id, originals });
    }

    /// Restore the selected object's materials and clear the selection
    pub fn deselect(&mut self, render: &mut dyn RenderScene) {
        if let Some(selection) = self.selection.take() {
            for (node, material) in selection.originals {
                render.set_material(node, material);
            }
        }
    }

    /// Object under a pointer position, resolving sub-parts to their owner
    pub fn pick(
        &self,
        scene: &Scene,
        render: &dyn RenderScene,
        pointer: Vec2,
    ) -> Option<(ObjectId, Vec3)> {
        let ray = render.screen_ray(pointer);
        let hit = render.raycast(&ray, &scene.pickable_nodes())?;
        scene.object_at_node(hit.node).map(|id| (id, hit.point))
    }

    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        pointer: Vec2,
        button: PointerButton,
    ) {
        if button == PointerButton::Secondary {
            self.delete_at(scene, physics, render, pointer);
            return;
        }
        let Some((id, _)) = self.pick(scene, render, pointer) else {
            self.deselect(render);
            return;
        };
        match scene.get(id).map(|o| o.kind) {
            Some(ObjectKind::Sphere) | None => {}
            Some(_) => {
                self.select(scene, render, id);
                self.begin_drag(scene, physics, render, id, pointer);
            }
        }
    }

    fn begin_drag(
        &mut self,
        scene: &Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        id: ObjectId,
        pointer: Vec2,
    ) {
        self.end_drag(scene, physics, render);
        let (Some(object), Some((anchor, rotation))) =
            (scene.get(id), scene.anchor_pose(physics, id))
        else {
            return;
        };
        let (held_height, held_rotation) = match object.kind {
            ObjectKind::Domino => (GROUND_LEVEL + DOMINO_HEIGHT * 0.5, Quat::IDENTITY),
            _ => (anchor.y, rotation),
        };
        let grabbed = ground_hit(render, pointer).unwrap_or(ground_point(anchor));
        let grab_offset = ground_point(anchor) - grabbed;
        let suspended = object
            .bodies()
            .into_iter()
            .filter_map(|body| Suspension::suspend(physics, body))
            .collect();

        let position = Vec3::new(anchor.x, held_height, anchor.z);
        self.drag = Some(DragSession {
            object: id,
            grab_offset,
            held_height,
            held_rotation,
            position,
            suspended,
        });
        self.hold(scene, physics, render);
        render.set_camera_controls(false);
        log::debug!("Dragging {} {:?}", object.kind, id);
    }

    pub fn pointer_move(
        &mut self,
        scene: &Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        pointer: Vec2,
    ) {
        let Some(point) = ground_hit(render, pointer) else {
            return;
        };
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let target = point + session.grab_offset;
        session.position = Vec3::new(target.x, session.held_height, target.y);
        self.hold(scene, physics, render);
    }

    pub fn pointer_up(
        &mut self,
        scene: &Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
    ) {
        if self.drag.is_none() {
            return;
        }
        self.hold(scene, physics, render);
        self.end_drag(scene, physics, render);
    }

    /// Pin the dragged object to its target pose; called every tick
    pub fn hold(
        &self,
        scene: &Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
    ) {
        let Some(session) = self.drag.as_ref() else {
            return;
        };
        scene.set_anchor_pose(physics, session.object, session.position, session.held_rotation);
        scene.halt(physics, session.object);
        scene.sync_visual(physics, render, session.object);
    }

    /// Resume the dragged object's bodies and give the camera back
    fn end_drag(
        &mut self,
        scene: &Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
    ) {
        let Some(session) = self.drag.take() else {
            return;
        };
        for suspension in session.suspended {
            suspension.resume(physics);
        }
        scene.halt(physics, session.object);
        render.set_camera_controls(true);
        log::debug!("Released {:?}", session.object);
    }

    /// Remove the selected object; `None` when nothing is selected
    pub fn delete_selected(
        &mut self,
        scene: &mut Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
    ) -> Option<ObjectId> {
        let id = self.selected()?;
        self.forget(id, render);
        scene.remove(physics, render, id).then_some(id)
    }

    /// Remove whatever object is under the pointer
    pub fn delete_at(
        &mut self,
        scene: &mut Scene,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        pointer: Vec2,
    ) -> Option<ObjectId> {
        let (id, _) = self.pick(scene, render, pointer)?;
        self.forget(id, render);
        scene.remove(physics, render, id).then_some(id)
    }

    /// Drop every reference to an object that is about to disappear
    ///
    /// Its bodies are going away, so a drag on it ends without resuming them.
    pub fn forget(&mut self, id: ObjectId, render: &mut dyn RenderScene) {
        if self.selected() == Some(id) {
            self.deselect(render);
        }
        if self.dragging() == Some(id) {
            self.drag = None;
            render.set_camera_controls(true);
        }
    }

    /// Forget selection and drag entirely, ahead of a scene-wide removal
    pub fn reset(&mut self, render: &mut dyn RenderScene) {
        self.deselect(render);
        if self.drag.take().is_some() {
            render.set_camera_controls(true);
        }
    }
}

/// Where the pointer ray meets the ground plane
fn ground_hit(render: &dyn RenderScene, pointer: Vec2) -> Option<Vec2> {
    render
        .screen_ray(pointer)
        .intersect_horizontal_plane(GROUND_LEVEL)
        .map(ground_point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessPhysics, HeadlessRender};
    use crate::settings::Settings;
    use crate::sim::catalog::spec;
    use crate::sim::object::{BuildParams, KindState, StepSize};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn setup() -> (Scene, HeadlessPhysics, HeadlessRender, Interaction) {
        (
            Scene::new(8, Tuning::default(), Settings::default()),
            HeadlessPhysics::new(),
            HeadlessRender::new(),
            Interaction::default(),
        )
    }

    #[test]
    fn test_suspension_restores_mass() {
        let mut physics = HeadlessPhysics::new();
        let body = physics.add_body(
            &crate::engine::BodyDesc::new(
                crate::engine::Collider::Ball { radius: 1.0 },
                2.5,
                Vec3::Y,
            )
                .with_velocity(Vec3::X, Vec3::Y),
        );
        let s = Suspension::suspend(&mut physics, body).unwrap();
        assert_eq!(physics.mass(body), Some(0.0));
        assert_eq!(physics.body(body).unwrap().velocity, Vec3::ZERO);
        assert_eq!(s.original_mass(), 2.5);
        s.resume(&mut physics);
        assert_eq!(physics.mass(body), Some(2.5));
    }

    #[test]
    fn test_drag_moves_domino_and_restores_it() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Domino,
            Vec3::ZERO,
            &BuildParams::None,
        );
        let body = scene.get(id).unwrap().body;
        // Knock it sideways first
        physics.set_pose(body, Vec3::new(0.0, 0.05, 0.0), Quat::from_rotation_z(1.5));

        ui.pointer_down(
            &mut scene,
            &mut physics,
            &mut render,
            Vec2::new(0.02, 0.0),
            PointerButton::Primary,
        );
        assert_eq!(ui.dragging(), Some(id));
        assert_eq!(ui.selected(), Some(id));
        assert!(!render.camera_controls_enabled());
        assert_eq!(physics.mass(body), Some(0.0));

        for step in 1..=5 {
            ui.pointer_move(&scene, &mut physics, &mut render, Vec2::new(0.02 + step as f32, 1.0));
            physics.step(1.0 / 60.0);
            ui.hold(&scene, &mut physics, &mut render);
        }
        ui.pointer_up(&mut scene, &mut physics, &mut render);

        let state = physics.body(body).unwrap();
        assert_eq!(physics.mass(body), Some(spec(ObjectKind::Domino).mass));
        assert_eq!(state.velocity, Vec3::ZERO);
        assert_eq!(state.angular_velocity, Vec3::ZERO);
        assert_eq!(state.rotation, Quat::IDENTITY);
        assert!((state.position - Vec3::new(5.0, 0.4, 1.0)).length() < 1e-4);
        assert!(render.camera_controls_enabled());
        assert_eq!(ui.dragging(), None);
        // Rest pose stays where the domino was created
        let rest = scene.get(id).unwrap().returnable().unwrap();
        assert_eq!(rest.rest_position(), Vec3::new(0.0, 0.4, 0.0));
        assert!(!rest.returning);
    }

    fn drag(
        scene: &mut Scene,
        physics: &mut HeadlessPhysics,
        render: &mut HeadlessRender,
        ui: &mut Interaction,
        from: Vec2,
        path: &[Vec2],
    ) {
        ui.pointer_down(scene, physics, render, from, PointerButton::Primary);
        for &pointer in path {
            ui.pointer_move(scene, physics, render, pointer);
            physics.step(1.0 / 60.0);
            ui.hold(scene, physics, render);
        }
        ui.pointer_up(scene, physics, render);
    }

    #[test]
    fn test_drag_keeps_captured_orientation() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Box,
            Vec3::ZERO,
            &BuildParams::None,
        );
        let body = scene.get(id).unwrap().body;
        let tilted = Quat::from_rotation_y(0.7) * Quat::from_rotation_x(0.2);
        physics.set_pose(body, Vec3::new(0.0, 0.25, 0.0), tilted);

        ui.pointer_down(
            &mut scene,
            &mut physics,
            &mut render,
            Vec2::new(0.05, 0.0),
            PointerButton::Primary,
        );
        assert_eq!(ui.dragging(), Some(id));
        ui.pointer_move(&scene, &mut physics, &mut render, Vec2::new(4.05, 1.0));
        physics.step(1.0 / 60.0);
        ui.hold(&scene, &mut physics, &mut render);
        assert_eq!(physics.body(body).unwrap().rotation, tilted);

        ui.pointer_up(&mut scene, &mut physics, &mut render);
        let state = physics.body(body).unwrap();
        assert_eq!(state.rotation, tilted);
        assert!((state.position - Vec3::new(4.0, 0.25, 1.0)).length() < 1e-5);
        let (_, visual_rot) = render.world_transform(scene.get(id).unwrap().visual.root).unwrap();
        assert!(visual_rot.dot(tilted).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_drag_carries_seesaw_pivot() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Seesaw,
            Vec3::ZERO,
            &BuildParams::None,
        );
        let plank = scene.get(id).unwrap().body;
        let KindState::Hinged(hinge) = scene.get(id).unwrap().state else {
            panic!("seesaw must be hinged");
        };
        let plank_mass = physics.mass(plank);
        let (plank_before, _) = physics.pose(plank).unwrap();
        let (pivot_before, _) = physics.pose(hinge.pivot_body).unwrap();

        let path = [Vec2::new(3.0, 1.0), Vec2::new(5.5, 3.0)];
        drag(&mut scene, &mut physics, &mut render, &mut ui, Vec2::new(1.5, 0.0), &path);

        let moved = Vec3::new(4.0, 0.0, 3.0);
        let (plank_after, _) = physics.pose(plank).unwrap();
        let (pivot_after, _) = physics.pose(hinge.pivot_body).unwrap();
        assert!((plank_after - (plank_before + moved)).length() < 1e-4);
        assert!(((pivot_after - plank_after) - (pivot_before - plank_before)).length() < 1e-5);
        assert_eq!(physics.mass(plank), plank_mass);
        assert_eq!(physics.mass(hinge.pivot_body), Some(0.0));
        assert_eq!(physics.constraint_count(), 1);
    }

    #[test]
    fn test_drag_moves_every_stair_rigidly() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let params = BuildParams::Stairs {
            start: Vec3::new(0.0, 0.2, 0.0),
            end: Vec3::new(3.0, 2.2, 0.0),
            step: StepSize {
                width: 2.5,
                height: 0.5,
                depth: 0.8,
            },
        };
        let id = scene.spawn(&mut physics, &mut render, ObjectKind::Stairs, Vec3::ZERO, &params);
        let bodies = scene.get(id).unwrap().bodies();
        let before: Vec<_> = bodies.iter().map(|&b| physics.pose(b).unwrap()).collect();

        let from = Vec2::new(0.375, 0.0);
        let to = Vec2::new(6.375, -4.0);
        drag(&mut scene, &mut physics, &mut render, &mut ui, from, &[Vec2::new(2.0, -1.0), to]);

        let moved = Vec3::new(6.0, 0.0, -4.0);
        for (&body, (position, rotation)) in bodies.iter().zip(&before) {
            let (now, now_rot) = physics.pose(body).unwrap();
            let expected = *position + moved;
            assert!((now - expected).length() < 1e-4, "step at {} expected {}", now, expected);
            assert_eq!(now_rot, *rotation);
            assert_eq!(physics.mass(body), Some(0.0));
        }
    }

    proptest! {
        #[test]
        fn released_objects_resume_at_rest(
            which in 0usize..3,
            path in prop::collection::vec((-10.0f32..10.0, -10.0f32..10.0), 1..8),
        ) {
            let (kind, press) = [
                (ObjectKind::Domino, Vec2::new(0.02, 0.0)),
                (ObjectKind::Box, Vec2::ZERO),
                (ObjectKind::Seesaw, Vec2::new(1.5, 0.0)),
            ][which];
            let (mut scene, mut physics, mut render, mut ui) = setup();
            let id = scene.spawn(&mut physics, &mut render, kind, Vec3::ZERO, &BuildParams::None);
            let bodies = scene.get(id).unwrap().bodies();
            let masses: Vec<_> = bodies.iter().map(|&b| physics.mass(b)).collect();
            let path: Vec<Vec2> = path.into_iter().map(|(x, z)| Vec2::new(x, z)).collect();

            drag(&mut scene, &mut physics, &mut render, &mut ui, press, &path);

            prop_assert_eq!(ui.dragging(), None);
            prop_assert!(render.camera_controls_enabled());
            for (&body, mass) in bodies.iter().zip(&masses) {
                prop_assert_eq!(physics.mass(body), *mass);
                let state = physics.body(body).unwrap();
                prop_assert_eq!(state.velocity, Vec3::ZERO);
                prop_assert_eq!(state.angular_velocity, Vec3::ZERO);
            }
        }
    }

    #[test]
    fn test_press_on_empty_space_clears_selection() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Box,
            Vec3::ZERO,
            &BuildParams::None,
        );
        let node = scene.get(id).unwrap().visual.root;
        ui.pointer_down(&mut scene, &mut physics, &mut render, Vec2::ZERO, PointerButton::Primary);
        ui.pointer_up(&mut scene, &mut physics, &mut render);
        assert_eq!(render.material(node), Some(MaterialId::HIGHLIGHT));

        ui.pointer_down(
            &mut scene,
            &mut physics,
            &mut render,
            Vec2::new(10.0, 10.0),
            PointerButton::Primary,
        );
        assert_eq!(ui.selected(), None);
        assert_eq!(render.material(node), Some(spec(ObjectKind::Box).color));
    }

    #[test]
    fn test_press_on_sphere_is_ignored() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Sphere,
            Vec3::new(0.0, 0.2, 0.0),
            &BuildParams::None,
        );
        ui.pointer_down(&mut scene, &mut physics, &mut render, Vec2::ZERO, PointerButton::Primary);
        assert_eq!(ui.selected(), None);
        assert_eq!(ui.dragging(), None);
        assert!(render.camera_controls_enabled());
    }

    #[test]
    fn test_multi_body_highlight_restores_each_part() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let goal = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Goal,
            Vec3::ZERO,
            &BuildParams::None,
        );
        let before: Vec<_> = scene
            .get(goal)
            .unwrap()
            .visual
            .parts
            .iter()
            .map(|&n| render.material(n))
            .collect();
        ui.select(&scene, &mut render, goal);
        assert!(scene
            .get(goal)
            .unwrap()
            .visual
            .parts
            .iter()
            .all(|&n| render.material(n) == Some(MaterialId::HIGHLIGHT)));
        ui.deselect(&mut render);
        let after: Vec<_> = scene
            .get(goal)
            .unwrap()
            .visual
            .parts
            .iter()
            .map(|&n| render.material(n))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_seesaw_while_dragging() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let id = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Seesaw,
            Vec3::ZERO,
            &BuildParams::None,
        );
        ui.pointer_down(
            &mut scene,
            &mut physics,
            &mut render,
            Vec2::new(1.5, 0.0),
            PointerButton::Primary,
        );
        assert_eq!(ui.dragging(), Some(id));

        assert_eq!(ui.delete_selected(&mut scene, &mut physics, &mut render), Some(id));
        assert!(scene.is_empty());
        assert_eq!(physics.body_count(), 0);
        assert_eq!(physics.constraint_count(), 0);
        assert_eq!(render.node_count(), 0);
        assert_eq!(ui.dragging(), None);
        assert!(render.camera_controls_enabled());
    }

    #[test]
    fn test_secondary_press_deletes_under_pointer() {
        let (mut scene, mut physics, mut render, mut ui) = setup();
        let a = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Box,
            Vec3::ZERO,
            &BuildParams::None,
        );
        let b = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Box,
            Vec3::new(5.0, 0.0, 0.0),
            &BuildParams::None,
        );
        ui.pointer_down(
            &mut scene,
            &mut physics,
            &mut render,
            Vec2::ZERO,
            PointerButton::Secondary,
        );
        assert!(scene.get(a).is_none());
        assert!(scene.get(b).is_some());
    }
}
