//! Scene state
//!
//! The single owner of every placed object. Controllers receive the scene
//! explicitly each frame instead of reaching for shared globals.

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::catalog;
use super::factory::Build;
use super::fireworks::Fireworks;
use super::kind::ObjectKind;
use super::object::{BuildParams, KindState, ObjectId, PlacedObject};
use crate::engine::{NodeHandle, PhysicsWorld, RenderScene};
use crate::settings::Settings;
use crate::tuning::Tuning;

pub(crate) struct ScenePartsMut<'a> {
    pub objects: &'a mut [PlacedObject],
    pub rng: &'a mut Pcg32,
    pub tuning: &'a Tuning,
    pub elapsed: f32,
}

/// Live arrangement plus everything the controllers share
#[derive(Debug, Clone)]
pub struct Scene {
    /// Flat collection in creation order
    objects: Vec<PlacedObject>,
    next_id: u32,
    /// Seeded RNG shared by placement, agents and fireworks
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub settings: Settings,
    pub fireworks: Fireworks,
    /// Simulated seconds since the scene was created
    pub elapsed: f32,
    /// Scenery nodes that are not objects (the pasture patch)
    decorations: Vec<NodeHandle>,
}

impl Scene {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            settings,
            fireworks: Fireworks::default(),
            elapsed: 0.0,
            decorations: Vec::new(),
        }
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub(crate) fn objects_mut(&mut self) -> &mut [PlacedObject] {
        &mut self.objects
    }

    /// Objects alongside the RNG and tuning, borrowed disjointly
    pub(crate) fn parts_mut(&mut self) -> ScenePartsMut<'_> {
        ScenePartsMut {
            objects: &mut self.objects,
            rng: &mut self.rng,
            tuning: &self.tuning,
            elapsed: self.elapsed,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }

    pub fn ids_of(&self, kind: ObjectKind) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| o.id)
            .collect()
    }

    /// Build an object through its catalog factory and add it to the scene
    pub fn spawn(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        kind: ObjectKind,
        base: Vec3,
        params: &BuildParams,
    ) -> ObjectId {
        let built = {
            let mut build = Build {
                physics,
                render,
                rng: &mut self.rng,
                tuning: &self.tuning,
            };
            (catalog::spec(kind).factory)(&mut build, base, params)
        };
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(PlacedObject {
            id,
            kind,
            body: built.body,
            visual: built.visual,
            state: built.state,
            params: built.params,
        });
        id
    }

    /// Remove an object and release every body, joint and node it owns
    pub fn remove(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        id: ObjectId,
    ) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id == id) else {
            return false;
        };
        let object = self.objects.remove(index);
        release(&object, physics, render);
        true
    }

    /// Remove every object matching `pred`, returning their ids
    pub fn remove_where(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        pred: impl Fn(&PlacedObject) -> bool,
    ) -> Vec<ObjectId> {
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|o| pred(o));
        self.objects = kept;
        for object in &gone {
            release(object, physics, render);
        }
        gone.into_iter().map(|o| o.id).collect()
    }

    /// Remove every object and in-flight particle
    pub fn clear(&mut self, physics: &mut dyn PhysicsWorld, render: &mut dyn RenderScene) {
        self.remove_where(physics, render, |_| true);
        self.fireworks.clear(render);
    }

    /// Object owning a visual node, if any
    pub fn object_at_node(&self, node: NodeHandle) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|o| o.visual.owns(node))
            .map(|o| o.id)
    }

    /// Every pickable mesh in the scene
    pub fn pickable_nodes(&self) -> Vec<NodeHandle> {
        self.objects
            .iter()
            .flat_map(|o| o.visual.parts.iter().copied())
            .collect()
    }

    /// Object origin: the primary body pose, or the group centre of a
    /// multi-body object
    pub fn anchor_pose(&self, physics: &dyn PhysicsWorld, id: ObjectId) -> Option<(Vec3, Quat)> {
        self.get(id).and_then(|o| anchor_of(o, physics))
    }

    /// Move an object rigidly so its anchor lands on `position`
    ///
    /// Multi-body objects translate every step and keep their rotation; a
    /// hinged object carries its pivot along.
    pub fn set_anchor_pose(
        &self,
        physics: &mut dyn PhysicsWorld,
        id: ObjectId,
        position: Vec3,
        rotation: Quat,
    ) {
        let Some(object) = self.get(id) else {
            return;
        };
        let Some((anchor, _)) = anchor_of(object, physics) else {
            return;
        };
        let delta = position - anchor;
        match &object.state {
            KindState::MultiBody(steps) => {
                for step in steps {
                    if let Some(state) = physics.body_mut(step.body) {
                        state.position += delta;
                    }
                }
            }
            KindState::Hinged(hinge) => {
                physics.set_pose(object.body, position, rotation);
                if let Some(state) = physics.body_mut(hinge.pivot_body) {
                    state.position += delta;
                }
            }
            _ => physics.set_pose(object.body, position, rotation),
        }
    }

    /// Zero linear and angular velocity on every body of an object
    pub fn halt(&self, physics: &mut dyn PhysicsWorld, id: ObjectId) {
        if let Some(object) = self.get(id) {
            for body in object.bodies() {
                physics.halt(body);
            }
        }
    }

    /// Copy an object's physics pose onto its visual nodes
    pub fn sync_visual(
        &self,
        physics: &dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        id: ObjectId,
    ) {
        if let Some(object) = self.get(id) {
            sync_object(object, physics, render);
        }
    }

    /// Mirror physics into visuals for everything except `skip`
    pub fn sync_visuals(
        &self,
        physics: &dyn PhysicsWorld,
        render: &mut dyn RenderScene,
        skip: Option<ObjectId>,
    ) {
        for object in self.objects.iter().filter(|o| Some(o.id) != skip) {
            sync_object(object, physics, render);
        }
    }

    pub fn decorations(&self) -> &[NodeHandle] {
        &self.decorations
    }

    pub fn add_decoration(&mut self, node: NodeHandle) {
        self.decorations.push(node);
    }
}

fn anchor_of(object: &PlacedObject, physics: &dyn PhysicsWorld) -> Option<(Vec3, Quat)> {
    match &object.state {
        KindState::MultiBody(steps) => {
            let first = steps.first()?;
            let (pos, _) = physics.pose(first.body)?;
            Some((pos - first.offset, Quat::IDENTITY))
        }
        _ => physics.pose(object.body),
    }
}

fn sync_object(object: &PlacedObject, physics: &dyn PhysicsWorld, render: &mut dyn RenderScene) {
    if let Some((position, rotation)) = anchor_of(object, physics) {
        render.set_transform(object.visual.root, position, rotation);
    }
    if let KindState::Hinged(hinge) = &object.state {
        if let Some((position, rotation)) = physics.pose(hinge.pivot_body) {
            render.set_transform(hinge.pivot_node, position, rotation);
        }
    }
}

fn release(object: &PlacedObject, physics: &mut dyn PhysicsWorld, render: &mut dyn RenderScene) {
    if let KindState::Hinged(hinge) = &object.state {
        physics.remove_constraint(hinge.joint);
        render.destroy_node(hinge.pivot_node);
    }
    for body in object.bodies() {
        physics.remove_body(body);
    }
    render.destroy_node(object.visual.root);
}
