//! In-process engines
//!
//! `HeadlessPhysics` integrates gravity, damping and a ground plane and
//! projects point joints onto fixed anchors. `HeadlessRender` keeps a node
//! tree, answers picking rays from a top-down orthographic camera, and
//! records material/opacity/banner changes. Neither aims for visual or
//! physical fidelity; both are deterministic.

use std::collections::BTreeMap;

use glam::{Quat, Vec2, Vec3};

use super::physics::{BodyDesc, BodyHandle, BodyState, Collider, JointHandle, PhysicsWorld};
use super::render::{MaterialId, NodeDesc, NodeHandle, Ray, RayHit, RenderScene, Shape};
use crate::consts::{GRAVITY, GROUND_LEVEL};

#[derive(Debug, Clone)]
struct HeadlessBody {
    state: BodyState,
    mass: f32,
    collider: Collider,
}

#[derive(Debug, Clone, Copy)]
struct PointJoint {
    a: BodyHandle,
    pivot_a: Vec3,
    b: BodyHandle,
    pivot_b: Vec3,
}

/// Minimal rigid-body world
#[derive(Debug, Clone)]
pub struct HeadlessPhysics {
    bodies: BTreeMap<BodyHandle, HeadlessBody>,
    joints: BTreeMap<JointHandle, PointJoint>,
    next_id: u32,
    gravity: f32,
}

impl Default for HeadlessPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPhysics {
    pub fn new() -> Self {
        Self::with_gravity(GRAVITY)
    }

    pub fn with_gravity(gravity: f32) -> Self {
        Self {
            bodies: BTreeMap::new(),
            joints: BTreeMap::new(),
            next_id: 1,
            gravity,
        }
    }

    fn next_handle(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    /// Joints that reference a body that no longer exists
    pub fn dangling_constraints(&self) -> usize {
        self.joints
            .values()
            .filter(|j| !self.bodies.contains_key(&j.a) || !self.bodies.contains_key(&j.b))
            .count()
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            if body.mass <= 0.0 {
                continue;
            }
            let s = &mut body.state;
            s.velocity.y += gravity * dt;
            s.velocity *= (1.0 - s.linear_damping).clamp(0.0, 1.0).powf(dt);
            s.angular_velocity *= (1.0 - s.angular_damping).clamp(0.0, 1.0).powf(dt);
            s.position += s.velocity * dt;

            let w = s.angular_velocity;
            if w != Vec3::ZERO {
                let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * s.rotation;
                let r = s.rotation;
                s.rotation = Quat::from_xyzw(
                    r.x + 0.5 * dt * spin.x,
                    r.y + 0.5 * dt * spin.y,
                    r.z + 0.5 * dt * spin.z,
                    r.w + 0.5 * dt * spin.w,
                )
                .normalize();
            }

            // Resting contact with the ground plane
            let floor = GROUND_LEVEL + body.collider.half_extents().y;
            if s.position.y < floor {
                s.position.y = floor;
                s.velocity.y = s.velocity.y.max(0.0);
            }
        }
    }

    fn solve_joints(&mut self) {
        let joints: Vec<PointJoint> = self.joints.values().copied().collect();
        for joint in joints {
            let (Some(a), Some(b)) = (self.bodies.get(&joint.a), self.bodies.get(&joint.b)) else {
                continue;
            };
            let anchor_a = a.state.position + a.state.rotation * joint.pivot_a;
            let anchor_b = b.state.position + b.state.rotation * joint.pivot_b;
            let error = anchor_b - anchor_a;
            match (a.mass > 0.0, b.mass > 0.0) {
                // Pinned to a fixed anchor: no linear motion survives the projection
                (true, false) => {
                    if let Some(a) = self.bodies.get_mut(&joint.a) {
                        a.state.position += error;
                        a.state.velocity = Vec3::ZERO;
                    }
                }
                (false, true) => {
                    if let Some(b) = self.bodies.get_mut(&joint.b) {
                        b.state.position -= error;
                        b.state.velocity = Vec3::ZERO;
                    }
                }
                (true, true) => {
                    let (ma, mb) = (a.mass, b.mass);
                    let total = ma + mb;
                    if let Some(a) = self.bodies.get_mut(&joint.a) {
                        a.state.position += error * (mb / total);
                    }
                    if let Some(b) = self.bodies.get_mut(&joint.b) {
                        b.state.position -= error * (ma / total);
                    }
                }
                (false, false) => {}
            }
        }
    }
}

impl PhysicsWorld for HeadlessPhysics {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle());
        self.bodies.insert(
            handle,
            HeadlessBody {
                state: BodyState {
                    position: desc.position,
                    rotation: desc.rotation,
                    velocity: desc.velocity,
                    angular_velocity: desc.angular_velocity,
                    linear_damping: desc.linear_damping,
                    angular_damping: desc.angular_damping,
                },
                mass: desc.mass.max(0.0),
                collider: desc.collider,
            },
        );
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        self.bodies.remove(&body).is_some()
    }

    fn body(&self, body: BodyHandle) -> Option<&BodyState> {
        self.bodies.get(&body).map(|b| &b.state)
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut BodyState> {
        self.bodies.get_mut(&body).map(|b| &mut b.state)
    }

    fn mass(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(&body).map(|b| b.mass)
    }

    fn set_mass(&mut self, body: BodyHandle, mass: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.mass = mass.max(0.0);
        }
    }

    fn add_point_constraint(
        &mut self,
        a: BodyHandle,
        pivot_a: Vec3,
        b: BodyHandle,
        pivot_b: Vec3,
    ) -> JointHandle {
        let handle = JointHandle(self.next_handle());
        self.joints.insert(
            handle,
            PointJoint {
                a,
                pivot_a,
                b,
                pivot_b,
            },
        );
        handle
    }

    fn remove_constraint(&mut self, joint: JointHandle) -> bool {
        self.joints.remove(&joint).is_some()
    }

    fn step(&mut self, dt: f32) {
        self.integrate(dt);
        self.solve_joints();
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn constraint_count(&self) -> usize {
        self.joints.len()
    }
}

#[derive(Debug, Clone)]
struct HeadlessNode {
    shape: Shape,
    position: Vec3,
    rotation: Quat,
    material: MaterialId,
    opacity: f32,
    scale: f32,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

/// Node tree with a top-down orthographic camera
///
/// Pointer coordinates are world (x, z); picking rays start high above the
/// arena and point straight down.
#[derive(Debug, Clone)]
pub struct HeadlessRender {
    nodes: BTreeMap<NodeHandle, HeadlessNode>,
    next_id: u32,
    camera_controls: bool,
    camera_height: f32,
    banners: Vec<String>,
}

impl Default for HeadlessRender {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRender {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            camera_controls: true,
            camera_height: 100.0,
            banners: Vec::new(),
        }
    }

    pub fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn material(&self, node: NodeHandle) -> Option<MaterialId> {
        self.nodes.get(&node).map(|n| n.material)
    }

    pub fn opacity(&self, node: NodeHandle) -> Option<f32> {
        self.nodes.get(&node).map(|n| n.opacity)
    }

    pub fn scale(&self, node: NodeHandle) -> Option<f32> {
        self.nodes.get(&node).map(|n| n.scale)
    }

    pub fn camera_controls_enabled(&self) -> bool {
        self.camera_controls
    }

    pub fn banners(&self) -> &[String] {
        &self.banners
    }

    /// Transform composed through every ancestor
    pub fn world_transform(&self, node: NodeHandle) -> Option<(Vec3, Quat)> {
        let n = self.nodes.get(&node)?;
        match n.parent {
            Some(parent) => {
                let (pp, pr) = self.world_transform(parent)?;
                Some((pp + pr * n.position, pr * n.rotation))
            }
            None => Some((n.position, n.rotation)),
        }
    }
}

/// Entry distance of a ray against a centred box, clamped to the origin
fn ray_box(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for i in 0..3 {
        let (o, d, h) = (origin[i], dir[i], half[i]);
        if d.abs() < 1e-8 {
            if o < -h || o > h {
                return None;
            }
        } else {
            let t1 = (-h - o) / d;
            let t2 = (h - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
    }
    let entry = t_min.max(0.0);
    (t_max >= entry).then_some(entry)
}

impl RenderScene for HeadlessRender {
    fn create_node(&mut self, desc: &NodeDesc) -> NodeHandle {
        let handle = NodeHandle(self.next_id);
        self.next_id += 1;
        let parent = desc.parent.filter(|p| self.nodes.contains_key(p));
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(handle);
        }
        self.nodes.insert(
            handle,
            HeadlessNode {
                shape: desc.shape,
                position: desc.position,
                rotation: desc.rotation,
                material: desc.material,
                opacity: 1.0,
                scale: 1.0,
                parent,
                children: Vec::new(),
            },
        );
        handle
    }

    fn destroy_node(&mut self, node: NodeHandle) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        if let Some(p) = removed.parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        for child in removed.children {
            self.destroy_node(child);
        }
    }

    fn set_transform(&mut self, node: NodeHandle, position: Vec3, rotation: Quat) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.position = position;
            n.rotation = rotation;
        }
    }

    fn transform(&self, node: NodeHandle) -> Option<(Vec3, Quat)> {
        self.nodes.get(&node).map(|n| (n.position, n.rotation))
    }

    fn set_material(&mut self, node: NodeHandle, material: MaterialId) -> Option<MaterialId> {
        self.nodes
            .get_mut(&node)
            .map(|n| std::mem::replace(&mut n.material, material))
    }

    fn set_opacity(&mut self, node: NodeHandle, opacity: f32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn set_scale(&mut self, node: NodeHandle, scale: f32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.scale = scale;
        }
    }

    fn screen_ray(&self, pointer: Vec2) -> Ray {
        Ray::new(
            Vec3::new(pointer.x, self.camera_height, pointer.y),
            Vec3::NEG_Y,
        )
    }

    fn raycast(&self, ray: &Ray, candidates: &[NodeHandle]) -> Option<RayHit> {
        candidates
            .iter()
            .filter_map(|&node| {
                let n = self.nodes.get(&node)?;
                let half = n.shape.half_extents()? * n.scale;
                let (pos, rot) = self.world_transform(node)?;
                let inv = rot.inverse();
                let t = ray_box(inv * (ray.origin - pos), inv * ray.direction, half)?;
                Some(RayHit {
                    node,
                    point: ray.at(t),
                    distance: t,
                })
            })
            .min_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn set_camera_controls(&mut self, enabled: bool) {
        self.camera_controls = enabled;
    }

    fn show_banner(&mut self, text: &str) {
        log::info!("Banner: {}", text);
        self.banners.push(text.to_string());
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
