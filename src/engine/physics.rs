//! Rigid-body physics port
//!
//! Zero mass means fixed: the solver neither integrates nor pushes the body,
//! but its pose can still be written directly. The scene core relies on that
//! both for static fixtures and for temporarily suspending a dragged body.

use glam::{Quat, Vec3};

/// Opaque handle to a body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Opaque handle to a joint owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointHandle(pub u32);

/// Contact properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl SurfaceMaterial {
    pub const fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }
}

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    Cylinder { radius: f32, half_height: f32 },
}

impl Collider {
    /// Half extents of the shape's local bounding box
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Collider::Cuboid { half_extents } => half_extents,
            Collider::Ball { radius } => Vec3::splat(radius),
            Collider::Cylinder {
                radius,
                half_height,
            } => Vec3::new(radius, half_height, radius),
        }
    }
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub collider: Collider,
    pub mass: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub material: SurfaceMaterial,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    pub fn new(collider: Collider, mass: f32, position: Vec3) -> Self {
        Self {
            collider,
            mass,
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            material: SurfaceMaterial::new(0.3, 0.3),
            linear_damping: 0.01,
            angular_damping: 0.01,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_material(mut self, material: SurfaceMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3, angular_velocity: Vec3) -> Self {
        self.velocity = velocity;
        self.angular_velocity = angular_velocity;
        self
    }
}

/// Mutable kinematic state of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

/// Rigid-body simulation consumed by the scene core
pub trait PhysicsWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Remove a body; joints still referencing it are the caller's problem
    fn remove_body(&mut self, body: BodyHandle) -> bool;

    fn body(&self, body: BodyHandle) -> Option<&BodyState>;

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut BodyState>;

    fn mass(&self, body: BodyHandle) -> Option<f32>;

    /// Change mass and refresh derived inertia; zero makes the body fixed
    fn set_mass(&mut self, body: BodyHandle, mass: f32);

    /// Pin `pivot_a` (local to `a`) to `pivot_b` (local to `b`)
    fn add_point_constraint(
        &mut self,
        a: BodyHandle,
        pivot_a: Vec3,
        b: BodyHandle,
        pivot_b: Vec3,
    ) -> JointHandle;

    fn remove_constraint(&mut self, joint: JointHandle) -> bool;

    /// Advance the simulation by one fixed timestep
    fn step(&mut self, dt: f32);

    fn body_count(&self) -> usize;

    fn constraint_count(&self) -> usize;

    fn pose(&self, body: BodyHandle) -> Option<(Vec3, Quat)> {
        self.body(body).map(|b| (b.position, b.rotation))
    }

    fn set_pose(&mut self, body: BodyHandle, position: Vec3, rotation: Quat) {
        if let Some(state) = self.body_mut(body) {
            state.position = position;
            state.rotation = rotation;
        }
    }

    /// Zero linear and angular velocity
    fn halt(&mut self, body: BodyHandle) {
        if let Some(state) = self.body_mut(body) {
            state.velocity = Vec3::ZERO;
            state.angular_velocity = Vec3::ZERO;
        }
    }
}
