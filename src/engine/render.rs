//! Render port
//!
//! Visual nodes are a derived mirror of physics state. The core creates and
//! destroys them, writes their transforms, and uses them for picking; it never
//! sees lighting, shadows, or how materials are built.

use glam::{Quat, Vec2, Vec3};

/// Opaque handle to a visual node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u32);

/// Material reference, identified by its base colour (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Selection highlight
    pub const HIGHLIGHT: MaterialId = MaterialId(0xffff00);
}

/// Visual geometry of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    Cone { radius: f32, height: f32 },
    Cylinder { radius: f32, half_height: f32 },
    /// Transform-only container
    Group,
}

impl Shape {
    /// Half extents of the local bounding box, `None` for groups
    pub fn half_extents(&self) -> Option<Vec3> {
        match *self {
            Shape::Cuboid { half_extents } => Some(half_extents),
            Shape::Ball { radius } => Some(Vec3::splat(radius)),
            Shape::Cone { radius, height } => Some(Vec3::new(radius, height * 0.5, radius)),
            Shape::Cylinder {
                radius,
                half_height,
            } => Some(Vec3::new(radius, half_height, radius)),
            Shape::Group => None,
        }
    }
}

/// Everything needed to create a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDesc {
    pub shape: Shape,
    /// Local to `parent` when set, world otherwise
    pub position: Vec3,
    pub rotation: Quat,
    pub material: MaterialId,
    pub parent: Option<NodeHandle>,
}

impl NodeDesc {
    pub fn new(shape: Shape, position: Vec3, material: MaterialId) -> Self {
        Self {
            shape,
            position,
            rotation: Quat::IDENTITY,
            material,
            parent: None,
        }
    }

    pub fn group(position: Vec3) -> Self {
        Self::new(Shape::Group, position, MaterialId(0))
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn child_of(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Half-line used for picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with the plane `y = height`, ahead of the origin only
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then(|| self.at(t))
    }
}

/// Nearest intersection of a ray with a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeHandle,
    pub point: Vec3,
    pub distance: f32,
}

/// Visual scene consumed by the scene core
pub trait RenderScene {
    fn create_node(&mut self, desc: &NodeDesc) -> NodeHandle;

    /// Destroy a node together with all of its children
    fn destroy_node(&mut self, node: NodeHandle);

    /// Set the node transform (local to its parent, if any)
    fn set_transform(&mut self, node: NodeHandle, position: Vec3, rotation: Quat);

    /// Node transform (local to its parent, if any)
    fn transform(&self, node: NodeHandle) -> Option<(Vec3, Quat)>;

    /// Swap a node's material, returning the one it replaced
    fn set_material(&mut self, node: NodeHandle, material: MaterialId) -> Option<MaterialId>;

    fn set_opacity(&mut self, node: NodeHandle, opacity: f32);

    fn set_scale(&mut self, node: NodeHandle, scale: f32);

    /// Ray from the camera through a pointer position
    fn screen_ray(&self, pointer: Vec2) -> Ray;

    /// Nearest hit among `candidates`
    fn raycast(&self, ray: &Ray, candidates: &[NodeHandle]) -> Option<RayHit>;

    /// Enable or suspend camera navigation input
    fn set_camera_controls(&mut self, enabled: bool);

    /// Short user-facing notification
    fn show_banner(&mut self, text: &str);

    fn node_count(&self) -> usize;
}
