//! Placed objects and their per-kind state

use glam::{Quat, Vec2, Vec3};

use super::kind::ObjectKind;
use crate::engine::{BodyHandle, JointHandle, NodeHandle};

/// Stable identity of a placed object within one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Visual nodes owned by one object
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    /// Top-level node mirroring the object's anchor pose
    pub root: NodeHandle,
    /// Pickable meshes, highlighted together on selection
    pub parts: Vec<NodeHandle>,
}

impl Visual {
    /// Single mesh that is both root and the only pickable part
    pub fn single(node: NodeHandle) -> Self {
        Self {
            root: node,
            parts: vec![node],
        }
    }

    pub fn owns(&self, node: NodeHandle) -> bool {
        self.root == node || self.parts.contains(&node)
    }
}

/// Rest pose tracking for objects that right themselves
#[derive(Debug, Clone, PartialEq)]
pub struct Returnable {
    rest_position: Vec3,
    rest_rotation: Quat,
    /// Currently gliding back to rest
    pub returning: bool,
}

impl Returnable {
    pub fn new(rest_position: Vec3, rest_rotation: Quat) -> Self {
        Self {
            rest_position,
            rest_rotation,
            returning: false,
        }
    }

    pub fn rest_position(&self) -> Vec3 {
        self.rest_position
    }

    pub fn rest_rotation(&self) -> Quat {
        self.rest_rotation
    }
}

/// Fixed pivot and joint owned by a seesaw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hinge {
    pub pivot_body: BodyHandle,
    pub pivot_node: NodeHandle,
    pub joint: JointHandle,
}

/// Grazing sub-state of a cow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Graze {
    /// Independently rotatable head group
    pub head: NodeHandle,
    pub grazing: bool,
    /// Seconds of grazing left
    pub remaining: f32,
}

/// Wandering state of a penguin or cow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    /// Unit heading on the ground plane (x, z)
    pub heading: Vec2,
    /// Seconds until the next heading change
    pub timer: f32,
    /// Present only for kinds that graze
    pub graze: Option<Graze>,
}

/// Circular path position of the vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Path angle in [0, 2π)
    pub angle: f32,
    /// Radians added per tick
    pub speed: f32,
}

/// One body of a multi-body object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepBody {
    pub body: BodyHandle,
    /// World-space offset from the object's anchor
    pub offset: Vec3,
}

/// Extra state carried only by the kinds that need it
#[derive(Debug, Clone, PartialEq)]
pub enum KindState {
    Plain,
    Returnable(Returnable),
    Hinged(Hinge),
    Patrolling(Patrol),
    Orbiting(Orbit),
    /// Ordered step bodies; the first one is the object's primary body
    MultiBody(Vec<StepBody>),
    Triggerable {
        triggered: bool,
    },
}

/// Step dimensions of a staircase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl StepSize {
    /// Steps needed to climb from `start` to `end`, uncapped
    pub fn steps_between(&self, start: Vec3, end: Vec3) -> f32 {
        ((end.y - start.y).abs() / self.height.max(0.01)).ceil().max(1.0)
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.depth > 0.0
    }
}

impl Default for StepSize {
    fn default() -> Self {
        Self {
            width: 1.5,
            height: 0.3,
            depth: 0.5,
        }
    }
}

/// Construction parameters of the parameterised kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildParams {
    None,
    Plank {
        length: f32,
        width: f32,
        height: f32,
        yaw: f32,
    },
    Guardrail {
        length: f32,
        height: f32,
        yaw: f32,
    },
    Mountain {
        height: f32,
        radius: f32,
    },
    Road {
        start: Vec3,
        end: Vec3,
        width: f32,
        height: f32,
    },
    Stairs {
        start: Vec3,
        end: Vec3,
        step: StepSize,
    },
    Vehicle {
        angle: f32,
    },
}

/// The unit of scene state
///
/// Physics owns the pose; `visual` is a mirror refreshed every frame. Both
/// are created together by a factory and released together by
/// `Scene::remove`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Primary physics body
    pub body: BodyHandle,
    pub visual: Visual,
    pub state: KindState,
    pub params: BuildParams,
}

impl PlacedObject {
    /// Every physics body this object owns, primary first
    pub fn bodies(&self) -> Vec<BodyHandle> {
        match &self.state {
            KindState::MultiBody(steps) => steps.iter().map(|s| s.body).collect(),
            KindState::Hinged(hinge) => vec![self.body, hinge.pivot_body],
            _ => vec![self.body],
        }
    }

    pub fn returnable(&self) -> Option<&Returnable> {
        match &self.state {
            KindState::Returnable(r) => Some(r),
            _ => None,
        }
    }

    pub fn patrol(&self) -> Option<&Patrol> {
        match &self.state {
            KindState::Patrolling(p) => Some(p),
            _ => None,
        }
    }

    pub fn orbit(&self) -> Option<&Orbit> {
        match &self.state {
            KindState::Orbiting(o) => Some(o),
            _ => None,
        }
    }

    pub fn hinge(&self) -> Option<&Hinge> {
        match &self.state {
            KindState::Hinged(h) => Some(h),
            _ => None,
        }
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self.state, KindState::Triggerable { triggered: true })
    }
}
