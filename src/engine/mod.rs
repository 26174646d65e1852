//! Engine boundary
//!
//! The scene core never talks to a concrete renderer or rigid-body solver.
//! It drives these two ports instead:
//! - `PhysicsWorld`: bodies with mass, pose, velocities and point joints
//! - `RenderScene`: visual nodes, picking rays, material swaps
//!
//! `headless` implements both in-process for the native driver and tests.

pub mod headless;
pub mod physics;
pub mod render;

pub use headless::{HeadlessPhysics, HeadlessRender};
pub use physics::{
    BodyDesc, BodyHandle, BodyState, Collider, JointHandle, PhysicsWorld, SurfaceMaterial,
};
pub use render::{MaterialId, NodeDesc, NodeHandle, Ray, RayHit, RenderScene, Shape};
