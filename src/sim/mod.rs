//! Scene simulation module
//!
//! Everything that decides what happens in the arena lives here:
//! - Object catalog and factories
//! - Free-spot placement
//! - Per-frame controllers (recovery, agents, orbit, goals and particles)
//! - Pointer interaction
//!
//! Controllers take the `Scene` and the engine ports as explicit arguments.
//! Randomness only comes from the scene's seeded RNG.

pub mod agents;
pub mod bootstrap;
pub mod catalog;
pub mod factory;
pub mod fireworks;
pub mod interaction;
pub mod kind;
pub mod object;
pub mod orbit;
pub mod placement;
pub mod recovery;
pub mod scene;

pub use catalog::{KindSpec, default_params, spec};
pub use fireworks::Fireworks;
pub use interaction::{Interaction, PointerButton};
pub use kind::ObjectKind;
pub use object::{BuildParams, KindState, ObjectId, PlacedObject, StepSize};
pub use placement::{RowPlacement, SpatialIndex};
pub use scene::Scene;

use rand::Rng;
use rand_pcg::Pcg32;

/// Uniform sample in [min, max); an empty range yields `min`
pub(crate) fn uniform(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.random::<f32>()
}
