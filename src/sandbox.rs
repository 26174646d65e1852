//! Frame orchestrator and user-facing actions
//!
//! `Sandbox` owns the engine ports, the scene and the pointer interaction.
//! The host calls `advance` once per rendered frame and forwards UI events to
//! the action methods.

use glam::{Vec2, Vec3};

use crate::consts::{FRAME_DT, GROUND_LEVEL, SPHERE_RADIUS, SPHERE_SPAWN_HALF_EXTENT};
use crate::engine::{HeadlessPhysics, HeadlessRender, PhysicsWorld, RenderScene};
use crate::error::SnapshotError;
use crate::persistence::{LoadReport, Snapshot, SnapshotStore, snapshot};
use crate::settings::Settings;
use crate::sim::factory::launch_sphere;
use crate::sim::{
    BuildParams, Interaction, ObjectId, ObjectKind, PointerButton, Scene, SpatialIndex, StepSize,
    agents, bootstrap, default_params, fireworks, orbit, recovery, uniform,
};
use crate::tuning::Tuning;

/// Random-then-grid search parameters for one placement attempt
#[derive(Debug, Clone, Copy)]
struct Search {
    center: Vec2,
    attempts: u32,
    radius: f32,
}

impl Search {
    const fn new(x: f32, z: f32, attempts: u32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, z),
            attempts,
            radius,
        }
    }
}

const TEN_DOMINO_SEARCH: [Search; 2] = [
    Search::new(-0.5, -0.5, 50, 10.0),
    Search::new(0.0, 0.0, 100, 20.0),
];
const HUNDRED_DOMINO_SEARCH: [Search; 2] = [
    Search::new(-0.5, -0.5, 100, 30.0),
    Search::new(0.0, 0.0, 200, 50.0),
];

/// Stairs added from the panel start inside this half-size square
const STAIRS_SPREAD: f32 = 10.0;
const STAIRS_START_HEIGHT: f32 = 0.2;
const PANEL_STEP: StepSize = StepSize {
    width: 2.5,
    height: 0.5,
    depth: 0.8,
};

/// Search used by the single-object add action of a kind
fn add_search(kind: ObjectKind) -> Option<Search> {
    match kind {
        ObjectKind::Domino | ObjectKind::Box | ObjectKind::Trampoline | ObjectKind::Goal => {
            Some(Search::new(0.0, 0.0, 50, 10.0))
        }
        ObjectKind::Ramp
        | ObjectKind::Seesaw
        | ObjectKind::Plank
        | ObjectKind::Guardrail
        | ObjectKind::Shrine => {
            Some(Search::new(0.0, 0.0, 100, 15.0))
        }
        _ => None,
    }
}

/// The whole interactive sandbox
pub struct Sandbox<P: PhysicsWorld, R: RenderScene> {
    physics: P,
    render: R,
    scene: Scene,
    interaction: Interaction,
    store: SnapshotStore,
    frame: u64,
}

impl Sandbox<HeadlessPhysics, HeadlessRender> {
    /// Sandbox on the in-process engines with default tuning and settings
    pub fn headless(seed: u64) -> Self {
        Self::new(
            HeadlessPhysics::new(),
            HeadlessRender::new(),
            seed,
            Tuning::default(),
            Settings::default(),
        )
    }
}

impl<P: PhysicsWorld, R: RenderScene> Sandbox<P, R> {
    /// Empty arena; call `bootstrap` or `restore_or_bootstrap` to populate it
    pub fn new(physics: P, render: R, seed: u64, tuning: Tuning, settings: Settings) -> Self {
        Self {
            physics,
            render,
            scene: Scene::new(seed, tuning, settings),
            interaction: Interaction::default(),
            store: SnapshotStore::default(),
            frame: 0,
        }
    }

    /// Use a different snapshot slot for save/load
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        self.store = store;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn settings(&self) -> &Settings {
        &self.scene.settings
    }

    /// Frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Build the default arrangement
    pub fn bootstrap(&mut self) {
        bootstrap::initial_scene(&mut self.scene, &mut self.physics, &mut self.render);
    }

    /// Startup path: restore the saved scene, or build the default one when
    /// nothing usable is stored. Returns whether a snapshot was restored.
    pub fn restore_or_bootstrap(&mut self) -> bool {
        match self.load() {
            Ok(_) => true,
            Err(SnapshotError::NotFound) => {
                log::info!("No saved scene, building the default arrangement");
                self.bootstrap();
                false
            }
            Err(e) => {
                log::warn!("Saved scene rejected ({}), building the default arrangement", e);
                self.bootstrap();
                false
            }
        }
    }

    /// One frame: physics step, then controllers in fixed order, then the
    /// visual mirror for everything but the dragged object
    pub fn advance(&mut self) {
        let dragged = self.interaction.dragging();

        self.physics.step(FRAME_DT);
        self.scene.elapsed += FRAME_DT;
        self.interaction.hold(&self.scene, &mut self.physics, &mut self.render);

        agents::update(&mut self.scene, &mut self.physics, &mut self.render, FRAME_DT, dragged);
        fireworks::check_goals(&mut self.scene, &self.physics, &mut self.render);
        self.scene
            .fireworks
            .update(&mut self.render, &mut self.scene.rng, &self.scene.tuning.fireworks, FRAME_DT);
        recovery::update(&mut self.scene, &mut self.physics, dragged);
        orbit::update(&mut self.scene, &mut self.physics, &mut self.render, dragged);

        self.scene.sync_visuals(&self.physics, &mut self.render, dragged);
        self.frame += 1;
    }

    /// Advance `frames` frames
    pub fn run(&mut self, frames: u32) {
        for _ in 0..frames {
            self.advance();
        }
    }

    /// Add one object of `kind` at a free spot near the origin
    ///
    /// Stairs get a random rising flight instead. Kinds without an add
    /// action, and searches that find no room, create nothing.
    pub fn add(&mut self, kind: ObjectKind) -> Option<ObjectId> {
        if kind == ObjectKind::Stairs {
            return Some(self.add_stairs());
        }
        let Some(search) = add_search(kind) else {
            log::warn!("{} has no add action", kind);
            return None;
        };
        let index = SpatialIndex::from_scene(&self.scene, &self.physics);
        let Some(spot) = index.find_free(
            kind,
            search.center,
            search.attempts,
            search.radius,
            &mut self.scene.rng,
        ) else {
            log::warn!("No free spot for {}", kind);
            return None;
        };
        Some(self.place(kind, Vec3::new(spot.x, GROUND_LEVEL, spot.y), &default_params(kind)))
    }

    /// Build an object at an explicit placement point, skipping the free-spot
    /// search
    pub fn place(&mut self, kind: ObjectKind, base: Vec3, params: &BuildParams) -> ObjectId {
        self.scene
            .spawn(&mut self.physics, &mut self.render, kind, base, params)
    }

    /// Stairs from a random ground spot up to a random higher point
    pub fn add_stairs(&mut self) -> ObjectId {
        let rng = &mut self.scene.rng;
        let start = Vec3::new(
            uniform(rng, -STAIRS_SPREAD, STAIRS_SPREAD),
            STAIRS_START_HEIGHT,
            uniform(rng, -STAIRS_SPREAD, STAIRS_SPREAD),
        );
        let end = start
            + Vec3::new(
                uniform(rng, 0.0, 4.0),
                uniform(rng, 1.0, 3.0),
                uniform(rng, 0.0, 4.0),
            );
        let params = BuildParams::Stairs {
            start,
            end,
            step: PANEL_STEP,
        };
        self.place(ObjectKind::Stairs, start, &params)
    }

    /// A row of ten dominoes near where spheres are dropped
    pub fn add_ten_dominoes(&mut self) -> Vec<ObjectId> {
        self.add_domino_row(10, &TEN_DOMINO_SEARCH)
    }

    /// A row of a hundred dominoes
    pub fn add_hundred_dominoes(&mut self) -> Vec<ObjectId> {
        self.add_domino_row(100, &HUNDRED_DOMINO_SEARCH)
    }

    fn add_domino_row(&mut self, count: usize, searches: &[Search]) -> Vec<ObjectId> {
        let spacing = crate::consts::DOMINO_ROW_SPACING;
        let index = SpatialIndex::from_scene(&self.scene, &self.physics);
        let row = searches.iter().find_map(|s| {
            index.find_free_row(count, spacing, s.center, s.attempts, s.radius, &mut self.scene.rng)
        });
        let Some(row) = row else {
            log::warn!("No free spot for a row of {} dominoes", count);
            return Vec::new();
        };
        row.positions()
            .map(|p| {
                self.place(
                    ObjectKind::Domino,
                    Vec3::new(p.x, GROUND_LEVEL, p.y),
                    &BuildParams::None,
                )
            })
            .collect()
    }

    /// Replace every sphere with `sphere_count` fresh ones at random spots,
    /// launched with the current launch velocity
    pub fn drop_spheres(&mut self) -> Vec<ObjectId> {
        self.remove_spheres();
        let velocity = self.scene.settings.launch_velocity;
        let count = self.scene.settings.sphere_count;
        let mut ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let base = self.random_sphere_start();
            let id = self.place(ObjectKind::Sphere, base, &BuildParams::None);
            if let Some(object) = self.scene.get(id) {
                launch_sphere(&mut self.physics, object.body, velocity);
            }
            ids.push(id);
        }
        log::info!("Dropped {} spheres", ids.len());
        ids
    }

    /// Send every sphere back to a random start with the current launch
    /// velocity
    pub fn reset_spheres(&mut self) {
        let velocity = self.scene.settings.launch_velocity;
        let bodies: Vec<_> = self
            .scene
            .objects()
            .iter()
            .filter(|o| o.kind == ObjectKind::Sphere)
            .map(|o| o.body)
            .collect();
        for body in bodies {
            let start = self.random_sphere_start();
            if let Some(state) = self.physics.body_mut(body) {
                state.position = start;
            }
            launch_sphere(&mut self.physics, body, velocity);
        }
    }

    /// Remove every sphere, dropping the selection if it was one
    pub fn remove_spheres(&mut self) -> usize {
        for id in self.scene.ids_of(ObjectKind::Sphere) {
            self.interaction.forget(id, &mut self.render);
        }
        self.scene
            .remove_where(&mut self.physics, &mut self.render, |o| o.kind == ObjectKind::Sphere)
            .len()
    }

    fn random_sphere_start(&mut self) -> Vec3 {
        let h = SPHERE_SPAWN_HALF_EXTENT;
        let rng = &mut self.scene.rng;
        Vec3::new(uniform(rng, -h, h), GROUND_LEVEL + SPHERE_RADIUS, uniform(rng, -h, h))
    }

    /// Remove every object, spheres included, and any selection or drag
    pub fn clear_all(&mut self) {
        self.interaction.reset(&mut self.render);
        let count = self.scene.len();
        self.scene.clear(&mut self.physics, &mut self.render);
        log::info!("Cleared {} objects", count);
    }

    /// Launch velocity slider (0 = x, 1 = y, 2 = z)
    pub fn set_launch_axis(&mut self, axis: usize, value: f32) {
        self.scene.settings.set_launch_axis(axis, value);
    }

    pub fn set_sphere_count(&mut self, count: u32) {
        self.scene.settings.set_sphere_count(count);
    }

    pub fn pointer_down(&mut self, pointer: Vec2, button: PointerButton) {
        self.interaction
            .pointer_down(&mut self.scene, &mut self.physics, &mut self.render, pointer, button);
    }

    pub fn pointer_move(&mut self, pointer: Vec2) {
        self.interaction
            .pointer_move(&self.scene, &mut self.physics, &mut self.render, pointer);
    }

    pub fn pointer_up(&mut self) {
        self.interaction
            .pointer_up(&self.scene, &mut self.physics, &mut self.render);
    }

    /// Delete key
    pub fn delete_selected(&mut self) -> Option<ObjectId> {
        self.interaction
            .delete_selected(&mut self.scene, &mut self.physics, &mut self.render)
    }

    /// Current arrangement as a snapshot
    pub fn snapshot(&self) -> Snapshot {
        snapshot::capture(&self.scene, &self.physics)
    }

    /// Replace the arrangement with a snapshot's
    ///
    /// An invalid snapshot is rejected before anything changes.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<LoadReport, SnapshotError> {
        snapshot.validate()?;
        self.interaction.reset(&mut self.render);
        snapshot::restore(snapshot, &mut self.scene, &mut self.physics, &mut self.render)
    }

    /// Pretty-printed snapshot JSON
    pub fn export_json(&self) -> Result<String, SnapshotError> {
        let json = self.snapshot().to_json()?;
        log::info!("Exported scene ({} bytes)", json.len());
        Ok(json)
    }

    pub fn import_json(&mut self, json: &str) -> Result<LoadReport, SnapshotError> {
        let snapshot =
            Snapshot::from_json(json).inspect_err(|e| log::warn!("Import rejected: {}", e))?;
        let report = self.apply_snapshot(&snapshot)?;
        log::info!("Imported scene with {} objects", report.restored);
        Ok(report)
    }

    /// Write the arrangement to the local slot
    pub fn save(&self) -> Result<(), SnapshotError> {
        self.store.save(&self.snapshot())
    }

    /// Restore the arrangement from the local slot
    pub fn load(&mut self) -> Result<LoadReport, SnapshotError> {
        let snapshot = self.store.load().inspect_err(|e| {
            if !matches!(e, SnapshotError::NotFound) {
                log::warn!("Saved scene rejected: {}", e);
            }
        })?;
        let report = self.apply_snapshot(&snapshot)?;
        log::info!("Loaded scene with {} objects", report.restored);
        Ok(report)
    }
}
