//! Free-spot placement
//!
//! Occupancy is a 2D question: every non-sphere object contributes its kind's
//! nominal footprint (plus a buffer) at its ground position, regardless of
//! height or yaw. Searches try random samples in a disk first, then scan a
//! fixed grid over the disk's bounding square, so they always terminate.

use glam::Vec2;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::catalog::footprints_overlap;
use super::kind::ObjectKind;
use super::scene::Scene;
use super::uniform;
use crate::consts::DOMINO_WIDTH;
use crate::engine::PhysicsWorld;
use crate::ground_point;
use crate::tuning::PlacementTuning;

/// A row of evenly spaced dominoes along +X
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    /// Ground x of the first domino
    pub start_x: f32,
    /// Ground z shared by the whole row
    pub z: f32,
    pub spacing: f32,
    pub count: usize,
}

impl RowPlacement {
    /// Row whose dominoes are centred on `center`
    pub fn centred(center: Vec2, count: usize, spacing: f32) -> Self {
        let total = DOMINO_WIDTH + count.saturating_sub(1) as f32 * spacing;
        Self {
            start_x: center.x - total * 0.5 + DOMINO_WIDTH * 0.5,
            z: center.y,
            spacing,
            count,
        }
    }

    /// Ground position of every domino in the row
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.count).map(move |i| Vec2::new(self.start_x + i as f32 * self.spacing, self.z))
    }
}

/// Occupied footprints of the live scene
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    buffer: f32,
    grid_step: f32,
    row_grid_step: f32,
    entries: Vec<(ObjectKind, Vec2)>,
}

impl SpatialIndex {
    pub fn new(tuning: &PlacementTuning) -> Self {
        Self {
            buffer: tuning.buffer,
            grid_step: tuning.grid_step.max(0.01),
            row_grid_step: tuning.row_grid_step.max(0.01),
            entries: Vec::new(),
        }
    }

    /// Index every non-sphere object at its current anchor position
    pub fn from_scene(scene: &Scene, physics: &dyn PhysicsWorld) -> Self {
        let mut index = Self::new(&scene.tuning.placement);
        for object in scene.objects() {
            if let Some((position, _)) = scene.anchor_pose(physics, object.id) {
                index.insert(object.kind, ground_point(position));
            }
        }
        index
    }

    /// Record an occupied footprint; spheres never occupy space
    pub fn insert(&mut self, kind: ObjectKind, at: Vec2) {
        if kind != ObjectKind::Sphere {
            self.entries.push((kind, at));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a `kind` footprint at `at` clears every indexed footprint
    pub fn is_free(&self, kind: ObjectKind, at: Vec2) -> bool {
        !self
            .entries
            .iter()
            .any(|&(other, pos)| footprints_overlap(kind, at, other, pos, self.buffer))
    }

    /// Find a free spot for `kind` within `radius` of `center`
    pub fn find_free(
        &self,
        kind: ObjectKind,
        center: Vec2,
        max_attempts: u32,
        radius: f32,
        rng: &mut Pcg32,
    ) -> Option<Vec2> {
        for _ in 0..max_attempts {
            let candidate = center + sample_disk(rng, radius);
            if self.is_free(kind, candidate) {
                log::debug!(
                    "Placed {} at ({:.2}, {:.2}) by random search",
                    kind,
                    candidate.x,
                    candidate.y
                );
                return Some(candidate);
            }
        }
        let found = grid(center, radius, self.grid_step).find(|&p| self.is_free(kind, p));
        match found {
            Some(p) => log::debug!("Placed {} at ({:.2}, {:.2}) by grid scan", kind, p.x, p.y),
            None => log::debug!(
                "Grid scan found no room for {} near ({:.1}, {:.1})",
                kind,
                center.x,
                center.y
            ),
        }
        found
    }

    /// Find a row of `count` dominoes `spacing` apart within `radius` of
    /// `center`, every one of them free
    pub fn find_free_row(
        &self,
        count: usize,
        spacing: f32,
        center: Vec2,
        max_attempts: u32,
        radius: f32,
        rng: &mut Pcg32,
    ) -> Option<RowPlacement> {
        let fits = |row: &RowPlacement| {
            row.positions().all(|p| self.is_free(ObjectKind::Domino, p))
        };
        for _ in 0..max_attempts {
            let row = RowPlacement::centred(center + sample_disk(rng, radius), count, spacing);
            if fits(&row) {
                log::debug!("Placed {} dominoes from x={:.2} by random search", count, row.start_x);
                return Some(row);
            }
        }
        let found = grid(center, radius, self.row_grid_step)
            .map(|c| RowPlacement::centred(c, count, spacing))
            .find(|row| fits(row));
        if let Some(row) = &found {
            log::debug!("Placed {} dominoes from x={:.2} by grid scan", count, row.start_x);
        }
        found
    }
}

/// Uniform point in a disk of `radius`
fn sample_disk(rng: &mut Pcg32, radius: f32) -> Vec2 {
    let r = radius * uniform(rng, 0.0, 1.0).sqrt();
    let angle = uniform(rng, 0.0, TAU);
    Vec2::new(r * angle.cos(), r * angle.sin())
}

/// Grid points over the square [-radius, radius]² around `center`, row by row
fn grid(center: Vec2, radius: f32, step: f32) -> impl Iterator<Item = Vec2> {
    let cells = (2.0 * radius.max(0.0) / step).floor() as u32;
    (0..=cells).flat_map(move |i| {
        (0..=cells).map(move |j| {
            center + Vec2::new(-radius + j as f32 * step, -radius + i as f32 * step)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn index() -> SpatialIndex {
        SpatialIndex::new(&PlacementTuning::default())
    }

    #[test]
    fn test_empty_index_is_free_everywhere() {
        let idx = index();
        assert!(idx.is_free(ObjectKind::Mountain, Vec2::ZERO));
    }

    #[test]
    fn test_spheres_are_ignored() {
        let mut idx = index();
        idx.insert(ObjectKind::Sphere, Vec2::ZERO);
        assert!(idx.is_empty());
        assert!(idx.is_free(ObjectKind::Domino, Vec2::ZERO));
    }

    #[test]
    fn test_saturated_area_returns_none() {
        let mut idx = index();
        idx.insert(ObjectKind::Mountain, Vec2::ZERO);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(idx.find_free(ObjectKind::Domino, Vec2::ZERO, 50, 2.0, &mut rng), None);
        assert_eq!(idx.find_free_row(3, 0.3, Vec2::ZERO, 50, 2.0, &mut rng), None);
    }

    #[test]
    fn test_grid_phase_finds_gap() {
        let mut idx = index();
        idx.insert(ObjectKind::Mountain, Vec2::ZERO);
        let mut rng = Pcg32::seed_from_u64(1);
        // No random attempts: only the grid can answer
        let found = idx.find_free(ObjectKind::Box, Vec2::ZERO, 0, 5.0, &mut rng).unwrap();
        assert!(idx.is_free(ObjectKind::Box, found));
    }

    #[test]
    fn test_ten_domino_row_near_origin() {
        let idx = index();
        let mut rng = Pcg32::seed_from_u64(42);
        let row = idx
            .find_free_row(10, 0.3, Vec2::new(-0.5, -0.5), 50, 10.0, &mut rng)
            .unwrap();
        assert_eq!(row.positions().count(), 10);
        assert!(row.positions().all(|p| idx.is_free(ObjectKind::Domino, p)));
    }

    #[test]
    fn test_centred_row_geometry() {
        let row = RowPlacement::centred(Vec2::ZERO, 3, 0.3);
        let xs: Vec<f32> = row.positions().map(|p| p.x).collect();
        assert!((xs[0] + 0.3).abs() < 1e-6);
        assert!((xs[2] - 0.3).abs() < 1e-6);
    }

    fn kind_strategy() -> impl Strategy<Value = ObjectKind> {
        prop::sample::select(ObjectKind::ALL.to_vec())
    }

    fn occupied_strategy() -> impl Strategy<Value = Vec<(ObjectKind, f32, f32)>> {
        prop::collection::vec((kind_strategy(), -12.0f32..12.0, -12.0f32..12.0), 0..40)
    }

    proptest! {
        #[test]
        fn placed_footprint_is_no_longer_free(
            kind in kind_strategy(),
            other in kind_strategy(),
            x in -10.0f32..10.0,
            z in -10.0f32..10.0,
            dx in -0.2f32..0.2,
            dz in -0.2f32..0.2,
        ) {
            prop_assume!(kind != ObjectKind::Sphere);
            let mut idx = index();
            idx.insert(kind, Vec2::new(x, z));
            prop_assert!(!idx.is_free(other, Vec2::new(x + dx, z + dz)));
            prop_assert!(idx.is_free(other, Vec2::new(x + 100.0, z)));
        }

        #[test]
        fn find_free_only_returns_free_spots(
            occupied in occupied_strategy(),
            kind in kind_strategy(),
            seed in any::<u64>(),
            attempts in 0u32..60,
            radius in 0.5f32..15.0,
        ) {
            let mut idx = index();
            for (k, x, z) in occupied {
                idx.insert(k, Vec2::new(x, z));
            }
            let mut rng = Pcg32::seed_from_u64(seed);
            if let Some(p) = idx.find_free(kind, Vec2::ZERO, attempts, radius, &mut rng) {
                prop_assert!(idx.is_free(kind, p));
            }
        }

        #[test]
        fn find_free_row_only_returns_free_rows(
            occupied in occupied_strategy(),
            count in 1usize..20,
            seed in any::<u64>(),
            attempts in 0u32..60,
            radius in 0.5f32..15.0,
        ) {
            let mut idx = index();
            for (k, x, z) in occupied {
                idx.insert(k, Vec2::new(x, z));
            }
            let mut rng = Pcg32::seed_from_u64(seed);
            if let Some(row) = idx.find_free_row(
                count,
                0.3,
                Vec2::new(-0.5, -0.5),
                attempts,
                radius,
                &mut rng,
            ) {
                prop_assert_eq!(row.positions().count(), count);
                for p in row.positions() {
                    prop_assert!(idx.is_free(ObjectKind::Domino, p));
                }
            }
        }
    }
}
