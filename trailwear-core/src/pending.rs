//! Deferred path conversion.
//!
//! Turning the ground into a path right under an actor's feet is jarring, so
//! a visited cell is only queued here. The conversion check runs once an
//! actor is at least `release_distance` away from the queued cell, and the
//! cell leaves the queue whether or not it converted.
//!
//! Release is purely positional: whichever actor's movement triggers the
//! check releases every cell it is far enough from, not only the cells that
//! actor queued.

use std::collections::HashSet;

use tracing::debug;

use crate::config::WearConfig;
use crate::store::WearStore;
use crate::terrain::{is_soil_like, Terrain};
use crate::types::{CellPos, WorldPos};

/// Outcome of a [`PendingEffects::release_if_far`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Cells evaluated and removed from the queue.
    pub released: usize,
    /// Cells whose surface was converted to the worn path.
    pub converted: usize,
    /// Released cells whose record had already been removed.
    pub vanished: usize,
}

/// Duplicate-free set of cells awaiting conversion evaluation.
#[derive(Debug, Clone, Default)]
pub struct PendingEffects {
    cells: HashSet<CellPos>,
}

impl PendingEffects {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `pos`. Returns `false` if it was already queued.
    pub fn enqueue(&mut self, pos: CellPos) -> bool {
        self.cells.insert(pos)
    }

    /// Whether `pos` is queued.
    #[must_use]
    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains(&pos)
    }

    /// Number of queued cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop every queued cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Evaluate and dequeue every cell at least `release_distance` from `actor`.
    pub fn release_if_far<T: Terrain + ?Sized>(
        &mut self,
        actor: WorldPos,
        store: &WearStore,
        config: &WearConfig,
        terrain: &mut T,
    ) -> ReleaseReport {
        let threshold = config.release_distance_sq();
        let far: Vec<CellPos> = self
            .cells
            .iter()
            .copied()
            .filter(|pos| pos.distance_sq_to(actor) >= threshold)
            .collect();

        let mut report = ReleaseReport::default();
        for pos in far {
            match store.wear_level(pos) {
                Some(level) => {
                    if apply_path_effect(pos, level, config, terrain) {
                        report.converted += 1;
                    }
                }
                None => report.vanished += 1,
            }
            self.cells.remove(&pos);
            report.released += 1;
        }

        if report.released > 0 {
            debug!(
                actor = %actor,
                released = report.released,
                converted = report.converted,
                vanished = report.vanished,
                remaining = self.cells.len(),
                "Released deferred path effects"
            );
        }
        report
    }
}

/// Convert `pos` to the worn-path surface if it is worn enough and soil-like.
///
/// Returns `true` if the terrain was changed. Below the threshold, on
/// non-soil ground, or when the worn-path surface is unknown to the host,
/// nothing happens. This never reverts an earlier conversion.
pub fn apply_path_effect<T: Terrain + ?Sized>(
    pos: CellPos,
    wear_level: i32,
    config: &WearConfig,
    terrain: &mut T,
) -> bool {
    if wear_level < config.dirt_path_threshold {
        return false;
    }

    let current = terrain.surface_at(pos);
    if !is_soil_like(terrain, &current, &config.soil_keywords) {
        return false;
    }

    let Some(path) = terrain.resolve_surface(&config.worn_path_surface) else {
        debug!(surface = %config.worn_path_surface, "Worn-path surface unknown to host");
        return false;
    };
    if current == path {
        return false;
    }

    debug!(cell = %pos, from = %current, to = %path, wear = wear_level, "Worn path formed");
    terrain.set_surface(pos, path);
    true
}
