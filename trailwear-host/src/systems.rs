//! Host-side systems for the wear engine.
//!
//! ## System Budget
//!
//! | System            | Frequency                 |
//! |-------------------|---------------------------|
//! | Movement observer | Every host tick per actor |
//! | Decay sweep       | Every `sweep.interval_ms` |
//! | Save / load       | World lifecycle           |

use trailwear_core::decay::SweepReport;
use trailwear_core::pending::ReleaseReport;
use trailwear_core::terrain::Terrain;
use trailwear_core::types::{CellPos, WorldHours, WorldPos};
use trailwear_core::WearEngine;

use crate::components::ActorTrail;

/// What happened when an actor stepped onto a new cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The cell entered.
    pub cell: CellPos,
    /// Its wear level after this visit.
    pub wear_level: i32,
    /// Deferred conversions released by the actor's new position.
    pub release: ReleaseReport,
}

/// Per-actor movement observer step.
///
/// When the cell under the actor changed since the last sample, records a
/// visit on it (capturing the surface found there) and then releases any
/// queued cells the actor is now far enough away from.
pub fn observe_movement<T: Terrain + ?Sized>(
    trail: &mut ActorTrail,
    position: WorldPos,
    now: WorldHours,
    engine: &mut WearEngine,
    terrain: &mut T,
) -> Option<StepOutcome> {
    if !trail.active {
        return None;
    }
    let cell = trail.step(position)?;

    let surface = terrain.surface_at(cell);
    let wear_level = engine.record_visit(cell, now, &surface);
    let release = engine.release_if_far(position, terrain);

    Some(StepOutcome {
        cell,
        wear_level,
        release,
    })
}

/// Fixed-interval timer for the decay sweep.
///
/// The host reports elapsed real time; the scheduler says when a sweep is
/// due. Long stalls fire a single sweep rather than a burst of catch-up
/// sweeps, since one sweep already decays every stale record.
#[derive(Debug, Clone)]
pub struct SweepScheduler {
    interval_ms: u64,
    accumulated_ms: u64,
    sweeps_fired: u64,
}

impl SweepScheduler {
    /// Create a scheduler firing every `interval_ms` (minimum 1).
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accumulated_ms: 0,
            sweeps_fired: 0,
        }
    }

    /// Sweeps fired so far.
    #[must_use]
    pub fn sweeps_fired(&self) -> u64 {
        self.sweeps_fired
    }

    /// Advance by `elapsed_ms`; `true` if a sweep is due now.
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        if self.accumulated_ms < self.interval_ms {
            return false;
        }
        self.accumulated_ms %= self.interval_ms;
        self.sweeps_fired += 1;
        true
    }

    /// Advance and, if due, run the sweep.
    pub fn run<T: Terrain + ?Sized>(
        &mut self,
        elapsed_ms: u64,
        now: WorldHours,
        engine: &mut WearEngine,
        terrain: &mut T,
    ) -> Option<SweepReport> {
        self.advance(elapsed_ms).then(|| engine.tick(now, terrain))
    }
}

impl Default for SweepScheduler {
    fn default() -> Self {
        Self::new(5000)
    }
}
