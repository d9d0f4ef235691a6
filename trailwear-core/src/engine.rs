//! The wear engine — single owner of all wear state.
//!
//! Hosts construct one [`WearEngine`] per world and pass it (or a handle to
//! it) to whatever delivers movement events and timer ticks. Every mutation
//! takes `&mut self`; callbacks are expected to arrive one at a time.

use tracing::{debug, info};

use crate::accumulator;
use crate::config::{PersistenceConfig, WearConfig};
use crate::decay::{self, SweepReport};
use crate::error::Result;
use crate::pending::{self, PendingEffects, ReleaseReport};
use crate::persistence::{decode_snapshot, encode_snapshot, BlobStore, WearSnapshot};
use crate::store::{WearRecord, WearStore};
use crate::terrain::Terrain;
use crate::types::{CellPos, SurfaceId, WorldHours, WorldPos};

/// Point-in-time counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WearStats {
    /// Cells currently tracked.
    pub tracked_cells: usize,
    /// Cells awaiting deferred conversion.
    pub pending_effects: usize,
    /// Visits recorded since construction.
    pub total_visits: u64,
    /// Sweeps run since construction.
    pub total_sweeps: u64,
    /// Paths formed since construction.
    pub paths_formed: u64,
    /// Cells reverted since construction.
    pub paths_reverted: u64,
}

/// Wear-state lifecycle engine: store, deferred queue and tuning.
#[derive(Debug, Clone, Default)]
pub struct WearEngine {
    config: WearConfig,
    store: WearStore,
    pending: PendingEffects,
    stats: WearStats,
}

impl WearEngine {
    /// Create an empty engine with the given tuning.
    #[must_use]
    pub fn new(config: WearConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Tuning in effect.
    #[must_use]
    pub fn config(&self) -> &WearConfig {
        &self.config
    }

    /// Read access to the store.
    #[must_use]
    pub fn store(&self) -> &WearStore {
        &self.store
    }

    /// Read access to the deferred queue.
    #[must_use]
    pub fn pending(&self) -> &PendingEffects {
        &self.pending
    }

    /// Record at `pos`, if tracked.
    #[must_use]
    pub fn record(&self, pos: CellPos) -> Option<&WearRecord> {
        self.store.get(pos)
    }

    /// Current wear level at `pos`, if tracked.
    #[must_use]
    pub fn wear_level(&self, pos: CellPos) -> Option<i32> {
        self.store.wear_level(pos)
    }

    /// Diagnostic counters.
    #[must_use]
    pub fn stats(&self) -> WearStats {
        WearStats {
            tracked_cells: self.store.len(),
            pending_effects: self.pending.len(),
            ..self.stats
        }
    }

    /// An actor entered `pos`; `current_surface` is what lies there now.
    ///
    /// Returns the new wear level.
    pub fn record_visit(
        &mut self,
        pos: CellPos,
        now: WorldHours,
        current_surface: &SurfaceId,
    ) -> i32 {
        self.stats.total_visits += 1;
        accumulator::record_visit(&mut self.store, &mut self.pending, pos, now, current_surface)
    }

    /// Evaluate every queued cell at least `release_distance` away from `actor`.
    pub fn release_if_far<T: Terrain + ?Sized>(
        &mut self,
        actor: WorldPos,
        terrain: &mut T,
    ) -> ReleaseReport {
        let report = self
            .pending
            .release_if_far(actor, &self.store, &self.config, terrain);
        self.stats.paths_formed += report.converted as u64;
        report
    }

    /// Run the path conversion check for `pos` at `wear_level` immediately.
    pub fn apply_path_effect<T: Terrain + ?Sized>(
        &mut self,
        pos: CellPos,
        wear_level: i32,
        terrain: &mut T,
    ) -> bool {
        let converted = pending::apply_path_effect(pos, wear_level, &self.config, terrain);
        if converted {
            self.stats.paths_formed += 1;
        }
        converted
    }

    /// Periodic decay sweep.
    pub fn tick<T: Terrain + ?Sized>(&mut self, now: WorldHours, terrain: &mut T) -> SweepReport {
        let report = decay::sweep(&mut self.store, now, &self.config, terrain);
        self.stats.total_sweeps += 1;
        self.stats.paths_reverted += report.reverted as u64;

        if report.is_quiet() {
            debug!(at = %now, scanned = report.scanned, "Wear sweep: nothing to do");
        } else {
            info!(
                at = %now,
                scanned = report.scanned,
                decayed = report.decayed,
                plants_cleared = report.plants_cleared,
                reverted = report.reverted,
                removed = report.removed,
                "Wear sweep"
            );
        }
        report
    }

    /// Copy of the store for saving.
    #[must_use]
    pub fn snapshot(&self) -> WearSnapshot {
        WearSnapshot::capture(&self.store)
    }

    /// Replace all state from a snapshot. The deferred queue is cleared.
    pub fn restore(&mut self, snapshot: WearSnapshot) {
        self.store.replace(snapshot.into_records());
        self.pending.clear();
    }

    /// Encode the store and write it under the configured namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the blob store write fails.
    pub fn save_to<B: BlobStore + ?Sized>(
        &self,
        blobs: &mut B,
        config: &PersistenceConfig,
    ) -> Result<()> {
        let bytes = encode_snapshot(&self.store, config.codec)?;
        blobs.write_blob(&config.namespace, &bytes)?;
        info!(
            namespace = %config.namespace,
            cells = self.store.len(),
            bytes = bytes.len(),
            "Wear state saved"
        );
        Ok(())
    }

    /// Replace the store from the blob under the configured namespace.
    ///
    /// A missing blob leaves the engine empty. The deferred queue is cleared
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob store read fails or the blob is malformed;
    /// the current state is left untouched in that case.
    pub fn load_from<B: BlobStore + ?Sized>(
        &mut self,
        blobs: &B,
        config: &PersistenceConfig,
    ) -> Result<()> {
        match blobs.read_blob(&config.namespace)? {
            Some(bytes) => {
                let snapshot = decode_snapshot(&bytes, config.codec)?;
                self.restore(snapshot);
                info!(namespace = %config.namespace, cells = self.store.len(), "Wear state loaded");
            }
            None => {
                self.store.clear();
                self.pending.clear();
                info!(namespace = %config.namespace, "No saved wear state; starting empty");
            }
        }
        Ok(())
    }
}
