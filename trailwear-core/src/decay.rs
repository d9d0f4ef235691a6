//! Decay sweep — the periodic pass that lets unused paths grow back.
//!
//! Every record is processed independently, in three steps:
//!
//! 1. **Staleness decay** — a record untouched for more than
//!    `stale_after_hours` loses one level and has its timestamp reset to
//!    `now`, so a stale record drips down by one per stale window rather
//!    than once per sweep.
//! 2. **Vegetation removal** — a plant in the cell directly above a record
//!    at or past `plant_kill_threshold` is cleared, on every qualifying sweep.
//! 3. **Reversion** — a record at level 0 or below restores its original
//!    surface (when the host still knows it) and is removed. Removals are
//!    applied after the scan.

use tracing::{debug, warn};

use crate::config::WearConfig;
use crate::store::{WearRecord, WearStore};
use crate::terrain::Terrain;
use crate::types::{CellPos, Material, WorldHours};

/// Counters from a single [`sweep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records visited.
    pub scanned: usize,
    /// Records that lost a level to staleness.
    pub decayed: usize,
    /// Plants cleared above worn cells.
    pub plants_cleared: usize,
    /// Cells whose original surface was restored.
    pub reverted: usize,
    /// Records removed from the store.
    pub removed: usize,
}

impl SweepReport {
    /// Whether the sweep changed anything.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.decayed == 0 && self.plants_cleared == 0 && self.removed == 0
    }
}

/// Run one decay pass over every record in `store`.
pub fn sweep<T: Terrain + ?Sized>(
    store: &mut WearStore,
    now: WorldHours,
    config: &WearConfig,
    terrain: &mut T,
) -> SweepReport {
    let mut report = SweepReport::default();

    let removed = store.scan_and_prune(|pos, record| {
        report.scanned += 1;

        if decay_if_stale(record, now, config.stale_after_hours) {
            report.decayed += 1;
        }

        if record.wear_level >= config.plant_kill_threshold && clear_plant_above(pos, terrain) {
            report.plants_cleared += 1;
        }

        if record.is_spent() {
            if revert(pos, record, terrain) {
                report.reverted += 1;
            }
            return true;
        }
        false
    });
    report.removed = removed.len();

    report
}

/// Drop one level if the record has been untouched for longer than `stale_after_hours`.
fn decay_if_stale(record: &mut WearRecord, now: WorldHours, stale_after_hours: f64) -> bool {
    if now.since(record.last_update) > stale_after_hours {
        record.wear_level = record.wear_level.saturating_sub(1);
        record.last_update = now;
        return true;
    }
    false
}

fn clear_plant_above<T: Terrain + ?Sized>(pos: CellPos, terrain: &mut T) -> bool {
    let Some(above) = pos.up() else {
        return false;
    };
    let surface = terrain.surface_at(above);
    if terrain.material_of(&surface) != Material::Plant {
        return false;
    }
    debug!(cell = %above, plant = %surface, "Trampled vegetation cleared");
    terrain.clear_cell(above);
    true
}

fn revert<T: Terrain + ?Sized>(pos: CellPos, record: &WearRecord, terrain: &mut T) -> bool {
    if !record.has_original_surface() {
        return false;
    }
    let Some(original) = terrain.resolve_surface(&record.original_surface) else {
        warn!(
            cell = %pos,
            surface = %record.original_surface,
            "Original surface no longer resolves; leaving terrain as-is"
        );
        return false;
    };
    debug!(cell = %pos, to = %original, "Path reverted");
    terrain.set_surface(pos, original);
    true
}
