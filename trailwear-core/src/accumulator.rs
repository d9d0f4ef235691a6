//! Visit accumulation — one call per cell an actor steps onto.

use tracing::debug;

use crate::pending::PendingEffects;
use crate::store::{WearRecord, WearStore};
use crate::types::{CellPos, SurfaceId, WorldHours};

/// Record that an actor entered `pos` at `now`.
///
/// Creates the record on first visit (capturing `current_surface` as the
/// surface to revert to later), bumps the wear level by one, stamps the
/// update time and queues the cell for deferred path conversion.
///
/// Returns the new wear level.
pub fn record_visit(
    store: &mut WearStore,
    pending: &mut PendingEffects,
    pos: CellPos,
    now: WorldHours,
    current_surface: &SurfaceId,
) -> i32 {
    let record = store.get_or_insert_with(pos, || WearRecord::new(now, current_surface.as_str()));
    record.wear_level = record.wear_level.saturating_add(1);
    record.last_update = now;
    let level = record.wear_level;

    let queued = pending.enqueue(pos);

    debug!(cell = %pos, wear = level, queued, at = %now, "Cell visited");
    level
}
