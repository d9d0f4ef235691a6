//! The wear store — one [`WearRecord`] per tracked cell.
//!
//! The store is a plain owned map. It is only ever touched from inside
//! [`WearEngine`](crate::engine::WearEngine) callbacks, which the host
//! delivers one at a time, so no interior locking is needed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{CellPos, WorldHours};

/// Accumulated wear on a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearRecord {
    /// Traffic counter. A record is dropped by the sweep once this reaches 0 or below.
    pub wear_level: i32,
    /// World time of the last wear change (visit or decay step).
    pub last_update: WorldHours,
    /// Surface identifier at first visit. Empty means unknown; never overwritten.
    pub original_surface: String,
}

impl WearRecord {
    /// A fresh record at level 0, capturing the surface found on first visit.
    #[must_use]
    pub fn new(now: WorldHours, original_surface: impl Into<String>) -> Self {
        Self {
            wear_level: 0,
            last_update: now,
            original_surface: original_surface.into(),
        }
    }

    /// Whether a surface was captured at first visit.
    #[must_use]
    pub fn has_original_surface(&self) -> bool {
        !self.original_surface.is_empty()
    }

    /// Whether the record is worn out and due for removal.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.wear_level <= 0
    }
}

/// Mapping from cell to wear record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WearStore {
    records: HashMap<CellPos, WearRecord>,
}

impl WearStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record at `pos`, if tracked.
    #[must_use]
    pub fn get(&self, pos: CellPos) -> Option<&WearRecord> {
        self.records.get(&pos)
    }

    /// Mutable record at `pos`, if tracked.
    pub fn get_mut(&mut self, pos: CellPos) -> Option<&mut WearRecord> {
        self.records.get_mut(&pos)
    }

    /// Record at `pos`, creating it with `make` if absent.
    pub fn get_or_insert_with(
        &mut self,
        pos: CellPos,
        make: impl FnOnce() -> WearRecord,
    ) -> &mut WearRecord {
        self.records.entry(pos).or_insert_with(make)
    }

    /// Insert or replace the record at `pos`.
    pub fn insert(&mut self, pos: CellPos, record: WearRecord) -> Option<WearRecord> {
        self.records.insert(pos, record)
    }

    /// Remove the record at `pos`.
    pub fn remove(&mut self, pos: CellPos) -> Option<WearRecord> {
        self.records.remove(&pos)
    }

    /// Whether `pos` is tracked.
    #[must_use]
    pub fn contains(&self, pos: CellPos) -> bool {
        self.records.contains_key(&pos)
    }

    /// Current wear level at `pos`.
    #[must_use]
    pub fn wear_level(&self, pos: CellPos) -> Option<i32> {
        self.records.get(&pos).map(|r| r.wear_level)
    }

    /// Iterate over all records.
    pub fn iter(&self) -> impl Iterator<Item = (&CellPos, &WearRecord)> {
        self.records.iter()
    }

    /// Iterate mutably over all records.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&CellPos, &mut WearRecord)> {
        self.records.iter_mut()
    }

    /// Visit every record; cells for which `visit` returns `true` are removed
    /// once the scan has finished.
    ///
    /// Returns the removed cells.
    pub fn scan_and_prune<F>(&mut self, mut visit: F) -> Vec<CellPos>
    where
        F: FnMut(CellPos, &mut WearRecord) -> bool,
    {
        let mut doomed = Vec::new();
        for (pos, record) in &mut self.records {
            if visit(*pos, record) {
                doomed.push(*pos);
            }
        }
        for pos in &doomed {
            self.records.remove(pos);
        }
        doomed
    }

    /// Replace the whole map (world load).
    pub fn replace(&mut self, records: HashMap<CellPos, WearRecord>) {
        self.records = records;
    }

    /// Copy of every entry (world save). Sorted by position for stable output.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(CellPos, WearRecord)> {
        let mut entries: Vec<_> = self
            .records
            .iter()
            .map(|(pos, record)| (*pos, record.clone()))
            .collect();
        entries.sort_by_key(|(pos, _)| *pos);
        entries
    }

    /// Number of tracked cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl FromIterator<(CellPos, WearRecord)> for WearStore {
    fn from_iter<I: IntoIterator<Item = (CellPos, WearRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
