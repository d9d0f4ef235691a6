//! Per-actor components for the trailwear integration.
//!
//! Each player or NPC that should wear paths gets an [`ActorTrail`], which
//! remembers the last cell it stood on so movement only counts once per
//! cell entered.

use std::fmt;

use serde::{Deserialize, Serialize};
use trailwear_core::types::{CellPos, WorldPos};
use uuid::Uuid;

/// Identifier of an actor (player, NPC, creature) in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Movement observer state for one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorTrail {
    /// The actor being observed.
    pub actor: ActorId,
    /// Cell below the actor at the last sample. `None` until the first sample.
    pub last_cell: Option<CellPos>,
    /// Whether this actor wears paths at all. Off for flying creatures.
    pub active: bool,
}

impl ActorTrail {
    /// Start observing `actor`.
    #[must_use]
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            last_cell: None,
            active: true,
        }
    }

    /// Feed a position sample. Returns the cell below the actor if it differs
    /// from the previous sample's.
    pub fn step(&mut self, position: WorldPos) -> Option<CellPos> {
        let cell = cell_below(position);
        if self.last_cell == Some(cell) {
            return None;
        }
        self.last_cell = Some(cell);
        Some(cell)
    }
}

/// The ground cell under an actor standing at `position`.
#[must_use]
pub fn cell_below(position: WorldPos) -> CellPos {
    position.cell().down()
}
