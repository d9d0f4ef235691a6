//! Host events that drive the wear engine.
//!
//! The host delivers these one at a time; see
//! [`TrailwearPlugin::handle`](crate::plugin::TrailwearPlugin::handle).

use trailwear_core::types::{WorldHours, WorldPos};

use crate::components::ActorId;

/// A host callback, translated into trailwear terms.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// An actor joined the world. Actors with `wears_paths` off (flying or
    /// swimming creatures) are tracked but never record visits.
    ActorJoined {
        actor: ActorId,
        wears_paths: bool,
    },

    /// An actor left the world.
    ActorLeft {
        actor: ActorId,
    },

    /// An actor's position was sampled.
    ActorMoved {
        actor: ActorId,
        position: WorldPos,
        now: WorldHours,
    },

    /// Real time passed on the host scheduler.
    TimeElapsed {
        elapsed_ms: u64,
        now: WorldHours,
    },

    /// The world finished loading; wear state should be restored.
    WorldLoaded,

    /// The world is about to be saved; wear state should be written.
    WorldSaving,
}

impl HostEvent {
    /// The actor this event concerns, if any.
    #[must_use]
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Self::ActorJoined { actor, .. }
            | Self::ActorLeft { actor }
            | Self::ActorMoved { actor, .. } => Some(*actor),
            Self::TimeElapsed { .. } | Self::WorldLoaded | Self::WorldSaving => None,
        }
    }

    /// World time carried by this event, if any.
    #[must_use]
    pub fn now(&self) -> Option<WorldHours> {
        match self {
            Self::ActorMoved { now, .. } | Self::TimeElapsed { now, .. } => Some(*now),
            _ => None,
        }
    }

    /// Whether this event is part of the world save/load lifecycle.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::WorldLoaded | Self::WorldSaving)
    }
}
