//! Integration hooks for the host's callback surface.
//!
//! These turn the host's join / movement / timer / save callbacks into
//! [`HostEvent`]s. A host wires each of its callbacks to one of these and
//! forwards the result to the plugin.

use trailwear_core::types::{WorldHours, WorldPos};

use crate::components::ActorId;
use crate::events::HostEvent;

/// An actor that walks on the ground joined the world.
#[must_use]
pub fn on_actor_join(actor: ActorId) -> HostEvent {
    HostEvent::ActorJoined {
        actor,
        wears_paths: true,
    }
}

/// An actor that never touches the ground (flying, swimming) joined the world.
#[must_use]
pub fn on_passive_actor_join(actor: ActorId) -> HostEvent {
    HostEvent::ActorJoined {
        actor,
        wears_paths: false,
    }
}

/// An actor left the world.
#[must_use]
pub fn on_actor_leave(actor: ActorId) -> HostEvent {
    HostEvent::ActorLeft { actor }
}

/// The host sampled an actor's position (typically once per host tick).
#[must_use]
pub fn on_actor_move(actor: ActorId, position: WorldPos, now: WorldHours) -> HostEvent {
    HostEvent::ActorMoved { actor, position, now }
}

/// The host scheduler advanced by `elapsed_ms`.
#[must_use]
pub fn on_time_elapsed(elapsed_ms: u64, now: WorldHours) -> HostEvent {
    HostEvent::TimeElapsed { elapsed_ms, now }
}

/// The world finished loading.
#[must_use]
pub fn on_world_load() -> HostEvent {
    HostEvent::WorldLoaded
}

/// The world is about to be saved.
#[must_use]
pub fn on_world_save() -> HostEvent {
    HostEvent::WorldSaving
}
