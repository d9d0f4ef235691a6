//! The trailwear plugin — one per world.
//!
//! Owns the engine handle, the sweep scheduler and the table of observed
//! actors, and dispatches [`HostEvent`]s to them. The engine sits behind a
//! [`SharedWearEngine`] so hosts whose callbacks may overlap can hand clones
//! of the handle to their own observers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use trailwear_core::config::TrailwearConfig;
use trailwear_core::decay::SweepReport;
use trailwear_core::error::Result;
use trailwear_core::persistence::BlobStore;
use trailwear_core::terrain::Terrain;
use trailwear_core::WearEngine;

use crate::components::{ActorId, ActorTrail};
use crate::events::HostEvent;
use crate::systems::{observe_movement, StepOutcome, SweepScheduler};

/// Engine handle for hosts that cannot guarantee serialized callbacks.
pub type SharedWearEngine = Arc<Mutex<WearEngine>>;

/// Wrap an engine in a shareable handle.
#[must_use]
pub fn share(engine: WearEngine) -> SharedWearEngine {
    Arc::new(Mutex::new(engine))
}

/// Result of dispatching one [`HostEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Tracking is disabled, or the event concerned an unknown actor.
    Ignored,
    /// An actor started being observed.
    ActorTracked,
    /// An actor stopped being observed.
    ActorDropped,
    /// The actor moved within the same cell.
    SameCell,
    /// The actor entered a new cell.
    Stepped(StepOutcome),
    /// Time passed without a sweep becoming due.
    Waiting,
    /// A decay sweep ran.
    Swept(SweepReport),
    /// Wear state was restored; `cells` records are now tracked.
    Loaded { cells: usize },
    /// Wear state was written; `cells` records were saved.
    Saved { cells: usize },
}

/// Glue between a host world and its wear engine.
#[derive(Debug)]
pub struct TrailwearPlugin {
    config: TrailwearConfig,
    engine: SharedWearEngine,
    scheduler: SweepScheduler,
    actors: HashMap<ActorId, ActorTrail>,
}

impl TrailwearPlugin {
    /// Build the plugin and its engine from configuration.
    #[must_use]
    pub fn new(config: TrailwearConfig) -> Self {
        let engine = share(WearEngine::new(config.wear.clone()));
        let scheduler = SweepScheduler::new(config.sweep.interval_ms);
        info!(
            enabled = config.general.enabled,
            interval_ms = config.sweep.interval_ms,
            namespace = %config.persistence.namespace,
            "Trailwear plugin created"
        );
        Self {
            config,
            engine,
            scheduler,
            actors: HashMap::new(),
        }
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &TrailwearConfig {
        &self.config
    }

    /// A clone of the engine handle.
    #[must_use]
    pub fn engine(&self) -> SharedWearEngine {
        Arc::clone(&self.engine)
    }

    /// Observer state for `actor`, if tracked.
    #[must_use]
    pub fn actor(&self, actor: ActorId) -> Option<&ActorTrail> {
        self.actors.get(&actor)
    }

    /// Number of observed actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Dispatch one host event.
    ///
    /// Movement of actors that joined without wearing paths is ignored.
    /// Movement and timer events are ignored while `general.enabled` is
    /// off; save and load always run so the stored state survives.
    ///
    /// # Errors
    ///
    /// Only [`HostEvent::WorldLoaded`] and [`HostEvent::WorldSaving`] can
    /// fail, with the blob store's or codec's error.
    pub fn handle<T, B>(
        &mut self,
        event: HostEvent,
        terrain: &mut T,
        blobs: &mut B,
    ) -> Result<Dispatch>
    where
        T: Terrain + ?Sized,
        B: BlobStore + ?Sized,
    {
        let enabled = self.config.general.enabled;
        let dispatch = match event {
            HostEvent::ActorJoined { actor, wears_paths } => {
                let trail = self
                    .actors
                    .entry(actor)
                    .or_insert_with(|| ActorTrail::new(actor));
                trail.active = wears_paths;
                debug!(%actor, wears_paths, actors = self.actors.len(), "Actor tracked");
                Dispatch::ActorTracked
            }
            HostEvent::ActorLeft { actor } => {
                if self.actors.remove(&actor).is_some() {
                    debug!(%actor, actors = self.actors.len(), "Actor dropped");
                    Dispatch::ActorDropped
                } else {
                    Dispatch::Ignored
                }
            }
            HostEvent::ActorMoved { actor, position, now } => {
                if !enabled {
                    return Ok(Dispatch::Ignored);
                }
                let Some(trail) = self.actors.get_mut(&actor).filter(|t| t.active) else {
                    return Ok(Dispatch::Ignored);
                };
                let mut engine = self.engine.lock();
                match observe_movement(trail, position, now, &mut engine, terrain) {
                    Some(outcome) => Dispatch::Stepped(outcome),
                    None => Dispatch::SameCell,
                }
            }
            HostEvent::TimeElapsed { elapsed_ms, now } => {
                if !enabled {
                    return Ok(Dispatch::Ignored);
                }
                let mut engine = self.engine.lock();
                match self.scheduler.run(elapsed_ms, now, &mut engine, terrain) {
                    Some(report) => Dispatch::Swept(report),
                    None => Dispatch::Waiting,
                }
            }
            HostEvent::WorldLoaded => {
                let mut engine = self.engine.lock();
                engine.load_from(blobs, &self.config.persistence)?;
                for trail in self.actors.values_mut() {
                    trail.last_cell = None;
                }
                Dispatch::Loaded {
                    cells: engine.store().len(),
                }
            }
            HostEvent::WorldSaving => {
                let engine = self.engine.lock();
                engine.save_to(blobs, &self.config.persistence)?;
                Dispatch::Saved {
                    cells: engine.store().len(),
                }
            }
        };
        Ok(dispatch)
    }
}
