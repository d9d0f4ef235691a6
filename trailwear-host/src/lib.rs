//! # trailwear-host — Host Integration for Trailwear
//!
//! This crate is the thin layer between a game host (its callback
//! scheduler, actor list, save system and block storage) and the
//! game-agnostic `trailwear-core` engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │                Host world                │
//! │  join / move / timer / save callbacks    │
//! │  ┌───────────────────────────────────┐  │
//! │  │        trailwear-host             │  │
//! │  │  ┌─────────────┐ ┌─────────────┐ │  │
//! │  │  │   Hooks     │ │   Plugin    │ │  │
//! │  │  └──────┬──────┘ └──────┬──────┘ │  │
//! │  │         │  HostEvent    │         │  │
//! │  │         ▼               ▼         │  │
//! │  │  ┌─────────────┐ ┌─────────────┐ │  │
//! │  │  │ ActorTrail  │ │  Scheduler  │ │  │
//! │  │  └──────┬──────┘ └──────┬──────┘ │  │
//! │  │         ▼               ▼         │  │
//! │  │    ┌─────────────────────────┐    │  │
//! │  │    │     trailwear-core      │    │  │
//! │  │    └─────────────────────────┘    │  │
//! │  └───────────────────────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `components` — per-actor observer state (`ActorTrail`)
//! - `events` — host callbacks as `HostEvent`s
//! - `hooks` — constructors the host wires its callbacks to
//! - `systems` — movement observer step and the sweep scheduler
//! - `plugin` — event dispatch and the shared engine handle
//! - `logging` — `tracing-subscriber` setup

pub mod components;
pub mod events;
pub mod hooks;
pub mod logging;
pub mod plugin;
pub mod systems;

pub use components::{ActorId, ActorTrail};
pub use events::HostEvent;
pub use plugin::{Dispatch, SharedWearEngine, TrailwearPlugin};
