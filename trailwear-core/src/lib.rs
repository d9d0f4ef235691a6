//! # Trailwear Core Library
//!
//! Game-agnostic foot-traffic wear tracking. Cells that actors walk over
//! accumulate wear; heavily worn soil turns into a path, plants standing on
//! worn cells are trampled, and cells nobody uses decay back to the surface
//! they had before.
//!
//! - [`store`] — cell → [`WearRecord`] map
//! - [`accumulator`] — visit recording
//! - [`decay`] — periodic decay / vegetation / reversion sweep
//! - [`pending`] — distance-gated deferred path conversion
//! - [`engine`] — [`WearEngine`], the façade hosts drive
//! - [`persistence`] — blob codecs and blob stores
//! - [`terrain`] — the [`Terrain`] seam onto host block storage
//!
//! ## Lifecycle
//!
//! ```text
//!   visit ──► record_visit ──► wear +1 ──► queued
//!                                            │ actor ≥ 30 units away
//!                                            ▼
//!                               wear ≥ 20 && soil-like ──► worn path
//!
//!   every 5 s ──► sweep ──► stale > 48h: wear −1
//!                       ──► wear ≥ 5: trample plant above
//!                       ──► wear ≤ 0: restore original surface, drop record
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod accumulator;
pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod pending;
pub mod persistence;
pub mod store;
pub mod terrain;
pub mod types;

pub use config::TrailwearConfig;
pub use engine::WearEngine;
pub use error::WearError;
pub use store::{WearRecord, WearStore};
pub use terrain::Terrain;
pub use types::*;
