//! Configuration for the trailwear system.
//!
//! Maps directly to `trailwear.toml`. Every field has a serde default, so a
//! partial file (or an empty one) yields the stock tuning.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WearError};

/// Top-level trailwear configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailwearConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Wear thresholds and path-conversion tuning.
    #[serde(default)]
    pub wear: WearConfig,
    /// Periodic decay sweep scheduling.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Persistence / save settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl TrailwearConfig {
    /// Load configuration from a TOML string and validate it.
    ///
    /// # Errors
    /// Returns `WearError::Config` if the TOML is invalid or a value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| WearError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    /// Returns `WearError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.wear.validate()?;
        if self.sweep.interval_ms == 0 {
            return Err(WearError::Config("sweep.interval_ms must be > 0".to_string()));
        }
        if self.persistence.namespace.trim().is_empty() {
            return Err(WearError::Config("persistence.namespace must not be empty".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether wear tracking is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

/// Thresholds driving vegetation removal, path conversion and decay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WearConfig {
    /// Wear level at or above which plants standing on the cell die.
    #[serde(default = "default_5")]
    pub plant_kill_threshold: i32,
    /// Wear level at or above which soil-like ground becomes a worn path.
    #[serde(default = "default_20")]
    pub dirt_path_threshold: i32,
    /// Hours without a visit before a record loses one level per sweep.
    #[serde(default = "default_48_0")]
    pub stale_after_hours: f64,
    /// Actor distance (world units) beyond which queued conversions are released.
    #[serde(default = "default_30_0")]
    pub release_distance: f64,
    /// Surface identifier that soil-like ground converts into.
    #[serde(default = "default_worn_path")]
    pub worn_path_surface: String,
    /// Substrings of a surface identifier that mark it as soil-like.
    #[serde(default = "default_soil_keywords")]
    pub soil_keywords: Vec<String>,
}

impl WearConfig {
    /// Squared release distance, compared against squared actor distances.
    #[must_use]
    pub fn release_distance_sq(&self) -> f64 {
        self.release_distance * self.release_distance
    }

    /// Check that the thresholds are usable.
    ///
    /// # Errors
    /// Returns `WearError::Config` naming the first offending field.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        if self.plant_kill_threshold <= 0 {
            return Err(WearError::Config("wear.plant_kill_threshold must be > 0".to_string()));
        }
        if self.dirt_path_threshold <= 0 {
            return Err(WearError::Config("wear.dirt_path_threshold must be > 0".to_string()));
        }
        if !(self.stale_after_hours > 0.0) {
            return Err(WearError::Config("wear.stale_after_hours must be > 0".to_string()));
        }
        if !(self.release_distance >= 0.0) {
            return Err(WearError::Config("wear.release_distance must be >= 0".to_string()));
        }
        if self.worn_path_surface.trim().is_empty() {
            return Err(WearError::Config("wear.worn_path_surface must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            plant_kill_threshold: 5,
            dirt_path_threshold: 20,
            stale_after_hours: 48.0,
            release_distance: 30.0,
            worn_path_surface: default_worn_path(),
            soil_keywords: default_soil_keywords(),
        }
    }
}

/// Decay sweep scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Milliseconds between sweeps.
    #[serde(default = "default_5000")]
    pub interval_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

/// Encoding used for the persisted wear blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlobCodec {
    /// `serde_json` — human readable, the default.
    #[default]
    #[serde(rename = "json")]
    Json,
    /// `rmp-serde` `MessagePack`.
    #[serde(rename = "msgpack")]
    MessagePack,
    /// `bincode` — smallest blobs.
    #[serde(rename = "bincode")]
    Bincode,
}

/// Persistence / save configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Fixed key under which the wear blob is stored in the world save.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Blob encoding.
    #[serde(default)]
    pub codec: BlobCodec,
    /// Detect save corruption via checksums (`SQLite` store).
    #[serde(default = "default_true")]
    pub checksum_enabled: bool,
    /// Use WAL mode for the `SQLite` store.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            codec: BlobCodec::Json,
            checksum_enabled: true,
            wal_mode: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_worn_path() -> String { "grass_path".to_string() }
fn default_namespace() -> String { "trailwear_paths".to_string() }
fn default_soil_keywords() -> Vec<String> {
    vec!["soil".to_string(), "dirt".to_string(), "grass".to_string()]
}
fn default_48_0() -> f64 { 48.0 }
fn default_30_0() -> f64 { 30.0 }
fn default_5() -> i32 { 5 }
fn default_20() -> i32 { 20 }
fn default_5000() -> u64 { 5000 }
