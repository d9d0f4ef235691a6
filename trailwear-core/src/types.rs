//! Core type definitions for the trailwear engine.
//!
//! All persisted types are serializable; positions are small `Copy` values
//! so they can be used freely as map and set keys.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// A discrete, integer-addressed cell in the world grid. `y` is vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (up).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl CellPos {
    /// Create a cell position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell directly above this one, or `None` at the top of the world.
    #[must_use]
    pub const fn up(self) -> Option<Self> {
        match self.y.checked_add(1) {
            Some(y) => Some(Self { y, ..self }),
            None => None,
        }
    }

    /// The cell directly below this one.
    #[must_use]
    pub const fn down(self) -> Self {
        Self {
            y: self.y.saturating_sub(1),
            ..self
        }
    }

    /// Squared Euclidean distance from this cell's coordinates to a world position.
    #[must_use]
    pub fn distance_sq_to(self, pos: WorldPos) -> f64 {
        let dx = f64::from(self.x) - pos.x;
        let dy = f64::from(self.y) - pos.y;
        let dz = f64::from(self.z) - pos.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A continuous position in the world (actor positions).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate (up).
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl WorldPos {
    /// Create a world position.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The cell containing this position (coordinates floored).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell(self) -> CellPos {
        CellPos {
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
            z: self.z.floor() as i32,
        }
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// World-clock time in hours, as reported by the host. Monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldHours(pub f64);

impl WorldHours {
    /// Hours elapsed since `earlier`. Negative if the clock went backwards.
    #[must_use]
    pub fn since(self, earlier: Self) -> f64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for WorldHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}h", self.0)
    }
}

// ---------------------------------------------------------------------------
// Surfaces
// ---------------------------------------------------------------------------

/// Host-side identifier of a terrain surface type (e.g. `"grass"`, `"grass_path"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub String);

impl SurfaceId {
    /// Create a surface identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Coarse material classification of a surface, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Nothing there.
    Air,
    /// Dirt, grass and similar diggable ground.
    Soil,
    /// Standing vegetation (flowers, tall grass, saplings).
    Plant,
    /// Rock and other hard ground.
    Stone,
    /// Anything else.
    Other,
}
