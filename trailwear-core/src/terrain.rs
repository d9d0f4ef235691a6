//! Terrain access — the host-side surface the engine reads and mutates.
//!
//! The engine never owns terrain. Hosts implement [`Terrain`] over their own
//! block/voxel storage; [`InMemoryTerrain`] is a small map-backed
//! implementation for tests, tools and headless hosts.

use std::collections::{HashMap, HashSet};

use crate::types::{CellPos, Material, SurfaceId};

/// Host terrain accessor.
pub trait Terrain {
    /// Current surface type at `pos`.
    fn surface_at(&self, pos: CellPos) -> SurfaceId;

    /// Material classification of a surface type.
    fn material_of(&self, surface: &SurfaceId) -> Material;

    /// Replace the surface at `pos`.
    fn set_surface(&mut self, pos: CellPos, surface: SurfaceId);

    /// Empty the cell at `pos`. Clearing an empty cell is a no-op.
    fn clear_cell(&mut self, pos: CellPos);

    /// Look up a surface type by identifier. `None` if the host does not know it.
    fn resolve_surface(&self, id: &str) -> Option<SurfaceId>;
}

/// Whether `surface` counts as soil-like: classified as [`Material::Soil`],
/// or its identifier contains one of `keywords`.
#[must_use]
pub fn is_soil_like<T: Terrain + ?Sized>(
    terrain: &T,
    surface: &SurfaceId,
    keywords: &[String],
) -> bool {
    if terrain.material_of(surface) == Material::Soil {
        return true;
    }
    let id = surface.as_str();
    keywords.iter().any(|k| !k.is_empty() && id.contains(k.as_str()))
}

// ---------------------------------------------------------------------------
// InMemoryTerrain
// ---------------------------------------------------------------------------

/// Identifier used for empty cells by [`InMemoryTerrain`].
pub const AIR: &str = "air";

/// Map-backed [`Terrain`] with a registry of known surfaces.
///
/// Unset cells read as [`AIR`]. Every `set_surface` / `clear_cell` call is
/// counted so callers can assert on how often terrain actually changed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTerrain {
    cells: HashMap<CellPos, SurfaceId>,
    materials: HashMap<SurfaceId, Material>,
    unresolvable: HashSet<String>,
    /// Number of `set_surface` calls made.
    pub set_calls: usize,
    /// Number of `clear_cell` calls made.
    pub clear_calls: usize,
}

impl InMemoryTerrain {
    /// Empty terrain with the stock surface registry
    /// (`air`, `dirt`, `grass`, `grass_path`, `stone`, `sand`, `flower`, `tall_grass`).
    #[must_use]
    pub fn new() -> Self {
        let mut terrain = Self::default();
        terrain.register(AIR, Material::Air);
        terrain.register("dirt", Material::Soil);
        terrain.register("grass", Material::Soil);
        terrain.register("grass_path", Material::Soil);
        terrain.register("stone", Material::Stone);
        terrain.register("sand", Material::Other);
        terrain.register("flower", Material::Plant);
        terrain.register("tall_grass", Material::Plant);
        terrain
    }

    /// Register (or reclassify) a surface type.
    pub fn register(&mut self, id: &str, material: Material) {
        self.unresolvable.remove(id);
        self.materials.insert(SurfaceId::new(id), material);
    }

    /// Make `id` unknown to [`Terrain::resolve_surface`].
    pub fn forget(&mut self, id: &str) {
        self.materials.remove(&SurfaceId::new(id));
        self.unresolvable.insert(id.to_string());
    }

    /// Place a surface without counting it as an engine mutation.
    pub fn place(&mut self, pos: CellPos, id: &str) {
        self.cells.insert(pos, SurfaceId::new(id));
    }
}

impl Terrain for InMemoryTerrain {
    fn surface_at(&self, pos: CellPos) -> SurfaceId {
        self.cells
            .get(&pos)
            .cloned()
            .unwrap_or_else(|| SurfaceId::new(AIR))
    }

    fn material_of(&self, surface: &SurfaceId) -> Material {
        self.materials.get(surface).copied().unwrap_or(Material::Other)
    }

    fn set_surface(&mut self, pos: CellPos, surface: SurfaceId) {
        self.set_calls += 1;
        self.cells.insert(pos, surface);
    }

    fn clear_cell(&mut self, pos: CellPos) {
        self.clear_calls += 1;
        self.cells.remove(&pos);
    }

    fn resolve_surface(&self, id: &str) -> Option<SurfaceId> {
        if id.is_empty() || self.unresolvable.contains(id) {
            return None;
        }
        let surface = SurfaceId::new(id);
        self.materials.contains_key(&surface).then_some(surface)
    }
}
