//! Integration Tests — End-to-End Wear Flows
//!
//! These tests drive the public [`WearEngine`] API the way a host would:
//! visits, deferred releases, periodic sweeps and save/load round-trips.

use trailwear_core::config::{BlobCodec, PersistenceConfig, WearConfig};
use trailwear_core::persistence::{BlobStore, MemoryBlobStore, SqliteBlobStore};
use trailwear_core::terrain::{InMemoryTerrain, Terrain};
use trailwear_core::types::{CellPos, Material, SurfaceId, WorldHours, WorldPos};
use trailwear_core::WearEngine;

fn engine() -> WearEngine {
    WearEngine::new(WearConfig::default())
}

fn h(hours: f64) -> WorldHours {
    WorldHours(hours)
}

fn visit(engine: &mut WearEngine, terrain: &InMemoryTerrain, pos: CellPos, hours: f64) -> i32 {
    let surface = terrain.surface_at(pos);
    engine.record_visit(pos, h(hours), &surface)
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

#[test]
fn repeated_visits_accumulate() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(10, 63, 10);
    terrain.place(pos, "grass");

    for i in 0..12 {
        visit(&mut engine, &terrain, pos, f64::from(i) * 0.1);
    }

    assert_eq!(engine.wear_level(pos), Some(12));
    assert_eq!(engine.record(pos).map(|r| r.original_surface.as_str()), Some("grass"));
}

#[test]
fn original_surface_survives_conversion() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(0, 63, 0);
    terrain.place(pos, "grass");

    for i in 0..20 {
        visit(&mut engine, &terrain, pos, f64::from(i));
    }
    engine.release_if_far(WorldPos::new(40.0, 64.0, 0.0), &mut terrain);
    assert_eq!(terrain.surface_at(pos).as_str(), "grass_path");

    // Walking on the path afterwards must not recapture it as the original.
    visit(&mut engine, &terrain, pos, 21.0);
    assert_eq!(engine.record(pos).map(|r| r.original_surface.as_str()), Some("grass"));
}

// ---------------------------------------------------------------------------
// Decay throttling
// ---------------------------------------------------------------------------

#[test]
fn decay_throttling_timeline() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(0, 63, 0);
    terrain.place(pos, "grass");

    let t0 = 10.0;
    for _ in 0..3 {
        visit(&mut engine, &terrain, pos, t0);
    }

    engine.tick(h(t0 + 47.0), &mut terrain);
    assert_eq!(engine.wear_level(pos), Some(3));

    engine.tick(h(t0 + 49.0), &mut terrain);
    assert_eq!(engine.wear_level(pos), Some(2));
    assert_eq!(engine.record(pos).map(|r| r.last_update), Some(h(t0 + 49.0)));

    engine.tick(h(t0 + 49.5), &mut terrain);
    assert_eq!(engine.wear_level(pos), Some(2));
}

// ---------------------------------------------------------------------------
// Removal + reversion
// ---------------------------------------------------------------------------

#[test]
fn worn_out_cell_reverts_to_original() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    terrain.register("soil-a", Material::Soil);
    let pos = CellPos::new(5, 63, 5);
    terrain.place(pos, "soil-a");

    engine.record_visit(pos, h(0.0), &SurfaceId::new("soil-a"));
    terrain.place(pos, "grass_path");

    let report = engine.tick(h(49.0), &mut terrain);

    assert_eq!(report.decayed, 1);
    assert_eq!(report.reverted, 1);
    assert_eq!(terrain.surface_at(pos).as_str(), "soil-a");
    assert!(engine.record(pos).is_none());
}

#[test]
fn path_grows_back_after_long_disuse() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(0, 63, 0);
    terrain.place(pos, "dirt");

    for i in 0..25 {
        visit(&mut engine, &terrain, pos, f64::from(i) * 0.01);
    }
    engine.release_if_far(WorldPos::new(0.0, 64.0, 31.0), &mut terrain);
    assert_eq!(terrain.surface_at(pos).as_str(), "grass_path");

    // One level drips off per stale window.
    let mut now = 0.24;
    for _ in 0..25 {
        now += 48.5;
        engine.tick(h(now), &mut terrain);
    }

    assert!(engine.record(pos).is_none());
    assert_eq!(terrain.surface_at(pos).as_str(), "dirt");
    assert_eq!(engine.stats().paths_reverted, 1);
}

// ---------------------------------------------------------------------------
// Deferred conversion gating
// ---------------------------------------------------------------------------

#[test]
fn conversion_waits_until_actor_is_far() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(0, 63, 0);
    terrain.place(pos, "grass");

    for i in 0..20 {
        visit(&mut engine, &terrain, pos, f64::from(i) * 0.01);
    }
    assert_eq!(engine.wear_level(pos), Some(20));

    let near = engine.release_if_far(WorldPos::new(10.0, 63.0, 0.0), &mut terrain);
    assert_eq!(near.released, 0);
    assert_eq!(terrain.surface_at(pos).as_str(), "grass");
    assert!(engine.pending().contains(pos));

    let far = engine.release_if_far(WorldPos::new(35.0, 63.0, 0.0), &mut terrain);
    assert_eq!(far.converted, 1);
    assert_eq!(terrain.surface_at(pos).as_str(), "grass_path");
    assert_eq!(terrain.set_calls, 1);
    assert!(!engine.pending().contains(pos));

    // Nothing left to release.
    let again = engine.release_if_far(WorldPos::new(35.0, 63.0, 0.0), &mut terrain);
    assert_eq!(again.released, 0);
    assert_eq!(terrain.set_calls, 1);
}

#[test]
fn any_distant_actor_releases_queued_cells() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let a = CellPos::new(0, 63, 0);
    let b = CellPos::new(100, 63, 0);
    terrain.place(a, "grass");
    terrain.place(b, "grass");

    visit(&mut engine, &terrain, a, 0.0);
    visit(&mut engine, &terrain, b, 0.0);

    // An actor standing at `b` releases `a` only.
    let report = engine.release_if_far(WorldPos::new(100.0, 64.0, 0.0), &mut terrain);
    assert_eq!(report.released, 1);
    assert!(!engine.pending().contains(a));
    assert!(engine.pending().contains(b));
}

#[test]
fn below_threshold_release_still_dequeues() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(0, 63, 0);
    terrain.place(pos, "grass");

    visit(&mut engine, &terrain, pos, 0.0);
    let report = engine.release_if_far(WorldPos::new(0.0, 63.0, 40.0), &mut terrain);

    assert_eq!(report.released, 1);
    assert_eq!(report.converted, 0);
    assert!(engine.pending().is_empty());
    assert_eq!(engine.wear_level(pos), Some(1));

    // The next visit queues it again.
    visit(&mut engine, &terrain, pos, 1.0);
    assert!(engine.pending().contains(pos));
}

#[test]
fn record_removed_before_release_skips_conversion() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(0, 63, 0);
    terrain.place(pos, "grass");

    visit(&mut engine, &terrain, pos, 0.0);
    engine.tick(h(100.0), &mut terrain);
    assert!(engine.record(pos).is_none());
    let sets_after_revert = terrain.set_calls;

    let report = engine.release_if_far(WorldPos::new(50.0, 63.0, 0.0), &mut terrain);
    assert_eq!(report.vanished, 1);
    assert!(engine.pending().is_empty());
    assert_eq!(terrain.set_calls, sets_after_revert);
}

// ---------------------------------------------------------------------------
// Vegetation removal
// ---------------------------------------------------------------------------

#[test]
fn vegetation_removal_is_idempotent() {
    let mut engine = engine();
    let mut terrain = InMemoryTerrain::new();
    let pos = CellPos::new(0, 63, 0);
    let above = CellPos::new(0, 64, 0);
    terrain.place(pos, "grass");
    terrain.place(above, "flower");

    for i in 0..6 {
        visit(&mut engine, &terrain, pos, f64::from(i) * 0.1);
    }

    let first = engine.tick(h(1.0), &mut terrain);
    assert_eq!(first.plants_cleared, 1);
    assert_eq!(terrain.material_of(&terrain.surface_at(above)), Material::Air);

    let second = engine.tick(h(1.1), &mut terrain);
    assert_eq!(second.plants_cleared, 0);
    assert_eq!(terrain.material_of(&terrain.surface_at(above)), Material::Air);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn save_load_round_trip_through_sqlite() {
    let config = PersistenceConfig {
        codec: BlobCodec::MessagePack,
        ..PersistenceConfig::default()
    };
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("world_wear.db");

    let mut engine = engine();
    let terrain = InMemoryTerrain::new();
    for i in 0..50 {
        let pos = CellPos::new(i % 7, 63, i / 7);
        visit(&mut engine, &terrain, pos, f64::from(i) * 0.37);
    }

    {
        let mut blobs = SqliteBlobStore::open(&db_path, &config).expect("open");
        engine.save_to(&mut blobs, &config).expect("save");
    }

    let blobs = SqliteBlobStore::open(&db_path, &config).expect("reopen");
    let mut restored = WearEngine::new(WearConfig::default());
    restored.load_from(&blobs, &config).expect("load");

    assert_eq!(restored.store(), engine.store());
    assert_eq!(restored.store().len(), 50);
}

#[test]
fn namespaces_are_isolated() {
    let mut blobs = MemoryBlobStore::new();
    blobs.write_blob("other_mod", b"not ours").expect("write");

    let mut engine = engine();
    engine
        .load_from(&blobs, &PersistenceConfig::default())
        .expect("load");
    assert!(engine.store().is_empty());
}
