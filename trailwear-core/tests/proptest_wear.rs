//! Property-Based Tests for Trailwear Core
//!
//! Uses `proptest` to check the wear lifecycle invariants under random
//! visit sequences, sweep timings and store contents.

use proptest::prelude::*;

use trailwear_core::config::{BlobCodec, WearConfig};
use trailwear_core::persistence::{decode_snapshot, encode_snapshot};
use trailwear_core::store::{WearRecord, WearStore};
use trailwear_core::terrain::InMemoryTerrain;
use trailwear_core::types::{CellPos, SurfaceId, WorldHours, WorldPos};
use trailwear_core::WearEngine;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_cell() -> impl Strategy<Value = CellPos> {
    (-64..64i32, 0..128i32, -64..64i32).prop_map(|(x, y, z)| CellPos::new(x, y, z))
}

fn arb_record() -> impl Strategy<Value = WearRecord> {
    (
        -5..500i32,
        0.0..10_000.0f64,
        prop::sample::select(vec!["", "grass", "dirt", "coarse_dirt", "stone"]),
    )
        .prop_map(|(wear_level, hours, surface)| WearRecord {
            wear_level,
            last_update: WorldHours(hours),
            original_surface: surface.to_string(),
        })
}

fn arb_store() -> impl Strategy<Value = WearStore> {
    prop::collection::hash_map(arb_cell(), arb_record(), 0..64)
        .prop_map(|map| map.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Property: N visits with increasing time give wear level N
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn visits_accumulate_monotonically(
        pos in arb_cell(),
        steps in prop::collection::vec(0.001..5.0f64, 1..200),
    ) {
        let mut engine = WearEngine::new(WearConfig::default());
        let mut now = 0.0;
        for (i, step) in steps.iter().enumerate() {
            now += step;
            let level = engine.record_visit(pos, WorldHours(now), &SurfaceId::new("grass"));
            prop_assert_eq!(level, i32::try_from(i + 1).expect("fits"));
        }
        prop_assert_eq!(engine.wear_level(pos), Some(i32::try_from(steps.len()).expect("fits")));
    }
}

// ---------------------------------------------------------------------------
// Property: the first surface seen is the one kept
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn first_surface_is_captured_once(
        pos in arb_cell(),
        surfaces in prop::collection::vec(
            prop::sample::select(vec!["grass", "dirt", "grass_path", "sand"]),
            1..30,
        ),
    ) {
        let mut engine = WearEngine::new(WearConfig::default());
        for (i, surface) in surfaces.iter().enumerate() {
            engine.record_visit(pos, WorldHours(i as f64), &SurfaceId::new(*surface));
        }
        let record = engine.record(pos).expect("record");
        prop_assert_eq!(record.original_surface.as_str(), surfaces[0]);
    }
}

// ---------------------------------------------------------------------------
// Property: a sweep removes at most one level per record
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sweep_decays_at_most_one_level(store in arb_store(), now in 0.0..20_000.0f64) {
        let before = store.clone();
        let mut engine = WearEngine::new(WearConfig::default());
        engine.restore(trailwear_core::persistence::WearSnapshot::capture(&store));
        let mut terrain = InMemoryTerrain::new();

        engine.tick(WorldHours(now), &mut terrain);

        for (pos, old) in before.iter() {
            match engine.record(*pos) {
                Some(new) => {
                    prop_assert!(new.wear_level >= old.wear_level - 1);
                    prop_assert!(new.wear_level > 0);
                    prop_assert_eq!(&new.original_surface, &old.original_surface);
                }
                None => prop_assert!(old.wear_level <= 1),
            }
        }
        prop_assert!(engine.store().iter().all(|(_, r)| r.wear_level > 0));
    }
}

// ---------------------------------------------------------------------------
// Property: back-to-back sweeps never decay twice within the stale window
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn second_sweep_within_window_is_stable(
        store in arb_store(),
        now in 0.0..20_000.0f64,
        gap in 0.0..47.0f64,
    ) {
        let mut engine = WearEngine::new(WearConfig::default());
        engine.restore(trailwear_core::persistence::WearSnapshot::capture(&store));
        let mut terrain = InMemoryTerrain::new();

        engine.tick(WorldHours(now), &mut terrain);
        let after_first = engine.store().clone();
        let report = engine.tick(WorldHours(now + gap), &mut terrain);

        // Records touched by the first sweep carry `now`; everything else was
        // already fresher than the stale window relative to `now`.
        for (pos, record) in after_first.iter() {
            if record.last_update == WorldHours(now) {
                prop_assert_eq!(engine.wear_level(*pos), Some(record.wear_level));
            }
        }
        prop_assert!(report.removed <= after_first.len());
    }
}

// ---------------------------------------------------------------------------
// Property: deferred release never leaves a far cell queued
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn release_clears_every_far_cell(
        cells in prop::collection::hash_set(arb_cell(), 1..40),
        actor in (-200.0..200.0f64, 0.0..128.0f64, -200.0..200.0f64),
    ) {
        let mut engine = WearEngine::new(WearConfig::default());
        let mut terrain = InMemoryTerrain::new();
        for cell in &cells {
            engine.record_visit(*cell, WorldHours(0.0), &SurfaceId::new("grass"));
        }
        let actor = WorldPos::new(actor.0, actor.1, actor.2);

        engine.release_if_far(actor, &mut terrain);

        for cell in &cells {
            let far = cell.distance_sq_to(actor) >= 900.0;
            prop_assert_eq!(engine.pending().contains(*cell), !far);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: persistence round-trips exactly
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn snapshot_round_trips_exactly(
        store in arb_store(),
        codec in prop::sample::select(vec![
            BlobCodec::Json,
            BlobCodec::MessagePack,
            BlobCodec::Bincode,
        ]),
    ) {
        let bytes = encode_snapshot(&store, codec).expect("encode");
        let restored: WearStore = decode_snapshot(&bytes, codec)
            .expect("decode")
            .into_records()
            .into_iter()
            .collect();

        prop_assert_eq!(restored.len(), store.len());
        for (pos, record) in store.iter() {
            let other = restored.get(*pos).expect("present");
            prop_assert_eq!(other.wear_level, record.wear_level);
            prop_assert_eq!(other.last_update.0.to_bits(), record.last_update.0.to_bits());
            prop_assert_eq!(&other.original_surface, &record.original_surface);
        }
    }
}
