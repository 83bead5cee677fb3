//! Adversarial input tests for the Sprout farm engine.
//!
//! Tests edge cases that should either return errors or be handled gracefully
//! without panics.

use std::sync::Arc;

use sprout_core::catalog::Catalog;
use sprout_core::config::{ConfigError, FarmConfig};
use sprout_core::error::CommandError;
use sprout_core::farm::Farm;
use sprout_core::id::*;
use sprout_core::test_utils::*;

/// Ids far outside the catalog and grid.
#[test]
fn out_of_range_ids_are_refused() {
    let mut farm = standard_farm(1);
    farm.set_coins(u64::MAX);
    assert_eq!(
        farm.buy_seed(SeedId(u16::MAX)),
        Err(CommandError::UnknownSeed(SeedId(u16::MAX)))
    );
    assert_eq!(
        farm.buy_upgrade(UpgradeId(u16::MAX)),
        Err(CommandError::UnknownUpgrade(UpgradeId(u16::MAX)))
    );
    assert_eq!(
        farm.harvest(CellId(u32::MAX)),
        Err(CommandError::UnknownCell(CellId(u32::MAX)))
    );
    assert_eq!(farm.progress(CellId(u32::MAX), 0), None);
}

/// Coins near u64::MAX saturate instead of wrapping.
#[test]
fn huge_balance_saturates() {
    let mut farm = standard_farm(2);
    let w = wheat(&farm);
    farm.set_owned(w, 1);
    farm.plant(CellId(0), w, 0).unwrap();
    farm.growth_tick(2_000);
    farm.set_coins(u64::MAX - 1);
    farm.harvest(CellId(0)).unwrap();
    assert_eq!(farm.coins(), u64::MAX);
}

/// Rebirth with an enormous balance.
#[test]
fn huge_rebirth_does_not_overflow() {
    let mut farm = standard_farm(3);
    farm.set_coins(u64::MAX);
    let outcome = farm.rebirth().unwrap();
    assert_eq!(outcome.gained, u64::MAX / 50);
    assert_eq!(farm.multiplier(), 1 + u64::MAX / 50);
    assert_eq!(farm.rebirth_cost(), 50 + u64::MAX / 100);
}

/// Clock readings earlier than the planting time.
#[test]
fn clock_going_backwards() {
    let mut farm = standard_farm(4);
    let w = wheat(&farm);
    farm.set_owned(w, 1);
    farm.plant(CellId(0), w, 10_000).unwrap();
    assert!(farm.growth_tick(0).is_empty());
    assert_eq!(farm.progress(CellId(0), 0), Some(0.0));
    assert_eq!(farm.seconds_until_restock(u64::MAX), 0);
    // Restock deadline never overflows.
    farm.restock(u64::MAX);
    assert_eq!(farm.next_restock_at(), u64::MAX);
}

/// Buying every level of every upgrade never exceeds the cap.
#[test]
fn max_out_every_upgrade() {
    let mut farm = standard_farm(5);
    let ids: Vec<UpgradeId> = farm.catalog().upgrades().map(|(id, _)| id).collect();
    for id in ids {
        loop {
            farm.set_coins(u64::MAX);
            match farm.buy_upgrade(id) {
                Ok(_) => {}
                Err(CommandError::UpgradeAtMaxLevel(_)) => break,
                Err(e) => panic!("unexpected {e}"),
            }
        }
        let max = farm.catalog().upgrade(id).unwrap().max_level;
        assert_eq!(farm.level(id), max);
        assert_eq!(farm.upgrade_cost(id), None);
    }
    // 1 + 10 × 0.1 and 1 + 20 × 0.2
    assert!((farm.growth_speed_multiplier() - 2.0).abs() < 1e-9);
    assert!((farm.sell_value_multiplier() - 5.0).abs() < 1e-9);
}

/// A one-cell grid works end to end.
#[test]
fn single_cell_grid() {
    let mut farm = farm_with_grid(6, 1);
    let w = wheat(&farm);
    farm.set_owned(w, 2);
    farm.plant(CellId(0), w, 0).unwrap();
    assert_eq!(farm.plant(CellId(1), w, 0), Err(CommandError::UnknownCell(CellId(1))));
    assert_eq!(farm.snapshot(0).cells.len(), 1);
}

/// Configurations the engine cannot run are rejected up front.
#[test]
fn bad_configs_rejected() {
    let catalog = Arc::new(Catalog::standard());
    let base = FarmConfig::standard(&catalog).unwrap();

    let mut c = base.clone();
    c.grid_size = 0;
    assert_eq!(
        Farm::new(Arc::clone(&catalog), c, 0, 0).unwrap_err(),
        ConfigError::EmptyGrid
    );

    let mut c = base.clone();
    c.restock.priority_seeds.push(SeedId(500));
    assert_eq!(
        Farm::new(Arc::clone(&catalog), c, 0, 0).unwrap_err(),
        ConfigError::UnknownSeed(500)
    );

    let mut c = base;
    c.growth_tick_ms = 0;
    assert!(matches!(
        Farm::new(catalog, c, 0, 0),
        Err(ConfigError::ZeroInterval(_))
    ));
}

/// Many restocks in a row with a small catalog.
#[test]
fn repeated_restocks_with_tiny_catalog() {
    let mut farm = tiny_farm(7);
    for i in 0..1_000 {
        farm.restock(i);
        assert!(farm.stock(SeedId(0)) >= 10);
    }
}

/// Event buffer overflow keeps the newest events.
#[test]
fn event_buffer_overflow() {
    let mut farm = standard_farm(8);
    for i in 0..1_000 {
        farm.restock(i);
    }
    let buffer = farm.event_buffer();
    assert_eq!(buffer.len(), buffer.capacity());
    assert_eq!(buffer.total_written(), 1_000);
    assert!(buffer.dropped_count() > 0);
}
