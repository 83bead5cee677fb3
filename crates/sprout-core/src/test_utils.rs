//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogBuilder, Rarity, SeedDef, UpgradeDef, UpgradeEffect};
use crate::config::FarmConfig;
use crate::farm::Farm;
use crate::id::{CellId, SeedId, UpgradeId};
use crate::standard;

// ===========================================================================
// Standard content lookups
// ===========================================================================

pub fn wheat(farm: &Farm) -> SeedId {
    seed(farm, standard::WHEAT)
}

pub fn lettuce(farm: &Farm) -> SeedId {
    seed(farm, standard::LETTUCE)
}

pub fn fertilizer(farm: &Farm) -> UpgradeId {
    upgrade(farm, standard::FERTILIZER)
}

pub fn marketing(farm: &Farm) -> UpgradeId {
    upgrade(farm, standard::MARKETING)
}

pub fn seed(farm: &Farm, key: &str) -> SeedId {
    farm.catalog()
        .seed_id(key)
        .unwrap_or_else(|| panic!("seed '{key}' not in catalog"))
}

pub fn upgrade(farm: &Farm, key: &str) -> UpgradeId {
    farm.catalog()
        .upgrade_id(key)
        .unwrap_or_else(|| panic!("upgrade '{key}' not in catalog"))
}

// ===========================================================================
// Farm constructors
// ===========================================================================

/// Standard farm created at t=0.
pub fn standard_farm(seed: u64) -> Farm {
    Farm::standard(seed, 0).expect("standard config is valid")
}

/// Standard farm on an `n`×`n` grid.
pub fn farm_with_grid(seed: u64, n: u32) -> Farm {
    let catalog = Arc::new(Catalog::standard());
    let mut config = FarmConfig::standard(&catalog).expect("standard config is valid");
    config.grid_size = n;
    Farm::new(catalog, config, seed, 0).expect("grid size is valid")
}

/// A tiny two-seed, two-upgrade catalog with round numbers.
///
/// - `fast`: cost 10, sells 20, grows in 1000 ms
/// - `slow`: cost 100, sells 300, grows in 10000 ms
/// - `speed`: +50% growth speed per level, cost 100 × 2^level, max 3
/// - `value`: +100% sell value per level, cost 100 × 2^level, max 3
pub fn tiny_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    b.register_seed(SeedDef {
        key: "fast".into(),
        name: "Fast".into(),
        rarity: Rarity::Common,
        cost: 10,
        base_sell: 20,
        growth_ms: 1_000,
    });
    b.register_seed(SeedDef {
        key: "slow".into(),
        name: "Slow".into(),
        rarity: Rarity::Rare,
        cost: 100,
        base_sell: 300,
        growth_ms: 10_000,
    });
    for (key, effect, per_level) in [
        ("speed", UpgradeEffect::GrowthSpeed, 0.5),
        ("value", UpgradeEffect::SellValue, 1.0),
    ] {
        b.register_upgrade(UpgradeDef {
            key: key.into(),
            name: key.into(),
            description: String::new(),
            base_cost: 100,
            cost_multiplier: 2.0,
            effect,
            effect_per_level: per_level,
            max_level: 3,
        });
    }
    b.build().expect("tiny catalog is valid")
}

/// Farm over [`tiny_catalog`] on a 2×2 grid with 100 starting coins;
/// `fast` is the only priority seed and the starter.
pub fn tiny_farm(seed: u64) -> Farm {
    let catalog = Arc::new(tiny_catalog());
    let mut config = FarmConfig::with_seeds(vec![SeedId(0)], SeedId(0));
    config.grid_size = 2;
    config.starting_coins = 100;
    Farm::new(catalog, config, seed, 0).expect("tiny config is valid")
}

// ===========================================================================
// Scripted play
// ===========================================================================

/// Buy and plant `seed` in every empty cell the balance allows.
/// Returns how many were planted.
pub fn plant_all(farm: &mut Farm, seed: SeedId, now: u64) -> usize {
    let empty: Vec<CellId> = farm
        .grid()
        .cells()
        .iter()
        .filter(|c| c.is_empty())
        .map(|c| c.id)
        .collect();
    let mut planted = 0;
    for cell in empty {
        if farm.owned(seed) == 0 && farm.buy_seed(seed).is_err() {
            break;
        }
        if farm.plant(cell, seed, now).is_ok() {
            planted += 1;
        }
    }
    planted
}

/// Harvest every mature cell. Returns the total payout.
pub fn harvest_all(farm: &mut Farm) -> u64 {
    let mature: Vec<CellId> = farm
        .grid()
        .cells()
        .iter()
        .filter(|c| c.is_mature())
        .map(|c| c.id)
        .collect();
    mature
        .into_iter()
        .filter_map(|cell| farm.harvest(cell).ok())
        .sum()
}
