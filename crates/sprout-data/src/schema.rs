//! Serde data file structs for farm content definitions.
//!
//! These structs define the on-disk format for seeds, upgrades, and farm
//! settings. They are deserialized from RON, JSON, or TOML data files and
//! then resolved into engine types by the loader. Seeds are referenced by
//! key, never by numeric id.

use serde::Deserialize;
use sprout_core::catalog::{Rarity, SeedDef, UpgradeDef, UpgradeEffect};

// ===========================================================================
// Seeds
// ===========================================================================

/// A seed type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedData {
    pub key: String,
    pub name: String,
    pub rarity: Rarity,
    pub cost: u64,
    pub base_sell: u64,
    pub growth_ms: u64,
}

impl From<SeedData> for SeedDef {
    fn from(d: SeedData) -> Self {
        SeedDef {
            key: d.key,
            name: d.name,
            rarity: d.rarity,
            cost: d.cost,
            base_sell: d.base_sell,
            growth_ms: d.growth_ms,
        }
    }
}

// ===========================================================================
// Upgrades
// ===========================================================================

/// An upgrade definition in a data file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpgradeData {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: u64,
    pub cost_multiplier: f64,
    /// `growth_speed`, `sell_value`, or `cosmetic`.
    pub effect: UpgradeEffect,
    #[serde(default)]
    pub effect_per_level: f64,
    pub max_level: u32,
}

impl From<UpgradeData> for UpgradeDef {
    fn from(d: UpgradeData) -> Self {
        UpgradeDef {
            key: d.key,
            name: d.name,
            description: d.description,
            base_cost: d.base_cost,
            cost_multiplier: d.cost_multiplier,
            effect: d.effect,
            effect_per_level: d.effect_per_level,
            max_level: d.max_level,
        }
    }
}

// ===========================================================================
// Farm settings
// ===========================================================================

/// An inclusive range in a data file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeData {
    pub min: u32,
    pub max: u32,
}

/// Farm tuning. Every field is optional; missing fields take the standard
/// values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FarmSettingsData {
    pub grid_size: Option<u32>,
    pub restock_interval_ms: Option<u64>,
    pub rebirth_base_cost: Option<u64>,
    pub starting_coins: Option<u64>,
    /// Seed key granted after a reset.
    pub starter_seed: Option<String>,
    /// Seed keys always present in every restock.
    pub priority_seeds: Option<Vec<String>>,
    pub extra_types: Option<RangeData>,
    pub quantity: Option<RangeData>,
    pub growth_tick_ms: Option<u64>,
    pub restock_check_ms: Option<u64>,
    pub event_capacity: Option<usize>,
}
