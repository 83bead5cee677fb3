//! Static farm tuning, loaded once before a [`crate::farm::Farm`] is built.

use crate::catalog::Catalog;
use crate::id::SeedId;
use crate::standard;

pub const DEFAULT_GRID_SIZE: u32 = 12;
pub const DEFAULT_RESTOCK_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_REBIRTH_BASE_COST: u64 = 50;
pub const DEFAULT_STARTING_COINS: u64 = 20;
pub const DEFAULT_GROWTH_TICK_MS: u64 = 200;
pub const DEFAULT_RESTOCK_CHECK_MS: u64 = 1_000;
pub const DEFAULT_EVENT_CAPACITY: usize = 256;
/// Largest grid accepted: 1024×1024 cells.
pub const MAX_CELLS: u64 = 1024 * 1024;

/// An inclusive `[min, max]` range of whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: u32) -> bool {
        (self.min..=self.max).contains(&v)
    }
}

/// Restock allocation rule.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RestockRule {
    /// Seeds that are always stocked so progress is never blocked.
    pub priority_seeds: Vec<SeedId>,
    /// How many additional seed types are drawn per restock.
    pub extra_types: Bounds,
    /// Quantity range for every stocked type.
    pub quantity: Bounds,
}

/// Farm-wide tuning constants.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FarmConfig {
    /// Side length of the square grid.
    pub grid_size: u32,
    pub restock_interval_ms: u64,
    /// Rebirth threshold before any rebirth has happened.
    pub rebirth_base_cost: u64,
    pub starting_coins: u64,
    /// Granted (one unit) after rebirth and free reset.
    pub starter_seed: SeedId,
    pub restock: RestockRule,
    /// Cadence of the growth evaluation tick.
    pub growth_tick_ms: u64,
    /// Cadence of the restock deadline check.
    pub restock_check_ms: u64,
    /// Ring buffer capacity for recorded events.
    pub event_capacity: usize,
}

/// Errors raised while validating a [`FarmConfig`] against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("grid size {0} exceeds {max} cells", max = MAX_CELLS)]
    GridTooLarge(u32),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("rebirth base cost must be greater than zero")]
    ZeroRebirthCost,
    #[error("{name} range [{min}, {max}] is inverted")]
    InvertedRange {
        name: &'static str,
        min: u32,
        max: u32,
    },
    #[error("seed key '{0}' is not in the catalog")]
    UnknownSeedKey(String),
    #[error("seed id {0} is not in the catalog")]
    UnknownSeed(u16),
    #[error("priority seed {0} is listed twice")]
    DuplicatePrioritySeed(u16),
}

impl FarmConfig {
    /// Standard tuning: 12×12 grid, one-minute restocks, wheat and lettuce
    /// always stocked, wheat granted after a reset.
    pub fn standard(catalog: &Catalog) -> Result<Self, ConfigError> {
        let lookup = |key: &str| {
            catalog
                .seed_id(key)
                .ok_or_else(|| ConfigError::UnknownSeedKey(key.to_string()))
        };
        let wheat = lookup(standard::WHEAT)?;
        let lettuce = lookup(standard::LETTUCE)?;
        Ok(Self::with_seeds(vec![wheat, lettuce], wheat))
    }

    /// Default tuning with caller-chosen priority and starter seeds.
    pub fn with_seeds(priority_seeds: Vec<SeedId>, starter_seed: SeedId) -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            restock_interval_ms: DEFAULT_RESTOCK_INTERVAL_MS,
            rebirth_base_cost: DEFAULT_REBIRTH_BASE_COST,
            starting_coins: DEFAULT_STARTING_COINS,
            starter_seed,
            restock: RestockRule {
                priority_seeds,
                extra_types: Bounds::new(4, 7),
                quantity: Bounds::new(10, 30),
            },
            growth_tick_ms: DEFAULT_GROWTH_TICK_MS,
            restock_check_ms: DEFAULT_RESTOCK_CHECK_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }

    /// Check every constraint the engine relies on.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if u64::from(self.grid_size).pow(2) > MAX_CELLS {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.restock_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("restock interval"));
        }
        if self.growth_tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("growth tick"));
        }
        if self.restock_check_ms == 0 {
            return Err(ConfigError::ZeroInterval("restock check"));
        }
        if self.rebirth_base_cost == 0 {
            return Err(ConfigError::ZeroRebirthCost);
        }
        for (name, b) in [
            ("extra types", self.restock.extra_types),
            ("quantity", self.restock.quantity),
        ] {
            if b.min > b.max {
                return Err(ConfigError::InvertedRange {
                    name,
                    min: b.min,
                    max: b.max,
                });
            }
        }

        let known = |id: SeedId| catalog.seed(id).is_some();
        if !known(self.starter_seed) {
            return Err(ConfigError::UnknownSeed(self.starter_seed.0));
        }
        for (i, &id) in self.restock.priority_seeds.iter().enumerate() {
            if !known(id) {
                return Err(ConfigError::UnknownSeed(id.0));
            }
            if self.restock.priority_seeds[..i].contains(&id) {
                return Err(ConfigError::DuplicatePrioritySeed(id.0));
            }
        }
        Ok(())
    }
}
