use crate::id::{SeedId, UpgradeId};
use std::collections::HashMap;

/// Rarity tier of a seed. Ordered from most to least common.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// A seed type definition in the catalog.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeedDef {
    /// Unique lookup key, e.g. `"wheat"`.
    pub key: String,
    /// Display name.
    pub name: String,
    pub rarity: Rarity,
    /// Shop purchase price.
    pub cost: u64,
    /// Harvest value before multipliers.
    pub base_sell: u64,
    /// Time from planting to maturity with no speed bonus, in milliseconds.
    pub growth_ms: u64,
}

/// What an upgrade level contributes to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Divides effective growth duration.
    GrowthSpeed,
    /// Multiplies harvest payouts.
    SellValue,
    /// Purchasable, but has no numeric influence.
    Cosmetic,
}

/// An upgrade definition in the catalog.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UpgradeDef {
    pub key: String,
    pub name: String,
    pub description: String,
    /// Price of the first level.
    pub base_cost: u64,
    /// Geometric growth factor applied per owned level. Must exceed 1.
    pub cost_multiplier: f64,
    pub effect: UpgradeEffect,
    /// Bonus added per level, e.g. `0.10` for +10 %.
    pub effect_per_level: f64,
    pub max_level: u32,
}

impl UpgradeDef {
    /// Cost of buying the level after `level`: `floor(base * multiplier^level)`.
    /// `None` once `level` has reached the cap.
    pub fn cost_at(&self, level: u32) -> Option<u64> {
        if level >= self.max_level {
            return None;
        }
        let exponent = i32::try_from(level).unwrap_or(i32::MAX);
        let raw = self.base_cost as f64 * self.cost_multiplier.powi(exponent);
        // `as` saturates for values beyond u64::MAX.
        Some(raw.floor() as u64)
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no seeds")]
    NoSeeds,
    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
    #[error("seed '{0}' has a zero growth duration")]
    ZeroGrowthDuration(String),
    #[error("upgrade '{key}' cost multiplier {multiplier} must be finite and greater than 1")]
    InvalidCostMultiplier { key: String, multiplier: f64 },
    #[error("upgrade '{key}' effect {effect} must be finite and non-negative")]
    InvalidEffect { key: String, effect: f64 },
    #[error("'{0}' not found")]
    NotFound(String),
}

/// Builder for constructing an immutable [`Catalog`].
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    seeds: Vec<SeedDef>,
    upgrades: Vec<UpgradeDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register a seed type. Returns its ID.
    pub fn register_seed(&mut self, def: SeedDef) -> SeedId {
        let id = SeedId(self.seeds.len() as u16);
        self.seeds.push(def);
        id
    }

    /// Phase 1: Register an upgrade. Returns its ID.
    pub fn register_upgrade(&mut self, def: UpgradeDef) -> UpgradeId {
        let id = UpgradeId(self.upgrades.len() as u16);
        self.upgrades.push(def);
        id
    }

    /// Phase 2: Mutate an already-registered seed by key.
    pub fn mutate_seed<F>(&mut self, key: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut SeedDef),
    {
        let def = self
            .seeds
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))?;
        f(def);
        Ok(())
    }

    /// Phase 2: Mutate an already-registered upgrade by key.
    pub fn mutate_upgrade<F>(&mut self, key: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut UpgradeDef),
    {
        let def = self
            .upgrades
            .iter_mut()
            .find(|u| u.key == key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))?;
        f(def);
        Ok(())
    }

    /// Phase 3: Validate and freeze.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.seeds.is_empty() {
            return Err(CatalogError::NoSeeds);
        }

        let mut seed_key_to_id = HashMap::new();
        for (i, seed) in self.seeds.iter().enumerate() {
            if seed.growth_ms == 0 {
                return Err(CatalogError::ZeroGrowthDuration(seed.key.clone()));
            }
            if seed_key_to_id
                .insert(seed.key.clone(), SeedId(i as u16))
                .is_some()
            {
                return Err(CatalogError::DuplicateKey(seed.key.clone()));
            }
        }

        let mut upgrade_key_to_id = HashMap::new();
        for (i, upgrade) in self.upgrades.iter().enumerate() {
            if !upgrade.cost_multiplier.is_finite() || upgrade.cost_multiplier <= 1.0 {
                return Err(CatalogError::InvalidCostMultiplier {
                    key: upgrade.key.clone(),
                    multiplier: upgrade.cost_multiplier,
                });
            }
            if !upgrade.effect_per_level.is_finite() || upgrade.effect_per_level < 0.0 {
                return Err(CatalogError::InvalidEffect {
                    key: upgrade.key.clone(),
                    effect: upgrade.effect_per_level,
                });
            }
            if upgrade_key_to_id
                .insert(upgrade.key.clone(), UpgradeId(i as u16))
                .is_some()
            {
                return Err(CatalogError::DuplicateKey(upgrade.key.clone()));
            }
        }

        Ok(Catalog {
            seeds: self.seeds,
            seed_key_to_id,
            upgrades: self.upgrades,
            upgrade_key_to_id,
        })
    }
}

/// Immutable catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    seeds: Vec<SeedDef>,
    seed_key_to_id: HashMap<String, SeedId>,
    upgrades: Vec<UpgradeDef>,
    upgrade_key_to_id: HashMap<String, UpgradeId>,
}

impl Catalog {
    pub fn seed(&self, id: SeedId) -> Option<&SeedDef> {
        self.seeds.get(id.index())
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.get(id.index())
    }

    pub fn seed_id(&self, key: &str) -> Option<SeedId> {
        self.seed_key_to_id.get(key).copied()
    }

    pub fn upgrade_id(&self, key: &str) -> Option<UpgradeId> {
        self.upgrade_key_to_id.get(key).copied()
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    pub fn upgrade_count(&self) -> usize {
        self.upgrades.len()
    }

    /// All seeds in registration order.
    pub fn seeds(&self) -> impl Iterator<Item = (SeedId, &SeedDef)> {
        self.seeds
            .iter()
            .enumerate()
            .map(|(i, def)| (SeedId(i as u16), def))
    }

    /// All upgrades in registration order.
    pub fn upgrades(&self) -> impl Iterator<Item = (UpgradeId, &UpgradeDef)> {
        self.upgrades
            .iter()
            .enumerate()
            .map(|(i, def)| (UpgradeId(i as u16), def))
    }

    /// Seeds of the lowest rarity tier present, in registration order.
    pub fn lowest_tier_seeds(&self) -> Vec<SeedId> {
        let Some(lowest) = self.seeds.iter().map(|s| s.rarity).min() else {
            return Vec::new();
        };
        self.seeds()
            .filter(|(_, s)| s.rarity == lowest)
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(key: &str, rarity: Rarity, growth_ms: u64) -> SeedDef {
        SeedDef {
            key: key.to_string(),
            name: key.to_uppercase(),
            rarity,
            cost: 5,
            base_sell: 7,
            growth_ms,
        }
    }

    fn upgrade(key: &str, multiplier: f64) -> UpgradeDef {
        UpgradeDef {
            key: key.to_string(),
            name: key.to_string(),
            description: String::new(),
            base_cost: 200,
            cost_multiplier: multiplier,
            effect: UpgradeEffect::GrowthSpeed,
            effect_per_level: 0.1,
            max_level: 3,
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut b = CatalogBuilder::new();
        let wheat = b.register_seed(seed("wheat", Rarity::Common, 2000));
        let fert = b.register_upgrade(upgrade("fertilizer", 2.5));
        let catalog = b.build().unwrap();

        assert_eq!(catalog.seed_id("wheat"), Some(wheat));
        assert_eq!(catalog.upgrade_id("fertilizer"), Some(fert));
        assert_eq!(catalog.seed(wheat).unwrap().growth_ms, 2000);
        assert_eq!(catalog.seed_count(), 1);
        assert_eq!(catalog.upgrade_count(), 1);
        assert!(catalog.seed_id("corn").is_none());
    }

    #[test]
    fn duplicate_seed_key_rejected() {
        let mut b = CatalogBuilder::new();
        b.register_seed(seed("wheat", Rarity::Common, 2000));
        b.register_seed(seed("wheat", Rarity::Rare, 10));
        assert_eq!(
            b.build().unwrap_err(),
            CatalogError::DuplicateKey("wheat".into())
        );
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(
            CatalogBuilder::new().build().unwrap_err(),
            CatalogError::NoSeeds
        );
    }

    #[test]
    fn zero_growth_rejected() {
        let mut b = CatalogBuilder::new();
        b.register_seed(seed("instant", Rarity::Common, 0));
        assert!(matches!(
            b.build(),
            Err(CatalogError::ZeroGrowthDuration(_))
        ));
    }

    #[test]
    fn flat_cost_multiplier_rejected() {
        let mut b = CatalogBuilder::new();
        b.register_seed(seed("wheat", Rarity::Common, 2000));
        b.register_upgrade(upgrade("flat", 1.0));
        assert!(matches!(
            b.build(),
            Err(CatalogError::InvalidCostMultiplier { .. })
        ));
    }

    #[test]
    fn mutate_seed_by_key() {
        let mut b = CatalogBuilder::new();
        b.register_seed(seed("wheat", Rarity::Common, 2000));
        b.mutate_seed("wheat", |s| s.base_sell = 99).unwrap();
        assert!(b.mutate_seed("corn", |_| {}).is_err());
        let catalog = b.build().unwrap();
        assert_eq!(catalog.seed(SeedId(0)).unwrap().base_sell, 99);
    }

    #[test]
    fn cost_curve_is_geometric_and_capped() {
        let def = upgrade("fertilizer", 2.5);
        assert_eq!(def.cost_at(0), Some(200));
        assert_eq!(def.cost_at(1), Some(500));
        assert_eq!(def.cost_at(2), Some(1250));
        assert_eq!(def.cost_at(3), None);
    }

    #[test]
    fn lowest_tier_in_registration_order() {
        let mut b = CatalogBuilder::new();
        b.register_seed(seed("tomato", Rarity::Uncommon, 10));
        let wheat = b.register_seed(seed("wheat", Rarity::Common, 10));
        let corn = b.register_seed(seed("corn", Rarity::Common, 10));
        let catalog = b.build().unwrap();
        assert_eq!(catalog.lowest_tier_seeds(), vec![wheat, corn]);
    }

    #[test]
    fn rarity_is_ordered() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Epic < Rarity::Legendary);
    }
}
