//! Upgrade levels and the bonuses they compose into.
//!
//! Bonuses are always derived from the current levels on demand; nothing is
//! cached, so a reset or purchase is reflected immediately.

use crate::catalog::{Catalog, UpgradeEffect};
use crate::error::CommandError;
use crate::id::UpgradeId;

/// Owned level per catalog upgrade.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpgradeLevels {
    levels: Vec<u32>,
}

impl UpgradeLevels {
    pub fn new(upgrade_count: usize) -> Self {
        Self {
            levels: vec![0; upgrade_count],
        }
    }

    /// Level of `id`; 0 for upgrades outside the catalog.
    pub fn level(&self, id: UpgradeId) -> u32 {
        self.levels.get(id.index()).copied().unwrap_or(0)
    }

    /// Cost of the next level, or `None` at max level.
    pub fn next_cost(&self, catalog: &Catalog, id: UpgradeId) -> Option<u64> {
        catalog.upgrade(id)?.cost_at(self.level(id))
    }

    /// Validate a purchase with `coins` available. Returns the price.
    ///
    /// The level cap is checked before affordability.
    pub fn quote(&self, catalog: &Catalog, id: UpgradeId, coins: u64) -> Result<u64, CommandError> {
        let def = catalog
            .upgrade(id)
            .ok_or(CommandError::UnknownUpgrade(id))?;
        let cost = def
            .cost_at(self.level(id))
            .ok_or(CommandError::UpgradeAtMaxLevel(id))?;
        if coins < cost {
            return Err(CommandError::InsufficientFunds {
                needed: cost,
                available: coins,
            });
        }
        Ok(cost)
    }

    /// Raise `id` by one level, clamped at its cap. Returns the new level.
    pub fn increment(&mut self, catalog: &Catalog, id: UpgradeId) -> u32 {
        let cap = catalog.upgrade(id).map_or(0, |d| d.max_level);
        match self.levels.get_mut(id.index()) {
            Some(level) => {
                *level = (*level + 1).min(cap);
                *level
            }
            None => 0,
        }
    }

    /// Back to level 0 everywhere.
    pub fn clear(&mut self) {
        self.levels.iter_mut().for_each(|l| *l = 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (UpgradeId, u32)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, &l)| (UpgradeId(i as u16), l))
    }

    /// `1 + Σ level × effect_per_level` over upgrades with the given effect.
    /// Cosmetic upgrades always yield exactly 1.
    pub fn bonus(&self, catalog: &Catalog, effect: UpgradeEffect) -> f64 {
        if effect == UpgradeEffect::Cosmetic {
            return 1.0;
        }
        1.0 + catalog
            .upgrades()
            .filter(|(_, def)| def.effect == effect)
            .map(|(id, def)| self.level(id) as f64 * def.effect_per_level)
            .sum::<f64>()
    }

    /// Divisor applied to every seed's growth duration.
    pub fn growth_speed_multiplier(&self, catalog: &Catalog) -> f64 {
        self.bonus(catalog, UpgradeEffect::GrowthSpeed)
    }

    /// Factor applied to harvest payouts.
    pub fn sell_value_multiplier(&self, catalog: &Catalog) -> f64 {
        self.bonus(catalog, UpgradeEffect::SellValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::{FERTILIZER, MARKETING};

    fn setup() -> (Catalog, UpgradeLevels, UpgradeId, UpgradeId) {
        let catalog = Catalog::standard();
        let levels = UpgradeLevels::new(catalog.upgrade_count());
        let fert = catalog.upgrade_id(FERTILIZER).unwrap();
        let mkt = catalog.upgrade_id(MARKETING).unwrap();
        (catalog, levels, fert, mkt)
    }

    #[test]
    fn bonuses_start_neutral() {
        let (catalog, levels, _, _) = setup();
        assert_eq!(levels.growth_speed_multiplier(&catalog), 1.0);
        assert_eq!(levels.sell_value_multiplier(&catalog), 1.0);
    }

    #[test]
    fn bonuses_follow_levels_independently() {
        let (catalog, mut levels, fert, mkt) = setup();
        levels.increment(&catalog, fert);
        levels.increment(&catalog, fert);
        levels.increment(&catalog, mkt);
        assert!((levels.growth_speed_multiplier(&catalog) - 1.2).abs() < 1e-12);
        assert!((levels.sell_value_multiplier(&catalog) - 1.2).abs() < 1e-12);
        levels.clear();
        assert_eq!(levels.growth_speed_multiplier(&catalog), 1.0);
    }

    #[test]
    fn cosmetic_upgrades_have_no_influence() {
        let (catalog, mut levels, _, _) = setup();
        let scarecrow = catalog.upgrade_id("scarecrow").unwrap();
        levels.increment(&catalog, scarecrow);
        assert_eq!(levels.growth_speed_multiplier(&catalog), 1.0);
        assert_eq!(levels.sell_value_multiplier(&catalog), 1.0);
        assert_eq!(levels.bonus(&catalog, UpgradeEffect::Cosmetic), 1.0);
    }

    #[test]
    fn quote_checks_cap_then_funds() {
        let (catalog, mut levels, _, _) = setup();
        let tractor = catalog.upgrade_id("tractor").unwrap();
        assert_eq!(
            levels.quote(&catalog, tractor, 10),
            Err(CommandError::InsufficientFunds {
                needed: 100_000,
                available: 10
            })
        );
        assert_eq!(levels.quote(&catalog, tractor, 100_000), Ok(100_000));
        levels.increment(&catalog, tractor);
        assert_eq!(
            levels.quote(&catalog, tractor, 0),
            Err(CommandError::UpgradeAtMaxLevel(tractor))
        );
    }

    #[test]
    fn increment_is_clamped() {
        let (catalog, mut levels, _, _) = setup();
        let tractor = catalog.upgrade_id("tractor").unwrap();
        assert_eq!(levels.increment(&catalog, tractor), 1);
        assert_eq!(levels.increment(&catalog, tractor), 1);
    }

    #[test]
    fn next_cost_grows_strictly() {
        let (catalog, mut levels, _, mkt) = setup();
        let mut last = 0;
        while let Some(cost) = levels.next_cost(&catalog, mkt) {
            assert!(cost > last);
            last = cost;
            levels.increment(&catalog, mkt);
        }
        assert_eq!(levels.level(mkt), 20);
    }

    #[test]
    fn unknown_upgrade_is_refused() {
        let (catalog, levels, _, _) = setup();
        assert_eq!(
            levels.quote(&catalog, UpgradeId(40), u64::MAX),
            Err(CommandError::UnknownUpgrade(UpgradeId(40)))
        );
    }
}
