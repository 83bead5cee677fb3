//! The standard content set: twenty seeds across five rarity tiers and four
//! upgrades. `sprout-data` ships the same values as data files.

use crate::catalog::{Catalog, CatalogBuilder, Rarity, SeedDef, UpgradeDef, UpgradeEffect};

pub const WHEAT: &str = "wheat";
pub const LETTUCE: &str = "lettuce";
pub const FERTILIZER: &str = "fertilizer";
pub const MARKETING: &str = "marketing";

// (key, name, rarity, cost, base sell, growth ms)
const SEEDS: &[(&str, &str, Rarity, u64, u64, u64)] = &[
    (WHEAT, "Wheat", Rarity::Common, 5, 7, 2_000),
    (LETTUCE, "Lettuce", Rarity::Common, 15, 20, 3_500),
    ("corn", "Corn", Rarity::Common, 40, 55, 5_000),
    ("potato", "Potato", Rarity::Common, 80, 110, 8_000),
    ("tomato", "Tomato", Rarity::Uncommon, 200, 280, 10_000),
    ("eggplant", "Eggplant", Rarity::Uncommon, 450, 600, 12_000),
    ("carrot", "Carrot", Rarity::Uncommon, 700, 950, 15_000),
    ("onion", "Onion", Rarity::Uncommon, 1_200, 1_600, 18_000),
    ("pepper", "Pepper", Rarity::Rare, 3_000, 4_200, 22_000),
    ("pumpkin", "Pumpkin", Rarity::Rare, 6_000, 9_000, 30_000),
    ("watermelon", "Watermelon", Rarity::Rare, 12_000, 18_000, 35_000),
    ("strawberry", "Strawberry", Rarity::Rare, 25_000, 40_000, 40_000),
    ("grapes", "Grapes", Rarity::Epic, 80_000, 130_000, 45_000),
    ("blueberry", "Blueberry", Rarity::Epic, 200_000, 320_000, 50_000),
    ("pineapple", "Pineapple", Rarity::Epic, 500_000, 850_000, 60_000),
    ("orchid", "Orchid", Rarity::Epic, 1_000_000, 1_800_000, 75_000),
    ("golden_apple", "Golden Apple", Rarity::Legendary, 5_000_000, 12_000_000, 120_000),
    ("starfruit", "Starfruit", Rarity::Legendary, 25_000_000, 60_000_000, 150_000),
    ("dragonfruit", "Dragonfruit", Rarity::Legendary, 100_000_000, 250_000_000, 200_000),
    ("gemfruit", "Gemfruit", Rarity::Legendary, 1_000_000_000, 3_000_000_000, 300_000),
];

fn upgrades() -> [UpgradeDef; 4] {
    [
        UpgradeDef {
            key: FERTILIZER.into(),
            name: "Turbo Fertilizer".into(),
            description: "Plants grow 10% faster per level.".into(),
            base_cost: 200,
            cost_multiplier: 2.5,
            effect: UpgradeEffect::GrowthSpeed,
            effect_per_level: 0.10,
            max_level: 10,
        },
        UpgradeDef {
            key: MARKETING.into(),
            name: "Town Fair".into(),
            description: "Sell harvests for +20% value per level.".into(),
            base_cost: 500,
            cost_multiplier: 3.0,
            effect: UpgradeEffect::SellValue,
            effect_per_level: 0.20,
            max_level: 20,
        },
        UpgradeDef {
            key: "scarecrow".into(),
            name: "Golden Scarecrow".into(),
            description: "Brings luck and decorates the farm.".into(),
            base_cost: 1_000,
            cost_multiplier: 2.0,
            effect: UpgradeEffect::Cosmetic,
            effect_per_level: 1.0,
            max_level: 5,
        },
        UpgradeDef {
            key: "tractor".into(),
            name: "Old Tractor".into(),
            description: "Just for show... for now!".into(),
            base_cost: 100_000,
            cost_multiplier: 5.0,
            effect: UpgradeEffect::Cosmetic,
            effect_per_level: 0.0,
            max_level: 1,
        },
    ]
}

/// Registers the standard content into a fresh builder, leaving room for
/// phase-2 mutation before `build()`.
pub fn catalog_builder() -> CatalogBuilder {
    let mut builder = CatalogBuilder::new();
    for &(key, name, rarity, cost, base_sell, growth_ms) in SEEDS {
        builder.register_seed(SeedDef {
            key: key.to_string(),
            name: name.to_string(),
            rarity,
            cost,
            base_sell,
            growth_ms,
        });
    }
    for def in upgrades() {
        builder.register_upgrade(def);
    }
    builder
}

impl Catalog {
    /// The standard twenty-seed, four-upgrade catalog.
    pub fn standard() -> Catalog {
        catalog_builder()
            .build()
            .expect("standard catalog is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_shape() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.seed_count(), 20);
        assert_eq!(catalog.upgrade_count(), 4);
        let wheat = catalog.seed_id(WHEAT).unwrap();
        assert_eq!(catalog.seed(wheat).unwrap().growth_ms, 2_000);
        let gem = catalog.seed_id("gemfruit").unwrap();
        assert_eq!(catalog.seed(gem).unwrap().base_sell, 3_000_000_000);
    }

    #[test]
    fn rarity_never_decreases_through_the_list() {
        let catalog = Catalog::standard();
        let tiers: Vec<Rarity> = catalog.seeds().map(|(_, s)| s.rarity).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn standard_upgrade_effects() {
        let catalog = Catalog::standard();
        let fert = catalog.upgrade(catalog.upgrade_id(FERTILIZER).unwrap()).unwrap();
        let mkt = catalog.upgrade(catalog.upgrade_id(MARKETING).unwrap()).unwrap();
        assert_eq!(fert.effect, UpgradeEffect::GrowthSpeed);
        assert_eq!(mkt.effect, UpgradeEffect::SellValue);
        let tractor = catalog.upgrade(catalog.upgrade_id("tractor").unwrap()).unwrap();
        assert_eq!(tractor.effect, UpgradeEffect::Cosmetic);
        assert_eq!(tractor.max_level, 1);
    }
}
