//! The shipped standard data files must describe exactly the built-in
//! standard content, and a farm started from them must play.

use std::fs;
use std::path::{Path, PathBuf};

use sprout_core::catalog::Catalog;
use sprout_core::config::FarmConfig;
use sprout_core::id::CellId;
use sprout_data::{load_farm_data, DataLoadError};

fn standard_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/standard")
}

#[test]
fn standard_files_match_builtin_catalog() {
    let data = load_farm_data(&standard_dir()).unwrap();
    let builtin = Catalog::standard();

    assert_eq!(data.catalog.seed_count(), builtin.seed_count());
    for ((a_id, a), (b_id, b)) in data.catalog.seeds().zip(builtin.seeds()) {
        assert_eq!(a_id, b_id);
        assert_eq!(a, b, "seed {}", a.key);
    }

    assert_eq!(data.catalog.upgrade_count(), builtin.upgrade_count());
    for ((_, a), (_, b)) in data.catalog.upgrades().zip(builtin.upgrades()) {
        assert_eq!(a, b, "upgrade {}", a.key);
    }
}

#[test]
fn standard_files_match_builtin_config() {
    let data = load_farm_data(&standard_dir()).unwrap();
    let builtin = FarmConfig::standard(&Catalog::standard()).unwrap();
    assert_eq!(data.config, builtin);
}

#[test]
fn farm_from_standard_files_plays() {
    let data = load_farm_data(&standard_dir()).unwrap();
    let mut farm = data.new_farm(42, 0).unwrap();
    let wheat = data.catalog.seed_id("wheat").unwrap();

    assert_eq!(farm.coins(), 20);
    farm.buy_seed(wheat).unwrap();
    farm.plant(CellId(0), wheat, 0).unwrap();
    assert!(farm.growth_tick(1_999).is_empty());
    assert_eq!(farm.growth_tick(2_000), vec![CellId(0)]);
    assert_eq!(farm.harvest(CellId(0)).unwrap(), 7);
    assert_eq!(farm.coins(), 22);
}

#[test]
fn same_data_same_seed_same_farm() {
    let data = load_farm_data(&standard_dir()).unwrap();
    let a = data.new_farm(9, 0).unwrap();
    let b = data.new_farm(9, 0).unwrap();
    assert_eq!(a.state_hash(), b.state_hash());
}

// ---------------------------------------------------------------------------
// Hand-written directories
// ---------------------------------------------------------------------------

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sprout_data_it_{name}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn mixed_formats_in_one_directory() {
    let dir = scratch_dir("mixed");
    fs::write(
        dir.join("seeds.toml"),
        r#"
        [[seeds]]
        key = "bean"
        name = "Bean"
        rarity = "uncommon"
        cost = 3
        base_sell = 5
        growth_ms = 700

        [[seeds]]
        key = "pea"
        name = "Pea"
        rarity = "uncommon"
        cost = 1
        base_sell = 2
        growth_ms = 300
        "#,
    )
    .unwrap();
    fs::write(
        dir.join("upgrades.ron"),
        r#"[(key: "can", name: "Watering Can", base_cost: 5, cost_multiplier: 1.5,
             effect: growth_speed, effect_per_level: 0.5, max_level: 2)]"#,
    )
    .unwrap();
    fs::write(
        dir.join("farm.json"),
        r#"{"grid_size": 2, "starter_seed": "pea", "quantity": {"min": 1, "max": 1}}"#,
    )
    .unwrap();

    let data = load_farm_data(&dir).unwrap();
    let bean = data.catalog.seed_id("bean").unwrap();
    let pea = data.catalog.seed_id("pea").unwrap();
    assert_eq!(data.config.restock.priority_seeds, vec![bean, pea]);
    assert_eq!(data.config.starter_seed, pea);

    let farm = data.new_farm(1, 0).unwrap();
    assert_eq!(farm.grid().len(), 4);
    assert_eq!(farm.stock(bean), 1);
    assert_eq!(farm.stock(pea), 1);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn conflicting_upgrade_files() {
    let dir = scratch_dir("conflict");
    fs::write(dir.join("seeds.json"), "[]").unwrap();
    fs::write(dir.join("upgrades.json"), "[]").unwrap();
    fs::write(dir.join("upgrades.ron"), "[]").unwrap();
    assert!(matches!(
        load_farm_data(&dir),
        Err(DataLoadError::ConflictingFormats { .. })
    ));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_seed_list_is_not_a_catalog() {
    let dir = scratch_dir("empty");
    fs::write(dir.join("seeds.json"), "[]").unwrap();
    fs::write(dir.join("upgrades.json"), "[]").unwrap();
    assert!(matches!(load_farm_data(&dir), Err(DataLoadError::Catalog(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_directory_reports_missing_seeds() {
    let dir = std::env::temp_dir().join("sprout_data_it_does_not_exist");
    assert!(matches!(
        load_farm_data(&dir),
        Err(DataLoadError::MissingRequired { base_name, .. }) if base_name == "seeds"
    ));
}
