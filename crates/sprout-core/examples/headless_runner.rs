//! Headless runner: plays a scripted farm for a simulated hour on a manual
//! clock, prints progress, and verifies determinism.
//!
//! Run with: `RUST_LOG=sprout_core=debug cargo run -p sprout-core --example headless_runner`

use sprout_core::catalog::Catalog;
use sprout_core::clock::{Clock, ManualClock};
use sprout_core::farm::Farm;
use sprout_core::format::format_number;
use sprout_core::id::{CellId, SeedId};
use sprout_core::session::Session;
use sprout_core::standard::{FERTILIZER, MARKETING, WHEAT};
use tracing_subscriber::EnvFilter;

const SEED: u64 = 2024;
const TICK_MS: u64 = 200;
const HOUR_MS: u64 = 60 * 60 * 1_000;

/// Greedy bot: rebirth when possible, buy upgrades, keep every cell busy
/// with the most expensive affordable seed in stock.
fn play_hour() -> (Session<ManualClock>, u64) {
    let clock = ManualClock::new(0);
    let farm = Farm::standard(SEED, clock.now()).expect("standard config is valid");
    let mut session = Session::new(farm, clock.clone());

    let catalog: &Catalog = session.farm().catalog();
    let wheat = catalog.seed_id(WHEAT).expect("wheat");
    let upgrades = [
        catalog.upgrade_id(FERTILIZER).expect("fertilizer"),
        catalog.upgrade_id(MARKETING).expect("marketing"),
    ];
    let mut rebirths = 0;

    while clock.now() < HOUR_MS {
        clock.advance(TICK_MS);
        session.poll();

        let mature: Vec<CellId> = session.snapshot().mature_cells().collect();
        for cell in mature {
            let _ = session.harvest(cell);
        }

        if session.farm().rebirth_potential() >= 1 && session.farm().coins() > 5_000 {
            if let Ok(outcome) = session.rebirth() {
                rebirths += 1;
                println!(
                    "[{:>6.1}s] rebirth +{} -> x{} (next cost {})",
                    clock.now() as f64 / 1_000.0,
                    outcome.gained,
                    outcome.multiplier,
                    format_number(outcome.rebirth_cost)
                );
            }
        }

        for upgrade in upgrades {
            let _ = session.buy_upgrade(upgrade);
        }

        let empty: Vec<CellId> = session
            .farm()
            .grid()
            .cells()
            .iter()
            .filter(|c| c.is_empty())
            .map(|c| c.id)
            .collect();
        for cell in empty {
            let seed = best_seed(session.farm()).unwrap_or(wheat);
            if session.farm().owned(seed) == 0 && session.buy_seed(seed).is_err() {
                break;
            }
            let _ = session.plant(cell, seed);
        }

        if session.farm().is_bankrupt() {
            println!("[{:>6.1}s] bankrupt, free reset", clock.now() as f64 / 1_000.0);
            let _ = session.free_reset();
        }
    }

    (session, rebirths)
}

/// The priciest seed the farm owns or can buy right now.
fn best_seed(farm: &Farm) -> Option<SeedId> {
    farm.catalog()
        .seeds()
        .filter(|&(id, def)| {
            farm.owned(id) > 0 || (farm.stock(id) > 0 && farm.coins() >= def.cost)
        })
        .max_by_key(|(_, def)| def.cost)
        .map(|(id, _)| id)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Sprout headless run: one simulated hour ===\n");

    let (run1, rebirths) = play_hour();
    let farm = run1.farm();
    let snap = run1.snapshot();
    let hash1 = farm.state_hash();

    println!();
    println!("Coins:       {}", format_number(snap.coins));
    println!("Multiplier:  x{}", snap.multiplier);
    println!("Rebirths:    {rebirths}");
    println!("Planted:     {}/{}", farm.grid().planted_count(), farm.grid().len());
    println!("Next restock in {}s", snap.seconds_until_restock);
    for entry in &snap.upgrades {
        let def = farm.catalog().upgrade(entry.upgrade).expect("catalog upgrade");
        println!("  {:<18} lvl {}/{}", def.name, entry.level, entry.max_level);
    }
    println!("State hash:  {hash1:#018x}");

    let (run2, _) = play_hour();
    let hash2 = run2.farm().state_hash();
    if hash1 == hash2 {
        println!("Determinism: PASS (hashes match)");
    } else {
        println!("Determinism: FAIL! hash1={hash1:#018x} != hash2={hash2:#018x}");
        std::process::exit(1);
    }
}
