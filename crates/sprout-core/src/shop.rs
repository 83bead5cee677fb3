//! Rotating shop stock.
//!
//! Every restock replaces the whole stock: the priority seeds are always
//! present, a random handful of other seed types join them, and each stocked
//! type receives an independent random quantity. Everything else is zero.

use crate::clock::Timestamp;
use crate::config::RestockRule;
use crate::id::SeedId;
use crate::inventory::SeedCounts;
use crate::rng::SimRng;

/// Seeds currently purchasable from the shop.
pub type ShopStock = SeedCounts;

/// Draw a fresh stock for a catalog of `seed_count` seeds.
///
/// Priority seeds outside the catalog are skipped. If fewer non-priority
/// seeds exist than the drawn slot count, all of them are stocked.
pub fn allocate_stock(seed_count: usize, rule: &RestockRule, rng: &mut SimRng) -> ShopStock {
    let mut stock = SeedCounts::new(seed_count);
    let in_catalog = |id: &SeedId| id.index() < seed_count;

    let extra_slots = rng.range_inclusive(rule.extra_types.min, rule.extra_types.max) as usize;
    let pool: Vec<SeedId> = (0..seed_count)
        .map(|i| SeedId(i as u16))
        .filter(|id| !rule.priority_seeds.contains(id))
        .collect();
    let extras = rng.sample(&pool, extra_slots);

    for seed in rule
        .priority_seeds
        .iter()
        .copied()
        .filter(in_catalog)
        .chain(extras)
    {
        let quantity = rng.range_inclusive(rule.quantity.min, rule.quantity.max);
        stock.set(seed, quantity);
    }
    stock
}

/// Whole seconds until `deadline`, rounded up; 0 once it has passed.
pub fn seconds_until(deadline: Timestamp, now: Timestamp) -> u64 {
    deadline.saturating_sub(now).div_ceil(1_000)
}
