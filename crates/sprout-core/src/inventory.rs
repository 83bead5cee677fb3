use crate::id::SeedId;

/// A non-negative count per catalog seed. Backs both the player's inventory
/// and the shop stock.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeedCounts {
    counts: Vec<u32>,
}

/// Seeds the player owns.
pub type Inventory = SeedCounts;

impl SeedCounts {
    /// All-zero counts for a catalog of `seed_count` seeds.
    pub fn new(seed_count: usize) -> Self {
        Self {
            counts: vec![0; seed_count],
        }
    }

    /// Count for `seed`; 0 for seeds outside the catalog.
    pub fn get(&self, seed: SeedId) -> u32 {
        self.counts.get(seed.index()).copied().unwrap_or(0)
    }

    /// Overwrite the count for `seed`. Ignored for seeds outside the catalog.
    pub fn set(&mut self, seed: SeedId, count: u32) {
        if let Some(slot) = self.counts.get_mut(seed.index()) {
            *slot = count;
        }
    }

    /// Add one unit. Saturates at `u32::MAX`.
    pub fn add_one(&mut self, seed: SeedId) {
        if let Some(slot) = self.counts.get_mut(seed.index()) {
            *slot = slot.saturating_add(1);
        }
    }

    /// Remove one unit. Returns false (and changes nothing) when the count is
    /// already zero.
    #[must_use = "false means nothing was taken"]
    pub fn take_one(&mut self, seed: SeedId) -> bool {
        match self.counts.get_mut(seed.index()) {
            Some(slot) if *slot > 0 => {
                *slot -= 1;
                true
            }
            _ => false,
        }
    }

    /// Zero every count.
    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
    }

    pub fn is_all_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// `(seed, count)` pairs in catalog order, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (SeedId, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (SeedId(i as u16), c))
    }

    /// Seeds with a positive count, in catalog order.
    pub fn nonzero(&self) -> impl Iterator<Item = (SeedId, u32)> + '_ {
        self.iter().filter(|&(_, c)| c > 0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }
}
