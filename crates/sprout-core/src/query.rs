//! Read-only query API for inspecting farm state.
//!
//! Provides snapshot types that aggregate farm state into convenient views
//! for rendering and UI. All types are owned copies -- no references into
//! internal farm storage. Derived values (progress, rebirth potential,
//! countdown) are computed when the snapshot is taken.

use crate::clock::Timestamp;
use crate::grid::CellState;
use crate::id::{CellId, SeedId, UpgradeId};

// ---------------------------------------------------------------------------
// Cell snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CellSnapshot {
    pub id: CellId,
    pub state: CellState,
    pub seed: Option<SeedId>,
    pub planted_at: Option<Timestamp>,
    /// Growth progress in `[0, 100]`. 0 when empty, 100 when mature.
    pub progress: f64,
}

// ---------------------------------------------------------------------------
// Shop and upgrade entries
// ---------------------------------------------------------------------------

/// One row of the seed shop.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShopEntry {
    pub seed: SeedId,
    pub cost: u64,
    pub stock: u32,
    pub owned: u32,
    /// Enough coins and at least one in stock.
    pub purchasable: bool,
}

/// One row of the upgrade panel.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpgradeEntry {
    pub upgrade: UpgradeId,
    pub level: u32,
    pub max_level: u32,
    /// `None` at max level.
    pub next_cost: Option<u64>,
    pub purchasable: bool,
}

// ---------------------------------------------------------------------------
// Farm snapshot
// ---------------------------------------------------------------------------

/// Everything presentation needs to draw one frame.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FarmSnapshot {
    pub taken_at: Timestamp,
    pub coins: u64,
    pub multiplier: u64,
    pub rebirth_cost: u64,
    /// Rebirths the current balance would buy.
    pub rebirth_potential: u64,
    pub next_restock_at: Timestamp,
    pub seconds_until_restock: u64,
    pub bankrupt: bool,
    pub growth_speed_multiplier: f64,
    pub sell_value_multiplier: f64,
    /// Side length of the grid; `cells` is row-major.
    pub grid_size: u32,
    pub cells: Vec<CellSnapshot>,
    /// Owned count per seed, in catalog order.
    pub inventory: Vec<u32>,
    /// Seeds with a positive owned count, in catalog order. Hotbar slot
    /// `n` (1-based) selects `hotbar[n - 1]`.
    pub hotbar: Vec<SeedId>,
    pub shop: Vec<ShopEntry>,
    pub upgrades: Vec<UpgradeEntry>,
}

impl FarmSnapshot {
    pub fn cell(&self, id: CellId) -> Option<&CellSnapshot> {
        self.cells.get(id.index())
    }

    /// Seed in a 1-based hotbar slot.
    pub fn hotbar_slot(&self, slot: usize) -> Option<SeedId> {
        slot.checked_sub(1).and_then(|i| self.hotbar.get(i).copied())
    }

    pub fn mature_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .filter(|c| c.state == CellState::Mature)
            .map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_hotbar(hotbar: Vec<SeedId>) -> FarmSnapshot {
        FarmSnapshot {
            taken_at: 0,
            coins: 0,
            multiplier: 1,
            rebirth_cost: 50,
            rebirth_potential: 0,
            next_restock_at: 0,
            seconds_until_restock: 0,
            bankrupt: false,
            growth_speed_multiplier: 1.0,
            sell_value_multiplier: 1.0,
            grid_size: 0,
            cells: Vec::new(),
            inventory: Vec::new(),
            hotbar,
            shop: Vec::new(),
            upgrades: Vec::new(),
        }
    }

    #[test]
    fn hotbar_slots_are_one_based() {
        let snap = snapshot_with_hotbar(vec![SeedId(0), SeedId(4)]);
        assert_eq!(snap.hotbar_slot(0), None);
        assert_eq!(snap.hotbar_slot(1), Some(SeedId(0)));
        assert_eq!(snap.hotbar_slot(2), Some(SeedId(4)));
        assert_eq!(snap.hotbar_slot(3), None);
    }
}
