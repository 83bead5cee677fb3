//! Player intents as data.
//!
//! Presentation turns key presses and clicks into [`Command`]s and hands them
//! to `Farm::apply`. Each command is applied atomically and yields exactly
//! one outcome: a [`CommandOutcome`] or a [`crate::error::CommandError`].

use crate::id::{CellId, SeedId, UpgradeId};

// ---------------------------------------------------------------------------
// Command enum
// ---------------------------------------------------------------------------

/// A single player intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Command {
    /// Put one owned seed into an empty cell.
    Plant { cell: CellId, seed: SeedId },
    /// Collect a mature crop.
    Harvest { cell: CellId },
    /// Buy one seed from the shop.
    BuySeed { seed: SeedId },
    /// Buy the next level of an upgrade.
    BuyUpgrade { upgrade: UpgradeId },
    /// Trade the whole balance for a permanent multiplier.
    Rebirth,
    /// Start over from a bankrupt farm.
    FreeReset,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a successful rebirth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RebirthOutcome {
    /// Rebirths bought at once.
    pub gained: u64,
    pub multiplier: u64,
    pub rebirth_cost: u64,
}

/// Result of a successful upgrade purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpgradePurchase {
    /// Level after the purchase.
    pub level: u32,
    pub cost: u64,
}

/// What a successfully applied [`Command`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CommandOutcome {
    Planted,
    Harvested { payout: u64 },
    SeedBought { cost: u64 },
    UpgradeBought(UpgradePurchase),
    Reborn(RebirthOutcome),
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_by_variant_name() {
        let json = serde_json::to_string(&Command::Harvest { cell: CellId(7) }).unwrap();
        assert_eq!(json, r#"{"Harvest":{"cell":7}}"#);
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Command::Harvest { cell: CellId(7) });
    }
}
