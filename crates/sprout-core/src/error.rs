use crate::id::{CellId, SeedId, UpgradeId};

/// Why a player command was refused.
///
/// Every refusal leaves the farm exactly as it was. These are expected,
/// recoverable outcomes meant to be surfaced as feedback, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Plant target already holds a seed.
    #[error("{0} is already planted")]
    CellOccupied(CellId),

    /// Harvest target has nothing planted.
    #[error("{0} has nothing planted")]
    CellEmpty(CellId),

    /// Harvest target is still growing.
    #[error("{0} is not ready to harvest")]
    CellNotMature(CellId),

    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// The shop has none of this seed left until the next restock.
    #[error("seed {0:?} is out of stock")]
    InsufficientStock(SeedId),

    /// Plant attempted without an owned seed of that type.
    #[error("no {0:?} seeds in inventory")]
    InsufficientInventory(SeedId),

    #[error("upgrade {0:?} is already at its maximum level")]
    UpgradeAtMaxLevel(UpgradeId),

    /// Current coins do not cover even one rebirth.
    #[error("rebirth costs {cost}, have {available}")]
    RebirthBelowThreshold { cost: u64, available: u64 },

    /// Free reset is reserved for a farm that cannot make progress.
    #[error("free reset is only available when bankrupt")]
    NotBankrupt,

    #[error("{0} is outside the grid")]
    UnknownCell(CellId),

    #[error("seed {0:?} is not in the catalog")]
    UnknownSeed(SeedId),

    #[error("upgrade {0:?} is not in the catalog")]
    UnknownUpgrade(UpgradeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_subject() {
        assert_eq!(
            CommandError::CellOccupied(CellId(3)).to_string(),
            "cell#3 is already planted"
        );
        assert_eq!(
            CommandError::InsufficientFunds {
                needed: 5,
                available: 4
            }
            .to_string(),
            "not enough coins: need 5, have 4"
        );
    }
}
