use serde::{Deserialize, Serialize};

/// Identifies a seed type in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeedId(pub u16);

/// Identifies an upgrade in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpgradeId(pub u16);

/// Identifies a cell on the farm grid. Row-major: `row * size + column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub u32);

impl SeedId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl UpgradeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl CellId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}
