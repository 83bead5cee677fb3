//! Background tick scheduling and state hashing.
//!
//! The farm runs two periodic activities: growth evaluation and the restock
//! deadline check. [`TickSchedule`] decides, for a given `now`, which of them
//! are due. Both activities recompute from absolute timestamps, so a late
//! `advance()` runs each at most once and still lands on the right state.

use crate::clock::Timestamp;
use crate::id::CellId;

// ---------------------------------------------------------------------------
// Tick schedule
// ---------------------------------------------------------------------------

/// Cadences of the two background activities and when each last ran.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TickSchedule {
    pub growth_every_ms: u64,
    pub restock_check_every_ms: u64,
    last_growth: Option<Timestamp>,
    last_restock_check: Option<Timestamp>,
}

impl TickSchedule {
    pub fn new(growth_every_ms: u64, restock_check_every_ms: u64) -> Self {
        Self {
            growth_every_ms,
            restock_check_every_ms,
            last_growth: None,
            last_restock_check: None,
        }
    }

    fn due(last: Option<Timestamp>, every: u64, now: Timestamp) -> bool {
        match last {
            None => true,
            Some(t) => now.saturating_sub(t) >= every,
        }
    }

    pub fn growth_due(&self, now: Timestamp) -> bool {
        Self::due(self.last_growth, self.growth_every_ms, now)
    }

    pub fn restock_check_due(&self, now: Timestamp) -> bool {
        Self::due(self.last_restock_check, self.restock_check_every_ms, now)
    }

    pub fn mark_growth(&mut self, now: Timestamp) {
        self.last_growth = Some(now);
    }

    pub fn mark_restock_check(&mut self, now: Timestamp) {
        self.last_restock_check = Some(now);
    }
}

// ---------------------------------------------------------------------------
// Advance result
// ---------------------------------------------------------------------------

/// What a `Farm::advance()` call did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AdvanceResult {
    /// The growth tick ran.
    pub growth_ran: bool,
    /// The restock deadline was checked.
    pub restock_checked: bool,
    /// Cells that became mature during this call.
    pub matured: Vec<CellId>,
    /// The shop was restocked.
    pub restocked: bool,
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of farm state for reproducibility checks.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
