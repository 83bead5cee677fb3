//! A farm bound to a clock.
//!
//! [`Session`] reads the current time once per call and forwards it to the
//! [`Farm`]. A host loop calls [`Session::poll`] periodically (every ~200 ms
//! is plenty) and forwards player intents as they arrive.

use crate::clock::{Clock, Timestamp};
use crate::command::{Command, CommandOutcome, RebirthOutcome, UpgradePurchase};
use crate::error::CommandError;
use crate::farm::Farm;
use crate::id::{CellId, SeedId, UpgradeId};
use crate::query::FarmSnapshot;
use crate::sim::AdvanceResult;

#[derive(Debug)]
pub struct Session<C: Clock> {
    farm: Farm,
    clock: C,
}

impl<C: Clock> Session<C> {
    pub fn new(farm: Farm, clock: C) -> Self {
        Self { farm, clock }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    pub fn farm_mut(&mut self) -> &mut Farm {
        &mut self.farm
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run whichever background ticks are due.
    pub fn poll(&mut self) -> AdvanceResult {
        let now = self.clock.now();
        self.farm.advance(now)
    }

    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        let now = self.clock.now();
        self.farm.apply(command, now)
    }

    pub fn plant(&mut self, cell: CellId, seed: SeedId) -> Result<(), CommandError> {
        let now = self.clock.now();
        self.farm.plant(cell, seed, now)
    }

    pub fn harvest(&mut self, cell: CellId) -> Result<u64, CommandError> {
        self.farm.harvest(cell)
    }

    pub fn buy_seed(&mut self, seed: SeedId) -> Result<u64, CommandError> {
        self.farm.buy_seed(seed)
    }

    pub fn buy_upgrade(&mut self, upgrade: UpgradeId) -> Result<UpgradePurchase, CommandError> {
        self.farm.buy_upgrade(upgrade)
    }

    pub fn rebirth(&mut self) -> Result<RebirthOutcome, CommandError> {
        self.farm.rebirth()
    }

    pub fn free_reset(&mut self) -> Result<(), CommandError> {
        self.farm.free_reset()
    }

    pub fn snapshot(&self) -> FarmSnapshot {
        self.farm.snapshot(self.clock.now())
    }

    pub fn seconds_until_restock(&self) -> u64 {
        self.farm.seconds_until_restock(self.clock.now())
    }

    pub fn into_farm(self) -> Farm {
        self.farm
    }
}
