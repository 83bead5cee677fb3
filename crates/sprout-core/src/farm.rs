//! The farm aggregate: owns all mutable game state and applies every
//! command and background tick.
//!
//! # Architecture
//!
//! The `Farm` owns:
//! - A shared, immutable [`Catalog`] and a validated [`FarmConfig`]
//! - The [`Grid`] of cells and their growth state
//! - The player's [`Inventory`] and the shop's [`ShopStock`]
//! - [`UpgradeLevels`] and the [`EconomyState`] (coins, multiplier, rebirth cost)
//! - A seeded [`SimRng`] for restock draws
//! - A [`TickSchedule`] for the two background activities
//! - An [`EventBus`] for typed farm events
//!
//! # Atomicity
//!
//! Every command validates completely before it mutates anything, so a
//! refused command leaves the farm untouched. Events produced by a command
//! are delivered only after it has fully applied.
//!
//! # Time
//!
//! The farm never reads a clock. Operations that depend on time take `now`
//! explicitly; [`crate::session::Session`] supplies it from a [`crate::clock::Clock`].

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::clock::Timestamp;
use crate::command::{Command, CommandOutcome, RebirthOutcome, UpgradePurchase};
use crate::config::{ConfigError, FarmConfig};
use crate::economy::EconomyState;
use crate::error::CommandError;
use crate::event::{EventBuffer, EventBus, EventKind, FarmEvent, PassiveListener};
use crate::grid::{self, Cell, Grid};
use crate::id::{CellId, SeedId, UpgradeId};
use crate::inventory::{Inventory, SeedCounts};
use crate::query::{CellSnapshot, FarmSnapshot, ShopEntry, UpgradeEntry};
use crate::rng::SimRng;
use crate::shop::{self, ShopStock};
use crate::sim::{AdvanceResult, StateHash, TickSchedule};
use crate::upgrade::UpgradeLevels;

// ---------------------------------------------------------------------------
// Farm
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Farm {
    catalog: Arc<Catalog>,
    config: FarmConfig,
    grid: Grid,
    inventory: Inventory,
    stock: ShopStock,
    upgrades: UpgradeLevels,
    economy: EconomyState,
    rng: SimRng,
    schedule: TickSchedule,
    events: EventBus,
}

impl Farm {
    /// Build a fresh farm. The initial shop stock is drawn immediately and
    /// the first restock is due one interval after `now`.
    pub fn new(
        catalog: Arc<Catalog>,
        config: FarmConfig,
        seed: u64,
        now: Timestamp,
    ) -> Result<Self, ConfigError> {
        config.validate(&catalog)?;

        let mut rng = SimRng::new(seed);
        let stock = shop::allocate_stock(catalog.seed_count(), &config.restock, &mut rng);
        let next_restock_at = now.saturating_add(config.restock_interval_ms);

        tracing::debug!(
            grid_size = config.grid_size,
            seeds = catalog.seed_count(),
            upgrades = catalog.upgrade_count(),
            next_restock_at,
            "farm created"
        );

        Ok(Self {
            grid: Grid::new(config.grid_size),
            inventory: SeedCounts::new(catalog.seed_count()),
            stock,
            upgrades: UpgradeLevels::new(catalog.upgrade_count()),
            economy: EconomyState::new(
                config.starting_coins,
                config.rebirth_base_cost,
                next_restock_at,
            ),
            rng,
            schedule: TickSchedule::new(config.growth_tick_ms, config.restock_check_ms),
            events: EventBus::new(config.event_capacity),
            catalog,
            config,
        })
    }

    /// A farm with the standard catalog and tuning.
    pub fn standard(seed: u64, now: Timestamp) -> Result<Self, ConfigError> {
        let catalog = Arc::new(Catalog::standard());
        let config = FarmConfig::standard(&catalog)?;
        Self::new(catalog, config, seed, now)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Plant one owned `seed` into an empty `cell`.
    pub fn plant(&mut self, cell: CellId, seed: SeedId, now: Timestamp) -> Result<(), CommandError> {
        self.grid.check_plantable(cell)?;
        if self.catalog.seed(seed).is_none() {
            return Err(CommandError::UnknownSeed(seed));
        }
        if self.inventory.get(seed) == 0 {
            return Err(CommandError::InsufficientInventory(seed));
        }

        self.grid.plant(cell, seed, now)?;
        let taken = self.inventory.take_one(seed);
        debug_assert!(taken, "inventory checked above");

        tracing::debug!(%cell, seed = seed.0, at = now, "planted");
        self.events.emit(FarmEvent::Planted { cell, seed, at: now });
        self.events.deliver();
        Ok(())
    }

    /// Collect a mature crop. Returns the payout credited.
    pub fn harvest(&mut self, cell: CellId) -> Result<u64, CommandError> {
        let seed = self.grid.check_harvestable(cell)?;
        let base_sell = self
            .catalog
            .seed(seed)
            .ok_or(CommandError::UnknownSeed(seed))?
            .base_sell;
        let payout = self.economy.payout(base_sell, self.sell_value_multiplier());

        self.grid.take_mature(cell)?;
        self.economy.credit(payout);

        tracing::debug!(%cell, seed = seed.0, payout, coins = self.economy.coins, "harvested");
        self.events.emit(FarmEvent::Harvested { cell, seed, payout });
        self.events.deliver();
        Ok(payout)
    }

    /// Buy one seed from the shop. Returns the price paid.
    ///
    /// Affordability is checked before stock.
    pub fn buy_seed(&mut self, seed: SeedId) -> Result<u64, CommandError> {
        let cost = self
            .catalog
            .seed(seed)
            .ok_or(CommandError::UnknownSeed(seed))?
            .cost;
        if !self.economy.can_afford(cost) {
            return Err(CommandError::InsufficientFunds {
                needed: cost,
                available: self.economy.coins,
            });
        }
        if self.stock.get(seed) == 0 {
            return Err(CommandError::InsufficientStock(seed));
        }

        let paid = self.economy.debit(cost);
        let taken = self.stock.take_one(seed);
        debug_assert!(paid && taken, "funds and stock checked above");
        self.inventory.add_one(seed);

        tracing::debug!(seed = seed.0, cost, coins = self.economy.coins, "seed bought");
        self.events.emit(FarmEvent::SeedPurchased { seed, cost });
        self.events.deliver();
        Ok(cost)
    }

    /// Buy the next level of `upgrade`.
    ///
    /// The level cap is checked before affordability.
    pub fn buy_upgrade(&mut self, upgrade: UpgradeId) -> Result<UpgradePurchase, CommandError> {
        let cost = self
            .upgrades
            .quote(&self.catalog, upgrade, self.economy.coins)?;

        let paid = self.economy.debit(cost);
        debug_assert!(paid, "quote checked funds");
        let level = self.upgrades.increment(&self.catalog, upgrade);

        tracing::debug!(upgrade = upgrade.0, level, cost, coins = self.economy.coins, "upgrade bought");
        self.events
            .emit(FarmEvent::UpgradePurchased { upgrade, level, cost });
        self.events.deliver();
        Ok(UpgradePurchase { level, cost })
    }

    /// Spend the whole balance on as many rebirths as it covers.
    ///
    /// The multiplier grows by the number bought and the rebirth cost by half
    /// of it (floored). Inventory, upgrades and the grid are wiped and one
    /// starter seed is granted. Shop stock and the restock deadline are kept.
    pub fn rebirth(&mut self) -> Result<RebirthOutcome, CommandError> {
        let gained = self.economy.rebirth_potential();
        if gained < 1 {
            return Err(CommandError::RebirthBelowThreshold {
                cost: self.economy.rebirth_cost,
                available: self.economy.coins,
            });
        }

        self.economy.rebirth(gained);
        self.reset_progress();

        let outcome = RebirthOutcome {
            gained,
            multiplier: self.economy.multiplier,
            rebirth_cost: self.economy.rebirth_cost,
        };
        tracing::info!(
            gained,
            multiplier = outcome.multiplier,
            rebirth_cost = outcome.rebirth_cost,
            "rebirth"
        );
        self.events.emit(FarmEvent::Reborn {
            gained,
            multiplier: outcome.multiplier,
            rebirth_cost: outcome.rebirth_cost,
        });
        self.events.deliver();
        Ok(outcome)
    }

    /// Start over from a bankrupt farm. Multiplier and rebirth cost survive.
    pub fn free_reset(&mut self) -> Result<(), CommandError> {
        if !self.is_bankrupt() {
            return Err(CommandError::NotBankrupt);
        }

        self.economy.coins = 0;
        self.reset_progress();

        tracing::info!(multiplier = self.economy.multiplier, "free reset");
        self.events.emit(FarmEvent::FreeReset);
        self.events.deliver();
        Ok(())
    }

    /// Route a [`Command`] to its operation.
    pub fn apply(&mut self, command: Command, now: Timestamp) -> Result<CommandOutcome, CommandError> {
        let outcome = match command {
            Command::Plant { cell, seed } => {
                self.plant(cell, seed, now)?;
                CommandOutcome::Planted
            }
            Command::Harvest { cell } => CommandOutcome::Harvested {
                payout: self.harvest(cell)?,
            },
            Command::BuySeed { seed } => CommandOutcome::SeedBought {
                cost: self.buy_seed(seed)?,
            },
            Command::BuyUpgrade { upgrade } => {
                CommandOutcome::UpgradeBought(self.buy_upgrade(upgrade)?)
            }
            Command::Rebirth => CommandOutcome::Reborn(self.rebirth()?),
            Command::FreeReset => {
                self.free_reset()?;
                CommandOutcome::Reset
            }
        };
        Ok(outcome)
    }

    fn reset_progress(&mut self) {
        self.inventory.clear();
        self.upgrades.clear();
        self.grid.clear();
        self.inventory.set(self.config.starter_seed, 1);
    }

    // -----------------------------------------------------------------------
    // Background ticks
    // -----------------------------------------------------------------------

    /// Mark every growing cell whose adjusted duration has elapsed as mature.
    /// Returns the cells that matured now.
    pub fn growth_tick(&mut self, now: Timestamp) -> Vec<CellId> {
        let speed = self.growth_speed_multiplier();
        let catalog = &self.catalog;
        let matured = self
            .grid
            .evaluate_growth(now, speed, |seed| catalog.seed(seed).map(|d| d.growth_ms));

        for &cell in &matured {
            if let Some(seed) = self.grid.cell(cell).and_then(Cell::seed) {
                tracing::trace!(%cell, seed = seed.0, at = now, "matured");
                self.events.emit(FarmEvent::Matured { cell, seed, at: now });
            }
        }
        self.schedule.mark_growth(now);
        self.events.deliver();
        matured
    }

    /// Restock the shop if the deadline has passed. Returns whether it did.
    pub fn restock_tick(&mut self, now: Timestamp) -> bool {
        self.schedule.mark_restock_check(now);
        if now < self.economy.next_restock_at {
            return false;
        }
        self.restock(now);
        true
    }

    /// Replace the whole shop stock now and push the deadline one interval
    /// past `now`.
    pub fn restock(&mut self, now: Timestamp) {
        self.stock = shop::allocate_stock(
            self.catalog.seed_count(),
            &self.config.restock,
            &mut self.rng,
        );
        let next_at = now.saturating_add(self.config.restock_interval_ms);
        self.economy.next_restock_at = next_at;

        tracing::debug!(
            at = now,
            next_at,
            stocked_types = self.stock.nonzero().count(),
            "shop restocked"
        );
        self.events.emit(FarmEvent::Restocked { at: now, next_at });
        self.events.deliver();
    }

    /// Run whichever background ticks are due at `now`.
    ///
    /// Each tick runs at most once per call, however late the call is.
    pub fn advance(&mut self, now: Timestamp) -> AdvanceResult {
        let mut result = AdvanceResult::default();
        if self.schedule.growth_due(now) {
            result.matured = self.growth_tick(now);
            result.growth_ran = true;
        }
        if self.schedule.restock_check_due(now) {
            result.restocked = self.restock_tick(now);
            result.restock_checked = true;
        }
        result
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &FarmConfig {
        &self.config
    }

    pub fn economy(&self) -> &EconomyState {
        &self.economy
    }

    pub fn coins(&self) -> u64 {
        self.economy.coins
    }

    pub fn multiplier(&self) -> u64 {
        self.economy.multiplier
    }

    pub fn rebirth_cost(&self) -> u64 {
        self.economy.rebirth_cost
    }

    pub fn next_restock_at(&self) -> Timestamp {
        self.economy.next_restock_at
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.grid.cell(id)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Owned count of `seed`.
    pub fn owned(&self, seed: SeedId) -> u32 {
        self.inventory.get(seed)
    }

    pub fn shop_stock(&self) -> &ShopStock {
        &self.stock
    }

    /// Shop quantity of `seed`.
    pub fn stock(&self, seed: SeedId) -> u32 {
        self.stock.get(seed)
    }

    pub fn upgrades(&self) -> &UpgradeLevels {
        &self.upgrades
    }

    pub fn level(&self, upgrade: UpgradeId) -> u32 {
        self.upgrades.level(upgrade)
    }

    /// Price of the next level of `upgrade`; `None` at max level.
    pub fn upgrade_cost(&self, upgrade: UpgradeId) -> Option<u64> {
        self.upgrades.next_cost(&self.catalog, upgrade)
    }

    pub fn growth_speed_multiplier(&self) -> f64 {
        self.upgrades.growth_speed_multiplier(&self.catalog)
    }

    pub fn sell_value_multiplier(&self) -> f64 {
        self.upgrades.sell_value_multiplier(&self.catalog)
    }

    /// Rebirths the current balance would buy, without buying them.
    pub fn rebirth_potential(&self) -> u64 {
        self.economy.rebirth_potential()
    }

    pub fn seconds_until_restock(&self, now: Timestamp) -> u64 {
        shop::seconds_until(self.economy.next_restock_at, now)
    }

    /// No coins, no seeds owned, nothing planted: no way to make progress
    /// except a free reset.
    pub fn is_bankrupt(&self) -> bool {
        self.economy.coins == 0 && self.inventory.is_all_zero() && self.grid.planted_count() == 0
    }

    /// Display progress of `cell` in `[0, 100]`; `None` outside the grid.
    pub fn progress(&self, cell: CellId, now: Timestamp) -> Option<f64> {
        let cell = self.grid.cell(cell)?;
        let Some(planting) = cell.planting() else {
            return Some(0.0);
        };
        let growth_ms = self.catalog.seed(planting.seed)?.growth_ms;
        Some(grid::progress_percent(
            planting,
            now,
            growth_ms,
            self.growth_speed_multiplier(),
        ))
    }

    /// Owned seeds in catalog order.
    pub fn hotbar(&self) -> Vec<SeedId> {
        self.inventory.nonzero().map(|(seed, _)| seed).collect()
    }

    /// Aggregate everything presentation draws into an owned snapshot.
    pub fn snapshot(&self, now: Timestamp) -> FarmSnapshot {
        let coins = self.economy.coins;
        let cells = self
            .grid
            .cells()
            .iter()
            .map(|cell| CellSnapshot {
                id: cell.id,
                state: cell.state(),
                seed: cell.seed(),
                planted_at: cell.planted_at(),
                progress: self.progress(cell.id, now).unwrap_or(0.0),
            })
            .collect();
        let shop = self
            .catalog
            .seeds()
            .map(|(seed, def)| {
                let stock = self.stock.get(seed);
                ShopEntry {
                    seed,
                    cost: def.cost,
                    stock,
                    owned: self.inventory.get(seed),
                    purchasable: stock > 0 && coins >= def.cost,
                }
            })
            .collect();
        let upgrades = self
            .catalog
            .upgrades()
            .map(|(upgrade, def)| {
                let next_cost = self.upgrade_cost(upgrade);
                UpgradeEntry {
                    upgrade,
                    level: self.upgrades.level(upgrade),
                    max_level: def.max_level,
                    next_cost,
                    purchasable: next_cost.is_some_and(|c| coins >= c),
                }
            })
            .collect();

        FarmSnapshot {
            taken_at: now,
            coins,
            multiplier: self.economy.multiplier,
            rebirth_cost: self.economy.rebirth_cost,
            rebirth_potential: self.rebirth_potential(),
            next_restock_at: self.economy.next_restock_at,
            seconds_until_restock: self.seconds_until_restock(now),
            bankrupt: self.is_bankrupt(),
            growth_speed_multiplier: self.growth_speed_multiplier(),
            sell_value_multiplier: self.sell_value_multiplier(),
            grid_size: self.grid.size(),
            cells,
            inventory: self.inventory.as_slice().to_vec(),
            hotbar: self.hotbar(),
            shop,
            upgrades,
        }
    }

    /// Deterministic hash of all simulation state. Events and listeners are
    /// not included.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.economy.coins);
        h.write_u64(self.economy.multiplier);
        h.write_u64(self.economy.rebirth_cost);
        h.write_u64(self.economy.next_restock_at);
        for cell in self.grid.cells() {
            match cell.planting() {
                None => h.write_u32(0),
                Some(p) => {
                    h.write_u32(p.seed.0 as u32 + 1);
                    h.write_u64(p.planted_at);
                    h.write(&[p.mature as u8]);
                }
            }
        }
        for &count in self.inventory.as_slice() {
            h.write_u32(count);
        }
        for &count in self.stock.as_slice() {
            h.write_u32(count);
        }
        for (_, level) in self.upgrades.iter() {
            h.write_u32(level);
        }
        h.write_u64(self.rng.state());
        h.finish()
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Register a listener for one event kind.
    pub fn on_event(&mut self, kind: EventKind, listener: PassiveListener) {
        self.events.on(kind, listener);
    }

    pub fn suppress_event(&mut self, kind: EventKind) {
        self.events.suppress(kind);
    }

    pub fn unsuppress_event(&mut self, kind: EventKind) {
        self.events.unsuppress(kind);
    }

    pub fn event_buffer(&self) -> &EventBuffer {
        self.events.buffer()
    }

    /// Take every recorded event, oldest first.
    pub fn drain_events(&mut self) -> Vec<FarmEvent> {
        self.events.drain()
    }

    // -----------------------------------------------------------------------
    // Test hooks
    // -----------------------------------------------------------------------

    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_coins(&mut self, coins: u64) {
        self.economy.coins = coins;
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_owned(&mut self, seed: SeedId, count: u32) {
        self.inventory.set(seed, count);
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_stock(&mut self, seed: SeedId, count: u32) {
        self.stock.set(seed, count);
    }
}
