//! Sprout Core -- the simulation and economy engine for an idle farming game.
//!
//! Players plant seeds on a grid, seeds mature over wall-clock time, mature
//! crops sell for coins, coins buy seeds from a rotating shop and permanent
//! upgrades, and a rebirth trades the whole balance for a permanent payout
//! multiplier.
//!
//! # Control Flow
//!
//! Presentation forwards player intents as [`command::Command`]s (or calls
//! the matching [`farm::Farm`] methods), the farm validates and applies them
//! atomically, and presentation re-renders from a [`query::FarmSnapshot`].
//! Independently, a host loop calls [`farm::Farm::advance`] (or
//! [`session::Session::poll`]) to run the two background activities:
//!
//! 1. **Growth** (every ~200 ms) -- mark cells whose speed-adjusted growth
//!    duration has elapsed as mature.
//! 2. **Restock** (checked every ~1 s) -- once the deadline passes, replace
//!    the whole shop stock and schedule the next restock.
//!
//! Both recompute from absolute timestamps, so a late or skipped tick
//! catches up without double-applying anything.
//!
//! # Key Types
//!
//! - [`farm::Farm`] -- The aggregate that owns all mutable game state.
//! - [`catalog::Catalog`] -- Immutable seed and upgrade definitions (frozen
//!   at startup).
//! - [`config::FarmConfig`] -- Grid size, restock rules, rebirth base cost.
//! - [`grid::Grid`] -- Per-cell `Empty -> Growing -> Mature` state machine.
//! - [`event::EventBus`] -- Typed farm events with passive listeners.
//! - [`session::Session`] -- A farm bound to a [`clock::Clock`].

pub mod catalog;
pub mod clock;
pub mod command;
pub mod config;
pub mod economy;
pub mod error;
pub mod event;
pub mod farm;
pub mod format;
pub mod grid;
pub mod id;
pub mod inventory;
pub mod query;
pub mod rng;
pub mod session;
pub mod shop;
pub mod sim;
pub mod standard;
pub mod upgrade;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
