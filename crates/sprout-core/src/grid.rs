//! The farm grid and the per-cell growth state machine.
//!
//! ```text
//! Empty --plant--> Growing --growth evaluation--> Mature --harvest--> Empty
//! ```
//!
//! A cell stores an optional [`Planting`]; the seed and the planting time
//! therefore exist together or not at all, and maturity can only be recorded
//! on a planted cell. Maturity is monotonic: once a growth evaluation marks a
//! planting mature, only harvest (or a reset) clears it.

use crate::clock::Timestamp;
use crate::error::CommandError;
use crate::id::{CellId, SeedId};

/// A seed in the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Planting {
    pub seed: SeedId,
    pub planted_at: Timestamp,
    /// Set by growth evaluation once the adjusted growth duration elapsed.
    pub mature: bool,
}

/// Coarse state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CellState {
    Empty,
    Growing,
    Mature,
}

/// One plot on the grid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub id: CellId,
    planting: Option<Planting>,
}

impl Cell {
    fn empty(id: CellId) -> Self {
        Self { id, planting: None }
    }

    pub fn planting(&self) -> Option<&Planting> {
        self.planting.as_ref()
    }

    pub fn seed(&self) -> Option<SeedId> {
        self.planting.map(|p| p.seed)
    }

    pub fn planted_at(&self) -> Option<Timestamp> {
        self.planting.map(|p| p.planted_at)
    }

    pub fn is_mature(&self) -> bool {
        self.planting.is_some_and(|p| p.mature)
    }

    pub fn is_empty(&self) -> bool {
        self.planting.is_none()
    }

    pub fn state(&self) -> CellState {
        match self.planting {
            None => CellState::Empty,
            Some(p) if p.mature => CellState::Mature,
            Some(_) => CellState::Growing,
        }
    }
}

/// Effective growth duration in milliseconds under a speed multiplier.
pub fn adjusted_duration(growth_ms: u64, speed: f64) -> f64 {
    growth_ms as f64 / speed
}

/// Whether a planting made at `planted_at` has grown by `now`.
pub fn is_grown(planted_at: Timestamp, now: Timestamp, growth_ms: u64, speed: f64) -> bool {
    let elapsed = now.saturating_sub(planted_at) as f64;
    elapsed >= adjusted_duration(growth_ms, speed)
}

/// Display-only growth progress in `[0, 100]`.
pub fn progress_percent(planting: &Planting, now: Timestamp, growth_ms: u64, speed: f64) -> f64 {
    if planting.mature {
        return 100.0;
    }
    let elapsed = now.saturating_sub(planting.planted_at) as f64;
    let pct = elapsed / adjusted_duration(growth_ms, speed) * 100.0;
    pct.clamp(0.0, 100.0)
}

/// Square N×N grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    size: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: u32) -> Self {
        let count = size as usize * size as usize;
        Self {
            size,
            cells: (0..count).map(|i| Cell::empty(CellId(i as u32))).collect(),
        }
    }

    /// Side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `(row, column)`, if inside the grid.
    pub fn cell_at(&self, row: u32, column: u32) -> Option<CellId> {
        if row >= self.size || column >= self.size {
            return None;
        }
        Some(CellId(row * self.size + column))
    }

    /// `(row, column)` of a cell, if inside the grid.
    pub fn position(&self, id: CellId) -> Option<(u32, u32)> {
        self.cell(id).map(|_| (id.0 / self.size, id.0 % self.size))
    }

    pub fn planted_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Check that `id` can receive a seed, without changing anything.
    pub fn check_plantable(&self, id: CellId) -> Result<(), CommandError> {
        let cell = self.cell(id).ok_or(CommandError::UnknownCell(id))?;
        if !cell.is_empty() {
            return Err(CommandError::CellOccupied(id));
        }
        Ok(())
    }

    /// Put `seed` into an empty cell.
    pub fn plant(&mut self, id: CellId, seed: SeedId, now: Timestamp) -> Result<(), CommandError> {
        self.check_plantable(id)?;
        self.cells[id.index()].planting = Some(Planting {
            seed,
            planted_at: now,
            mature: false,
        });
        Ok(())
    }

    /// The seed that a harvest of `id` would yield, without changing anything.
    pub fn check_harvestable(&self, id: CellId) -> Result<SeedId, CommandError> {
        let cell = self.cell(id).ok_or(CommandError::UnknownCell(id))?;
        match cell.planting {
            None => Err(CommandError::CellEmpty(id)),
            Some(p) if !p.mature => Err(CommandError::CellNotMature(id)),
            Some(p) => Ok(p.seed),
        }
    }

    /// Clear a mature cell and return what grew there.
    pub fn take_mature(&mut self, id: CellId) -> Result<SeedId, CommandError> {
        let seed = self.check_harvestable(id)?;
        self.cells[id.index()].planting = None;
        Ok(seed)
    }

    /// Mark every growing cell whose adjusted duration has elapsed as mature.
    ///
    /// `growth_ms` maps a seed to its base duration; cells whose seed it does
    /// not know are left untouched. Returns the newly matured cells in grid
    /// order. Re-running with the same `now` returns nothing new.
    pub fn evaluate_growth<F>(&mut self, now: Timestamp, speed: f64, growth_ms: F) -> Vec<CellId>
    where
        F: Fn(SeedId) -> Option<u64>,
    {
        let mut matured = Vec::new();
        for cell in &mut self.cells {
            let Some(planting) = cell.planting.as_mut() else {
                continue;
            };
            if planting.mature {
                continue;
            }
            let Some(duration) = growth_ms(planting.seed) else {
                continue;
            };
            if is_grown(planting.planted_at, now, duration, speed) {
                planting.mature = true;
                matured.push(cell.id);
            }
        }
        matured
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.planting = None;
        }
    }
}
