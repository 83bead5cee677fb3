use crate::clock::Timestamp;

/// Currency balance and prestige progression.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EconomyState {
    pub coins: u64,
    /// Permanent harvest multiplier. Starts at 1, only grows.
    pub multiplier: u64,
    /// Coins required per rebirth. Only grows.
    pub rebirth_cost: u64,
    pub next_restock_at: Timestamp,
}

impl EconomyState {
    pub fn new(starting_coins: u64, rebirth_cost: u64, next_restock_at: Timestamp) -> Self {
        Self {
            coins: starting_coins,
            multiplier: 1,
            rebirth_cost,
            next_restock_at,
        }
    }

    /// `floor(base_sell × multiplier × sell_bonus)`, saturating at `u64::MAX`.
    ///
    /// `base_sell × multiplier` is exact integer arithmetic; only the
    /// fractional part of the bonus goes through floating point.
    pub fn payout(&self, base_sell: u64, sell_bonus: f64) -> u64 {
        let exact = base_sell as u128 * self.multiplier as u128;
        if sell_bonus == 1.0 {
            return clamp_u64(exact);
        }
        let whole = sell_bonus.trunc();
        let frac = sell_bonus - whole;
        let scaled = exact
            .saturating_mul(whole as u128)
            .saturating_add((exact as f64 * frac).floor() as u128);
        clamp_u64(scaled)
    }

    /// How many rebirths the current balance buys at once.
    pub fn rebirth_potential(&self) -> u64 {
        self.coins.checked_div(self.rebirth_cost).unwrap_or(0)
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.coins >= cost
    }

    pub fn credit(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Deduct `amount`. Returns false (and changes nothing) if unaffordable.
    #[must_use = "false means nothing was deducted"]
    pub fn debit(&mut self, amount: u64) -> bool {
        match self.coins.checked_sub(amount) {
            Some(rest) => {
                self.coins = rest;
                true
            }
            None => false,
        }
    }

    /// Apply `buyable` rebirths: the multiplier grows by `buyable`, the cost
    /// by `floor(buyable / 2)`, and the balance is spent entirely.
    pub fn rebirth(&mut self, buyable: u64) {
        self.multiplier = self.multiplier.saturating_add(buyable);
        self.rebirth_cost = self.rebirth_cost.saturating_add(buyable / 2);
        self.coins = 0;
    }
}

fn clamp_u64(v: u128) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}
