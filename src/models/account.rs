use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_BASE_RISK_PCT, DEFAULT_STARTING_BALANCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub starting_balance: f64,
    pub base_risk_pct: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
            base_risk_pct: DEFAULT_BASE_RISK_PCT,
        }
    }
}

/// Money figures. Only the trade ledger and week finalization write here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub balance: f64,
    pub equity: f64,
    pub high_water: f64,
    pub daily_pl: f64,
    pub weekly_pl: f64,
    /// Largest single-trade gain, never below zero.
    pub biggest_profit: f64,
    /// Most negative single-trade result, never above zero.
    pub biggest_loss: f64,
    pub best_week: f64,
}

impl Account {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            balance: starting_balance,
            equity: starting_balance,
            high_water: starting_balance,
            daily_pl: 0.0,
            weekly_pl: 0.0,
            biggest_profit: 0.0,
            biggest_loss: 0.0,
            best_week: 0.0,
        }
    }

    pub fn drawdown(&self) -> f64 {
        self.high_water - self.balance
    }
}

/// All-time counters. Everything except `mpi` only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub wins: u32,
    pub losses: u32,
    pub sum_profit: f64,
    pub sum_loss_abs: f64,
    pub max_drawdown: f64,
    pub mpi: u32,
}

impl Stats {
    /// Trades with a non-zero result.
    pub fn decided(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn avg_win(&self) -> f64 {
        if self.wins > 0 {
            self.sum_profit / self.wins as f64
        } else {
            0.0
        }
    }
}
