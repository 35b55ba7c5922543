use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Stats;

/// Profit factor above this adds nothing to the score.
pub const PF_CAP: f64 = 5.0;
const PF_WEIGHT: f64 = 0.45;
const WIN_RATE_WEIGHT: f64 = 0.35;
const CONSISTENCY_WEIGHT: f64 = 0.20;
const SCORE_SCALE: f64 = 1000.0;

/// Gross profit over gross loss. `Unbounded` when there are profits and no
/// losses at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ProfitFactor {
    Finite(f64),
    Unbounded,
}

impl ProfitFactor {
    pub fn at_least(&self, threshold: f64) -> bool {
        match self {
            ProfitFactor::Finite(v) => *v >= threshold,
            ProfitFactor::Unbounded => true,
        }
    }

    pub fn capped(&self, cap: f64) -> f64 {
        match self {
            ProfitFactor::Finite(v) => v.min(cap),
            ProfitFactor::Unbounded => cap,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ProfitFactor::Finite(v) => Some(*v),
            ProfitFactor::Unbounded => None,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(v) => write!(f, "{:.2}", v),
            ProfitFactor::Unbounded => write!(f, "∞"),
        }
    }
}

pub fn profit_factor(sum_profit: f64, sum_loss_abs: f64) -> ProfitFactor {
    if sum_loss_abs > 0.0 {
        ProfitFactor::Finite(sum_profit / sum_loss_abs)
    } else if sum_profit > 0.0 {
        ProfitFactor::Unbounded
    } else {
        ProfitFactor::Finite(0.0)
    }
}

/// Fraction in [0, 1]; zero when nothing has been decided yet.
pub fn win_rate(wins: u32, losses: u32) -> f64 {
    let decided = wins + losses;
    if decided > 0 {
        wins as f64 / decided as f64
    } else {
        0.0
    }
}

/// MPI: capped profit factor, win rate and drawdown consistency blended
/// into an integer in [0, 1000].
pub fn composite_score(stats: &Stats, high_water: f64) -> u32 {
    let pf = profit_factor(stats.sum_profit, stats.sum_loss_abs);
    let scaled_pf = pf.capped(PF_CAP) / PF_CAP;
    let wr = win_rate(stats.wins, stats.losses);
    let consistency = 1.0 - (stats.max_drawdown / high_water.max(1.0)).min(1.0);

    let blended =
        PF_WEIGHT * scaled_pf + WIN_RATE_WEIGHT * wr + CONSISTENCY_WEIGHT * consistency;
    (SCORE_SCALE * blended).round().clamp(0.0, SCORE_SCALE) as u32
}
