use chrono::{DateTime, Utc};

use crate::metrics::profit_factor;
use crate::models::{
    Challenge, DaySummary, Grade, GradeDistribution, RuleAdherence, Trade, WeeklyReport,
};

fn pct(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

pub fn rule_adherence(trades: &[&Trade]) -> RuleAdherence {
    let total = trades.len();
    let count = |f: fn(&Trade) -> bool| trades.iter().filter(|&&t| f(t)).count();
    RuleAdherence {
        strategy: pct(count(|t| t.rules.strategy), total),
        trade_management: pct(count(|t| t.rules.trade_management), total),
        risk_management: pct(count(|t| t.rules.risk_management), total),
        plan: pct(count(|t| t.rules.plan), total),
        overall: pct(count(|t| t.rules.all()), total),
    }
}

pub fn grade_distribution(trades: &[&Trade]) -> GradeDistribution {
    let mut dist = GradeDistribution::default();
    for t in trades {
        match t.grade {
            Grade::A => dist.a += 1,
            Grade::B => dist.b += 1,
            Grade::C => dist.c += 1,
        }
    }
    dist
}

/// Aggregates every trade of the challenge, Monday to Friday, each day
/// newest first. Ties for best/worst go to the earliest in that order.
pub fn build_report(
    challenge: &Challenge,
    ending_balance: f64,
    ending_mpi: u32,
    finalized_at: DateTime<Utc>,
) -> WeeklyReport {
    let trades: Vec<&Trade> = challenge.all_trades().collect();
    let total_trades = trades.len();

    let week_pl: f64 = trades.iter().map(|t| t.pl).sum();
    let wins = trades.iter().filter(|t| t.is_win()).count();
    let losses = trades.iter().filter(|t| t.is_loss()).count();
    let sum_profit: f64 = trades.iter().filter(|t| t.is_win()).map(|t| t.pl).sum();
    let sum_loss_abs: f64 = trades
        .iter()
        .filter(|t| t.is_loss())
        .map(|t| t.pl)
        .sum::<f64>()
        .abs();

    let avg_r_multiple = if total_trades > 0 {
        let n = total_trades as f64;
        trades.iter().map(|t| t.r_multiple / n).sum::<f64>()
    } else {
        0.0
    };

    let mut best: Option<&Trade> = None;
    let mut worst: Option<&Trade> = None;
    for &t in &trades {
        if best.map_or(true, |b| t.pl > b.pl) {
            best = Some(t);
        }
        if worst.map_or(true, |w| t.pl < w.pl) {
            worst = Some(t);
        }
    }

    let days = challenge
        .days
        .iter()
        .map(|d| DaySummary {
            key: d.key,
            date: d.date,
            trades: d.trades.len(),
            pl: d.pl(),
            no_trade: d.no_trade,
        })
        .collect();

    WeeklyReport {
        week_id: challenge.week_id,
        strategy: challenge.strategy.clone(),
        pair: challenge.pair.clone(),
        week_start: challenge.week_start,
        finalized_at,
        week_pl,
        total_trades,
        wins,
        losses,
        win_rate: pct(wins, wins + losses),
        profit_factor: profit_factor(sum_profit, sum_loss_abs),
        avg_r_multiple,
        grade_distribution: grade_distribution(&trades),
        rule_adherence: rule_adherence(&trades),
        best_trade: best.cloned(),
        worst_trade: worst.cloned(),
        days,
        ending_balance,
        ending_mpi,
    }
}
