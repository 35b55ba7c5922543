use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::ProfitFactor;
use crate::models::{Trade, Weekday};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    #[serde(rename = "C")]
    pub c: usize,
}

/// Percentages in [0, 100]. `overall` counts trades that met every
/// category at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAdherence {
    pub strategy: f64,
    pub trade_management: f64,
    pub risk_management: f64,
    pub plan: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub key: Weekday,
    pub date: NaiveDate,
    pub trades: usize,
    pub pl: f64,
    pub no_trade: bool,
}

/// Frozen summary of one finished challenge. Holds its own copies of
/// trade data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub week_id: u16,
    pub strategy: String,
    pub pair: String,
    pub week_start: NaiveDate,
    pub finalized_at: DateTime<Utc>,

    pub week_pl: f64,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub profit_factor: ProfitFactor,
    pub avg_r_multiple: f64,
    pub grade_distribution: GradeDistribution,
    pub rule_adherence: RuleAdherence,
    pub best_trade: Option<Trade>,
    pub worst_trade: Option<Trade>,
    pub days: Vec<DaySummary>,

    pub ending_balance: f64,
    pub ending_mpi: u32,
}

impl WeeklyReport {
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!(
            "  WEEK {} | {} on {} (from {})",
            self.week_id,
            self.strategy,
            self.pair,
            self.week_start.format("%Y-%m-%d")
        );
        println!("{}", "=".repeat(60));
        println!("  PnL:           ${:+.0}", self.week_pl);
        println!("  Trades:        {}", self.total_trades);
        println!("  Win/Loss:      {} / {}", self.wins, self.losses);
        println!("  Win Rate:      {:.2}%", self.win_rate);
        println!("  Profit Factor: {}", self.profit_factor);
        println!("  Avg R:         {:.2}", self.avg_r_multiple);
        println!(
            "  Grades:        A{} B{} C{}",
            self.grade_distribution.a, self.grade_distribution.b, self.grade_distribution.c
        );
        println!();
        println!("  RULES");
        println!("  ───────────────────────────────────");
        println!("  Strategy:      {:.1}%", self.rule_adherence.strategy);
        println!("  Management:    {:.1}%", self.rule_adherence.trade_management);
        println!("  Risk:          {:.1}%", self.rule_adherence.risk_management);
        println!("  Plan:          {:.1}%", self.rule_adherence.plan);
        println!("  Overall:       {:.1}%", self.rule_adherence.overall);
        println!();
        println!("  DAYS");
        println!("  ───────────────────────────────────");
        for day in &self.days {
            println!(
                "  {:>9}: {} trades | PnL ${:+.0}{}",
                day.key,
                day.trades,
                day.pl,
                if day.no_trade { " | no-trade day" } else { "" }
            );
        }
        if let Some(best) = &self.best_trade {
            println!();
            println!("  Best:          ${:+.0} ({:.2}R)", best.pl, best.r_multiple);
        }
        if let Some(worst) = &self.worst_trade {
            println!("  Worst:         ${:+.0} ({:.2}R)", worst.pl, worst.r_multiple);
        }
        println!();
        println!(
            "  Ending balance ${:.0} | MPI {}",
            self.ending_balance, self.ending_mpi
        );
        println!("{}", "=".repeat(60));
    }
}
