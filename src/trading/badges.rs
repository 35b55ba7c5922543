use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metrics::profit_factor;
use crate::models::{Account, Stats};

const DD5_MIN_DECIDED: u32 = 10;
const DD2_MIN_DECIDED: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "firstWin100")]
    FirstWin100,
    #[serde(rename = "firstWin1000")]
    FirstWin1000,
    #[serde(rename = "firstWin5000")]
    FirstWin5000,
    #[serde(rename = "controlledLoss")]
    ControlledLoss,
    #[serde(rename = "profitFactor2")]
    ProfitFactor2,
    #[serde(rename = "profitFactor3")]
    ProfitFactor3,
    #[serde(rename = "controlledDD5")]
    ControlledDd5,
    #[serde(rename = "controlledDD2")]
    ControlledDd2,
    #[serde(rename = "winStreak3")]
    WinStreak3,
    #[serde(rename = "biggestWinRecord")]
    BiggestWinRecord,
    #[serde(rename = "newHighWater")]
    NewHighWater,
    #[serde(rename = "newBestWeek")]
    NewBestWeek,
}

impl Badge {
    pub fn key(&self) -> &'static str {
        match self {
            Badge::FirstWin100 => "firstWin100",
            Badge::FirstWin1000 => "firstWin1000",
            Badge::FirstWin5000 => "firstWin5000",
            Badge::ControlledLoss => "controlledLoss",
            Badge::ProfitFactor2 => "profitFactor2",
            Badge::ProfitFactor3 => "profitFactor3",
            Badge::ControlledDd5 => "controlledDD5",
            Badge::ControlledDd2 => "controlledDD2",
            Badge::WinStreak3 => "winStreak3",
            Badge::BiggestWinRecord => "biggestWinRecord",
            Badge::NewHighWater => "newHighWater",
            Badge::NewBestWeek => "newBestWeek",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::FirstWin100 => "$100 Trade Win",
            Badge::FirstWin1000 => "$1,000 Trade Win",
            Badge::FirstWin5000 => "$5,000 Trade Win",
            Badge::ControlledLoss => "Smart Loss Management",
            Badge::ProfitFactor2 => "Profit Factor > 2",
            Badge::ProfitFactor3 => "Profit Factor > 3",
            Badge::ControlledDd5 => "Drawdown < 5%",
            Badge::ControlledDd2 => "Drawdown < 2%",
            Badge::WinStreak3 => "3+ Win Streak",
            Badge::BiggestWinRecord => "New Record Win",
            Badge::NewHighWater => "New High Watermark",
            Badge::NewBestWeek => "New Best Week",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Unlocked badges in unlock order. Never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeSet(Vec<Badge>);

impl BadgeSet {
    pub fn contains(&self, badge: Badge) -> bool {
        self.0.contains(&badge)
    }

    /// Adds what is missing and returns only the newly unlocked badges.
    pub fn merge(&mut self, badges: impl IntoIterator<Item = Badge>) -> Vec<Badge> {
        let mut added = Vec::new();
        for badge in badges {
            if !self.contains(badge) {
                self.0.push(badge);
                added.push(badge);
            }
        }
        added
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

/// What just happened, with the records as they stood before it.
#[derive(Debug, Clone)]
pub enum BadgeEvent {
    TradeRecorded {
        pl: f64,
        prior_biggest_profit: f64,
        prior_high_water: f64,
        /// Results of the latest trades in the challenge before this one,
        /// newest first.
        prior_recent: Vec<f64>,
    },
    WeekFinalized {
        week_pl: f64,
        prior_best_week: f64,
    },
}

/// Badges the event earns that `unlocked` does not hold yet.
pub fn evaluate_badges(
    unlocked: &BadgeSet,
    account: &Account,
    stats: &Stats,
    event: &BadgeEvent,
) -> Vec<Badge> {
    let mut earned = Vec::new();

    match event {
        BadgeEvent::TradeRecorded {
            pl,
            prior_biggest_profit,
            prior_high_water,
            prior_recent,
        } => {
            let pl = *pl;
            if pl >= 100.0 {
                earned.push(Badge::FirstWin100);
            }
            if pl >= 1000.0 {
                earned.push(Badge::FirstWin1000);
            }
            if pl >= 5000.0 {
                earned.push(Badge::FirstWin5000);
            }

            let avg_win = stats.avg_win();
            if pl < 0.0 && stats.wins > 0 && pl.abs() < avg_win {
                earned.push(Badge::ControlledLoss);
            }

            if pl > 0.0 && prior_recent.len() >= 2 && prior_recent.iter().take(2).all(|p| *p > 0.0)
            {
                earned.push(Badge::WinStreak3);
            }

            if pl > *prior_biggest_profit {
                earned.push(Badge::BiggestWinRecord);
            }
            if account.balance > *prior_high_water {
                earned.push(Badge::NewHighWater);
            }
        }
        BadgeEvent::WeekFinalized {
            week_pl,
            prior_best_week,
        } => {
            if week_pl > prior_best_week {
                earned.push(Badge::NewBestWeek);
            }
        }
    }

    earned.extend(standing_badges(account, stats));

    let mut delta: Vec<Badge> = Vec::new();
    for badge in earned {
        if !unlocked.contains(badge) && !delta.contains(&badge) {
            delta.push(badge);
        }
    }
    delta
}

/// Badges that depend only on cumulative state.
fn standing_badges(account: &Account, stats: &Stats) -> Vec<Badge> {
    let mut earned = Vec::new();

    let pf = profit_factor(stats.sum_profit, stats.sum_loss_abs);
    if pf.at_least(2.0) {
        earned.push(Badge::ProfitFactor2);
    }
    if pf.at_least(3.0) {
        earned.push(Badge::ProfitFactor3);
    }

    let dd_pct = if account.high_water > 0.0 {
        stats.max_drawdown / account.high_water * 100.0
    } else {
        0.0
    };
    if dd_pct < 5.0 && stats.decided() >= DD5_MIN_DECIDED {
        earned.push(Badge::ControlledDd5);
    }
    if dd_pct < 2.0 && stats.decided() >= DD2_MIN_DECIDED {
        earned.push(Badge::ControlledDd2);
    }

    earned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade_event(pl: f64, prior_recent: Vec<f64>) -> BadgeEvent {
        BadgeEvent::TradeRecorded {
            pl,
            prior_biggest_profit: 10_000.0,
            prior_high_water: 1_000_000.0,
            prior_recent,
        }
    }

    fn losing_stats() -> Stats {
        // pf stays below 2 so standing badges stay quiet
        Stats {
            wins: 1,
            losses: 1,
            sum_profit: 100.0,
            sum_loss_abs: 100.0,
            max_drawdown: 100.0,
            mpi: 0,
        }
    }

    #[test]
    fn dollar_milestones_stack() {
        let account = Account::new(10_000.0);
        let delta = evaluate_badges(
            &BadgeSet::default(),
            &account,
            &losing_stats(),
            &trade_event(1500.0, vec![]),
        );
        assert!(delta.contains(&Badge::FirstWin100));
        assert!(delta.contains(&Badge::FirstWin1000));
        assert!(!delta.contains(&Badge::FirstWin5000));
    }

    #[test]
    fn controlled_loss_needs_a_win_on_record() {
        let account = Account::new(10_000.0);
        let mut stats = losing_stats();
        // avg win = 100, loss of 50 is controlled
        let delta = evaluate_badges(&BadgeSet::default(), &account, &stats, &trade_event(-50.0, vec![]));
        assert!(delta.contains(&Badge::ControlledLoss));

        stats.wins = 0;
        stats.sum_profit = 0.0;
        let delta = evaluate_badges(&BadgeSet::default(), &account, &stats, &trade_event(-50.0, vec![]));
        assert!(!delta.contains(&Badge::ControlledLoss));
    }

    #[test]
    fn win_streak_needs_two_prior_wins() {
        let account = Account::new(10_000.0);
        let stats = losing_stats();
        let set = BadgeSet::default();
        assert!(evaluate_badges(&set, &account, &stats, &trade_event(10.0, vec![5.0, 7.0]))
            .contains(&Badge::WinStreak3));
        assert!(!evaluate_badges(&set, &account, &stats, &trade_event(10.0, vec![5.0, -7.0]))
            .contains(&Badge::WinStreak3));
        assert!(!evaluate_badges(&set, &account, &stats, &trade_event(10.0, vec![5.0]))
            .contains(&Badge::WinStreak3));
        assert!(!evaluate_badges(&set, &account, &stats, &trade_event(-10.0, vec![5.0, 7.0]))
            .contains(&Badge::WinStreak3));
    }

    #[test]
    fn drawdown_badges_gated_on_sample_size() {
        let account = Account::new(10_000.0);
        let mut stats = Stats {
            wins: 5,
            losses: 4,
            sum_profit: 100.0,
            sum_loss_abs: 100.0,
            max_drawdown: 10.0,
            mpi: 0,
        };
        let event = BadgeEvent::WeekFinalized {
            week_pl: 0.0,
            prior_best_week: 0.0,
        };
        assert!(evaluate_badges(&BadgeSet::default(), &account, &stats, &event).is_empty());

        stats.losses = 5;
        let delta = evaluate_badges(&BadgeSet::default(), &account, &stats, &event);
        assert_eq!(delta, vec![Badge::ControlledDd5]);

        stats.wins = 15;
        let delta = evaluate_badges(&BadgeSet::default(), &account, &stats, &event);
        assert!(delta.contains(&Badge::ControlledDd5));
        assert!(delta.contains(&Badge::ControlledDd2));
    }

    #[test]
    fn profit_factor_badges() {
        let account = Account::new(10_000.0);
        let stats = Stats {
            wins: 3,
            losses: 1,
            sum_profit: 300.0,
            sum_loss_abs: 100.0,
            max_drawdown: 100.0,
            mpi: 0,
        };
        let delta = evaluate_badges(&BadgeSet::default(), &account, &stats, &trade_event(1.0, vec![]));
        assert!(delta.contains(&Badge::ProfitFactor2));
        assert!(delta.contains(&Badge::ProfitFactor3));
    }

    #[test]
    fn best_week_only_when_beaten() {
        let account = Account::new(10_000.0);
        let stats = losing_stats();
        let beaten = BadgeEvent::WeekFinalized {
            week_pl: 500.0,
            prior_best_week: 300.0,
        };
        let tied = BadgeEvent::WeekFinalized {
            week_pl: 300.0,
            prior_best_week: 300.0,
        };
        assert_eq!(
            evaluate_badges(&BadgeSet::default(), &account, &stats, &beaten),
            vec![Badge::NewBestWeek]
        );
        assert!(evaluate_badges(&BadgeSet::default(), &account, &stats, &tied).is_empty());
    }

    #[test]
    fn merge_is_idempotent() {
        let mut set = BadgeSet::default();
        assert_eq!(
            set.merge([Badge::NewHighWater, Badge::FirstWin100]),
            vec![Badge::NewHighWater, Badge::FirstWin100]
        );
        assert!(set.merge([Badge::NewHighWater, Badge::FirstWin100]).is_empty());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn already_unlocked_badges_are_not_reported() {
        let account = Account::new(10_000.0);
        let mut set = BadgeSet::default();
        set.merge([Badge::FirstWin100]);
        let delta = evaluate_badges(&set, &account, &losing_stats(), &trade_event(150.0, vec![]));
        assert!(!delta.contains(&Badge::FirstWin100));
    }

    #[test]
    fn keys_serialize_as_stored_strings() {
        let mut set = BadgeSet::default();
        set.merge([Badge::ControlledDd5, Badge::NewBestWeek]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["controlledDD5","newBestWeek"]"#);
        assert_eq!(Badge::ControlledDd5.key(), "controlledDD5");
    }
}
