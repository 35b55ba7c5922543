use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_BASE_RISK_PCT, DEFAULT_STARTING_BALANCE};
use crate::error::ValidationError;
use crate::metrics::{composite_score, derive_level, profit_factor, win_rate, LevelInfo, ProfitFactor};
use crate::models::{Account, Challenge, Settings, Stats, Trade, TradeInput, WeeklyReport};
use crate::trading::{self, evaluate_badges, Badge, BadgeEvent, BadgeSet, ChallengeState};

/// A reset is only worth it when the starting balance moves by more than this.
pub const RESET_MIN_BALANCE_CHANGE: f64 = 1000.0;

/// Raw settings form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsInput {
    pub starting_balance: String,
    pub base_risk_pct: String,
}

/// Everything about one profile. This is the only thing that gets saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub settings: Settings,
    pub account: Account,
    pub stats: Stats,
    pub badges: BadgeSet,
    /// Newest first.
    pub reports: Vec<WeeklyReport>,
    pub current_challenge: Option<Challenge>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let mut session = Self {
            account: Account::new(settings.starting_balance),
            settings,
            stats: Stats::default(),
            badges: BadgeSet::default(),
            reports: Vec::new(),
            current_challenge: None,
        };
        session.refresh_score();
        session
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Settings {
            starting_balance: cfg.starting_balance,
            base_risk_pct: cfg.base_risk_pct,
        })
    }

    pub fn state(&self) -> ChallengeState {
        ChallengeState::of(&self.current_challenge)
    }

    /// Starts a week with a random 4-digit id.
    pub fn start_challenge(&mut self, strategy: &str, pair: &str, date: NaiveDate) -> Option<&Challenge> {
        let week_id = rand::thread_rng().gen_range(1000..10000);
        self.start_challenge_with_id(strategy, pair, date, week_id)
    }

    pub fn start_challenge_with_id(
        &mut self,
        strategy: &str,
        pair: &str,
        date: NaiveDate,
        week_id: u16,
    ) -> Option<&Challenge> {
        trading::start_challenge(&mut self.current_challenge, strategy, pair, date, week_id)
    }

    /// Records a trade on the active day.
    pub fn record_trade(
        &mut self,
        input: &TradeInput,
        now: DateTime<Utc>,
    ) -> Result<Option<Trade>, ValidationError> {
        let Some(day_index) = self.current_challenge.as_ref().map(|c| c.day_index) else {
            warn!("Trade declined: no active challenge");
            return Ok(None);
        };
        self.record_trade_on(day_index, input, now)
    }

    pub fn record_trade_on(
        &mut self,
        day_index: usize,
        input: &TradeInput,
        now: DateTime<Utc>,
    ) -> Result<Option<Trade>, ValidationError> {
        let Some(challenge) = self.current_challenge.as_mut() else {
            warn!("Trade declined: no active challenge");
            return Ok(None);
        };

        let recorded = trading::record_trade(
            challenge,
            day_index,
            &mut self.account,
            &mut self.stats,
            &self.settings,
            input,
            now,
        )?;

        Ok(recorded.map(|r| {
            self.refresh_score();
            self.award(&r.event);
            r.trade
        }))
    }

    pub fn advance_day(&mut self) -> Option<usize> {
        match self.current_challenge.as_mut() {
            Some(challenge) => Some(trading::advance_day(challenge)),
            None => {
                warn!("Advance declined: no active challenge");
                None
            }
        }
    }

    pub fn mark_no_trade(&mut self) -> bool {
        match self.current_challenge.as_mut() {
            Some(challenge) => {
                trading::mark_no_trade(challenge);
                true
            }
            None => {
                warn!("No-trade declined: no active challenge");
                false
            }
        }
    }

    /// Finalizes the active week and returns its report, now at the head
    /// of `reports`.
    pub fn end_week(&mut self, now: DateTime<Utc>) -> Option<&WeeklyReport> {
        let (report, event) = trading::finalize_week(
            &mut self.current_challenge,
            &mut self.account,
            &self.stats,
            now,
        )?;
        self.reports.insert(0, report);
        self.refresh_score();
        self.award(&event);
        self.reports.first()
    }

    /// Blank, unparseable or non-positive values fall back to the
    /// built-in defaults. History is only wiped when `reset_account` is
    /// set, no week is open and the new starting balance is more than
    /// `RESET_MIN_BALANCE_CHANGE` away from the current balance.
    pub fn save_settings(&mut self, input: &SettingsInput, reset_account: bool) -> &Settings {
        let positive = |raw: &str, default: f64| -> f64 {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(default)
        };
        self.settings = Settings {
            starting_balance: positive(&input.starting_balance, DEFAULT_STARTING_BALANCE),
            base_risk_pct: positive(&input.base_risk_pct, DEFAULT_BASE_RISK_PCT),
        };

        if reset_account {
            let change = (self.settings.starting_balance - self.account.balance).abs();
            if self.current_challenge.is_some() {
                warn!("Account reset declined: finalize the open week first");
            } else if change <= RESET_MIN_BALANCE_CHANGE {
                warn!(
                    "Account reset declined: balance is within ${:.0} of the new start",
                    RESET_MIN_BALANCE_CHANGE
                );
            } else {
                self.account = Account::new(self.settings.starting_balance);
                self.stats = Stats::default();
                self.badges.clear();
                self.refresh_score();
                info!(
                    "Account reset to ${:.0}",
                    self.settings.starting_balance
                );
            }
        }
        &self.settings
    }

    fn refresh_score(&mut self) {
        self.stats.mpi = composite_score(&self.stats, self.account.high_water);
    }

    fn award(&mut self, event: &BadgeEvent) -> Vec<Badge> {
        let delta = evaluate_badges(&self.badges, &self.account, &self.stats, event);
        let added = self.badges.merge(delta);
        for badge in &added {
            debug!("Badge unlocked: {} ({})", badge.label(), badge.key());
        }
        added
    }

    pub fn profit_factor(&self) -> ProfitFactor {
        profit_factor(self.stats.sum_profit, self.stats.sum_loss_abs)
    }

    pub fn level(&self) -> LevelInfo {
        derive_level(self.stats.mpi)
    }

    /// Trades of the active challenge's current day, newest first.
    pub fn current_trades(&self) -> &[Trade] {
        self.current_challenge
            .as_ref()
            .map(|c| c.current_day().trades.as_slice())
            .unwrap_or(&[])
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            balance: self.account.balance,
            equity: self.account.equity,
            daily_pl: self.account.daily_pl,
            weekly_pl: self.account.weekly_pl,
            profit_factor: self.profit_factor(),
            win_rate_pct: win_rate(self.stats.wins, self.stats.losses) * 100.0,
            max_drawdown: self.stats.max_drawdown,
            mpi: self.stats.mpi,
            level: self.level(),
            biggest_profit: self.account.biggest_profit,
            biggest_loss: self.account.biggest_loss.abs(),
            best_week: self.account.best_week,
            high_water: self.account.high_water,
            badges: self.badges.iter().map(|b| b.label()).collect(),
        }
    }

    pub fn records(&self) -> Vec<Record> {
        vec![
            Record::money("Highest Balance", self.account.high_water),
            Record::money("Biggest Profit (trade)", self.account.biggest_profit),
            Record::money("Biggest Loss (trade)", self.account.biggest_loss.abs()),
            Record::money("Best Week", self.account.best_week),
            Record {
                label: "MPI",
                value: self.stats.mpi.to_string(),
            },
        ]
    }
}

/// Read-only figures for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub balance: f64,
    pub equity: f64,
    pub daily_pl: f64,
    pub weekly_pl: f64,
    pub profit_factor: ProfitFactor,
    pub win_rate_pct: f64,
    pub max_drawdown: f64,
    pub mpi: u32,
    pub level: LevelInfo,
    pub biggest_profit: f64,
    /// Absolute value.
    pub biggest_loss: f64,
    pub best_week: f64,
    pub high_water: f64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub label: &'static str,
    pub value: String,
}

impl Record {
    fn money(label: &'static str, amount: f64) -> Self {
        Self {
            label,
            value: format!("${:.0}", amount),
        }
    }
}
