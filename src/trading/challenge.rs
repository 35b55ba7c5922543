use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::metrics::composite_score;
use crate::models::{Account, Challenge, Stats, WeeklyReport, DAYS_PER_WEEK};
use crate::trading::badges::BadgeEvent;
use crate::trading::report::build_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChallengeState {
    NoActiveChallenge,
    InProgress(usize),
}

impl ChallengeState {
    pub fn of(slot: &Option<Challenge>) -> Self {
        match slot {
            Some(c) => ChallengeState::InProgress(c.day_index),
            None => ChallengeState::NoActiveChallenge,
        }
    }
}

/// Opens a new week anchored on the Monday on or before `date`.
///
/// Declines when a challenge is already running or a label is blank.
pub fn start_challenge<'a>(
    slot: &'a mut Option<Challenge>,
    strategy: &str,
    pair: &str,
    date: NaiveDate,
    week_id: u16,
) -> Option<&'a Challenge> {
    if let Some(active) = slot.as_ref() {
        warn!(
            "Start declined: week {} is still open, finalize it first",
            active.week_id
        );
        return None;
    }
    let (strategy, pair) = (strategy.trim(), pair.trim());
    if strategy.is_empty() || pair.is_empty() {
        warn!("Start declined: strategy and pair are required");
        return None;
    }

    let challenge = Challenge::new(strategy, pair, week_id, date);
    info!(
        "Week {} started: {} on {} from {}",
        challenge.week_id, challenge.strategy, challenge.pair, challenge.week_start
    );
    Some(&*slot.insert(challenge))
}

/// Moves to the next weekday. Friday wraps back to Monday of the same
/// challenge; only an explicit finalize ends the week.
pub fn advance_day(challenge: &mut Challenge) -> usize {
    challenge.day_index = (challenge.day_index + 1) % DAYS_PER_WEEK;
    info!(
        "Week {} now on {}",
        challenge.week_id,
        challenge.current_day().key
    );
    challenge.day_index
}

pub fn mark_no_trade(challenge: &mut Challenge) {
    let index = challenge.day_index;
    let day = &mut challenge.days[index];
    day.no_trade = true;
    info!("Week {} {} marked as no-trade", challenge.week_id, day.key);
}

/// Closes the active challenge into a report, on any day of the week.
///
/// Resets the weekly and daily P/L, raises the best-week record, and
/// leaves the slot empty. Returns `None` when nothing is active.
pub fn finalize_week(
    slot: &mut Option<Challenge>,
    account: &mut Account,
    stats: &Stats,
    now: DateTime<Utc>,
) -> Option<(WeeklyReport, BadgeEvent)> {
    let Some(challenge) = slot.take() else {
        warn!("Finalize declined: no active challenge");
        return None;
    };

    let week_pl = challenge.week_pl();
    let prior_best_week = account.best_week;

    account.weekly_pl = 0.0;
    account.daily_pl = 0.0;
    if week_pl > account.best_week {
        account.best_week = week_pl;
    }

    let mpi = composite_score(stats, account.high_water);
    let report = build_report(&challenge, account.balance, mpi, now);
    info!(
        "Week {} finalized: {} trades, PnL {:+.0}, PF {}",
        report.week_id, report.total_trades, report.week_pl, report.profit_factor
    );

    Some((
        report,
        BadgeEvent::WeekFinalized {
            week_pl,
            prior_best_week,
        },
    ))
}
