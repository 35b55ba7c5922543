use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::metrics::round2;
use crate::models::{
    Account, Challenge, Direction, Grade, RuleRatings, Settings, Stats, Trade, TradeInput,
};
use crate::trading::badges::BadgeEvent;

/// Risk above this multiple of the base risk is flagged.
const OVER_RISK_MULTIPLE: f64 = 2.0;
/// How many earlier trades the streak badge looks at.
const STREAK_LOOKBACK: usize = 2;

/// Numbers pulled out of a `TradeInput`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTrade {
    pub entry: f64,
    pub stop: f64,
    pub exit: f64,
    pub risk_pct: f64,
    pub grade: Grade,
    pub ratings: RuleRatings,
    pub notes: String,
}

/// A stored trade together with the records it may have broken.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub trade: Trade,
    pub event: BadgeEvent,
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_stars(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|s| (1..=5).contains(s))
}

/// Checks every field at once so the user sees all problems together.
pub fn parse_trade(input: &TradeInput, settings: &Settings) -> Result<ParsedTrade, ValidationError> {
    let mut bad = Vec::new();

    let mut number = |name: &str, raw: &str| -> f64 {
        parse_number(raw).unwrap_or_else(|| {
            bad.push(name.to_string());
            0.0
        })
    };
    let entry = number("entry", &input.entry);
    let stop = number("stop", &input.stop);
    let exit = number("exit", &input.exit);
    let risk_pct = if input.risk_pct.trim().is_empty() {
        settings.base_risk_pct
    } else {
        number("riskPct", &input.risk_pct)
    };

    let grade = Grade::parse(&input.grade);
    if grade.is_none() {
        bad.push("grade".to_string());
    }

    let mut stars = |name: &str, raw: &str| -> u8 {
        parse_stars(raw).unwrap_or_else(|| {
            bad.push(name.to_string());
            0
        })
    };
    let ratings = RuleRatings {
        strategy: stars("strategyStars", &input.strategy_stars),
        trade_management: stars("managementStars", &input.management_stars),
        risk_management: stars("riskStars", &input.risk_stars),
        plan: stars("planStars", &input.plan_stars),
    };

    match grade {
        Some(grade) if bad.is_empty() => Ok(ParsedTrade {
            entry,
            stop,
            exit,
            risk_pct,
            grade,
            ratings,
            notes: input.notes.trim().to_string(),
        }),
        _ => Err(ValidationError::InvalidFields(bad)),
    }
}

/// Signed R: result as a multiple of the entry-to-stop distance. Zero
/// distance gives zero.
pub fn r_multiple(direction: Direction, entry: f64, stop: f64, exit: f64) -> f64 {
    let risk_per_unit = (entry - stop).abs();
    if risk_per_unit == 0.0 {
        return 0.0;
    }
    match direction {
        Direction::Long => (exit - entry) / risk_per_unit,
        Direction::Short => (entry - exit) / risk_per_unit,
    }
}

/// Rejects a trade whose figures, or the account totals they would
/// produce, overflow `f64`. Nothing has been mutated yet when this runs.
fn check_finite(
    r: f64,
    risk_dollars: f64,
    pl: f64,
    account: &Account,
    stats: &Stats,
) -> Result<(), ValidationError> {
    let mut bad: Vec<String> = Vec::new();
    if !round2(r).is_finite() {
        bad.extend(["entry", "stop", "exit"].map(String::from));
    }
    if !risk_dollars.is_finite() {
        bad.push("riskPct".to_string());
    }
    if bad.is_empty() {
        let balance = account.balance + pl;
        let totals = [
            pl,
            balance,
            account.daily_pl + pl,
            account.weekly_pl + pl,
            account.high_water.max(balance) - balance,
            stats.sum_profit + pl.max(0.0),
            stats.sum_loss_abs - pl.min(0.0),
        ];
        if totals.iter().any(|v| !v.is_finite()) {
            bad.extend(["exit", "riskPct"].map(String::from));
        }
    }
    if bad.is_empty() {
        Ok(())
    } else {
        warn!("Trade rejected: result overflows for {}", bad.join(", "));
        Err(ValidationError::InvalidFields(bad))
    }
}

/// Prices a trade against the current balance, applies it to the account
/// and stats, and stores it at the head of the given day.
///
/// Returns `Ok(None)` without touching anything when `day_index` does not
/// address a day of the challenge.
#[allow(clippy::too_many_arguments)]
pub fn record_trade(
    challenge: &mut Challenge,
    day_index: usize,
    account: &mut Account,
    stats: &mut Stats,
    settings: &Settings,
    input: &TradeInput,
    now: DateTime<Utc>,
) -> Result<Option<Recorded>, ValidationError> {
    if day_index >= challenge.days.len() {
        warn!("Trade declined: no day {} in week {}", day_index, challenge.week_id);
        return Ok(None);
    }
    let parsed = parse_trade(input, settings)?;

    let direction = Direction::from_levels(parsed.entry, parsed.stop);
    let r = r_multiple(direction, parsed.entry, parsed.stop, parsed.exit);
    let risk_dollars = account.balance * (parsed.risk_pct / 100.0);
    let pl = (r * risk_dollars).round();
    check_finite(r, risk_dollars, pl, account, stats)?;

    let prior_recent: Vec<f64> = challenge
        .recent_trades(STREAK_LOOKBACK)
        .iter()
        .map(|t| t.pl)
        .collect();
    let prior_biggest_profit = account.biggest_profit;
    let prior_high_water = account.high_water;

    account.balance += pl;
    account.equity = account.balance;
    account.daily_pl += pl;
    account.weekly_pl += pl;

    if pl > 0.0 {
        stats.wins += 1;
        stats.sum_profit += pl;
    } else if pl < 0.0 {
        stats.losses += 1;
        stats.sum_loss_abs += pl.abs();
    }

    if pl > account.biggest_profit {
        account.biggest_profit = pl;
    }
    if pl < account.biggest_loss {
        account.biggest_loss = pl;
    }
    if account.balance > account.high_water {
        account.high_water = account.balance;
    }
    stats.max_drawdown = stats.max_drawdown.max(account.drawdown());

    challenge.trade_counter += 1;
    let trade = Trade {
        seq: challenge.trade_counter,
        time: now,
        pair: challenge.pair.clone(),
        direction,
        entry: parsed.entry,
        stop: parsed.stop,
        exit: parsed.exit,
        risk_pct: parsed.risk_pct,
        grade: parsed.grade,
        notes: parsed.notes,
        ratings: parsed.ratings,
        rules: parsed.ratings.checks(),
        over_risk: parsed.risk_pct > settings.base_risk_pct * OVER_RISK_MULTIPLE,
        r_multiple: round2(r),
        pl,
    };
    challenge.days[day_index].trades.insert(0, trade.clone());

    debug!(
        "Trade #{} {} {} {:.2}R pl={:+.0} balance={:.0}",
        trade.seq, trade.pair, trade.direction, trade.r_multiple, trade.pl, account.balance
    );

    Ok(Some(Recorded {
        trade,
        event: BadgeEvent::TradeRecorded {
            pl,
            prior_biggest_profit,
            prior_high_water,
            prior_recent,
        },
    }))
}
