use chrono::{DateTime, NaiveDate, Utc};

use crate::config::Config;
use crate::models::{Challenge, Direction, Grade, RuleRatings, Trade};

/// 2024-01-15, a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T14:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn test_challenge() -> Challenge {
    Challenge::new("ICT", "EURUSD", 1234, monday())
}

/// A stored trade with the given result, grade and star ratings
/// (strategy, management, risk, plan).
pub fn make_trade(seq: u64, pl: f64, grade: Grade, stars: [u8; 4]) -> Trade {
    let ratings = RuleRatings {
        strategy: stars[0],
        trade_management: stars[1],
        risk_management: stars[2],
        plan: stars[3],
    };
    Trade {
        seq,
        time: fixed_now(),
        pair: "EURUSD".to_string(),
        direction: Direction::Long,
        entry: 100.0,
        stop: 95.0,
        exit: 100.0 + pl / 20.0,
        risk_pct: 1.0,
        grade,
        notes: String::new(),
        ratings,
        rules: ratings.checks(),
        over_risk: false,
        r_multiple: pl / 100.0,
        pl,
    }
}

/// A Config suitable for testing — default profile, temp data dir.
pub fn default_test_config() -> Config {
    Config {
        data_dir: std::env::temp_dir()
            .join("backlogger_test")
            .to_string_lossy()
            .to_string(),
        store_key: "backlogger".to_string(),
        starting_balance: 10_000.0,
        base_risk_pct: 1.0,
        timezone: "UTC".to_string(),
        log_level: "ERROR".to_string(),
    }
}
