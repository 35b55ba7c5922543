use chrono::{DateTime, NaiveDate, Utc};

use backlogger::config::Config;
use backlogger::journal::Journal;
use backlogger::store::MemoryStore;

/// 2024-01-17, a Wednesday.
pub fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
}

pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-17T15:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn test_config() -> Config {
    let mut cfg = Config::from_env();
    cfg.starting_balance = 10_000.0;
    cfg.base_risk_pct = 1.0;
    cfg.timezone = "UTC".to_string();
    cfg.data_dir = std::env::temp_dir()
        .join(format!("backlogger_integ_{}", std::process::id()))
        .to_string_lossy()
        .to_string();
    cfg
}

pub fn memory_journal() -> Journal<MemoryStore> {
    Journal::open(MemoryStore::new(), test_config())
}
