use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_STARTING_BALANCE: f64 = 10_000.0;
pub const DEFAULT_BASE_RISK_PCT: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Storage
    pub data_dir: String,
    pub store_key: String,

    // Fresh-profile defaults
    pub starting_balance: f64,
    pub base_risk_pct: f64,

    // Calendar
    pub timezone: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            data_dir: env("BACKLOGGER_DATA_DIR", "data"),
            store_key: env("BACKLOGGER_STORE_KEY", "backlogger"),
            starting_balance: env("STARTING_BALANCE", "10000")
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite() && *v > 0.0)
                .unwrap_or(DEFAULT_STARTING_BALANCE),
            base_risk_pct: env("BASE_RISK_PCT", "1")
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite() && *v > 0.0)
                .unwrap_or(DEFAULT_BASE_RISK_PCT),
            timezone: env("TIMEZONE", "UTC"),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    /// Path of the snapshot file for this profile.
    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(format!("{}.json", self.store_key))
    }

    /// Configured zone, UTC when the name does not parse.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    /// Today's calendar date in the configured zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz()).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::default_test_config;

    #[test]
    fn snapshot_path_uses_store_key() {
        let mut cfg = default_test_config();
        cfg.data_dir = "somewhere".to_string();
        cfg.store_key = "profile".to_string();
        assert_eq!(cfg.snapshot_path(), PathBuf::from("somewhere/profile.json"));
    }

    #[test]
    fn bad_timezone_falls_back_to_utc() {
        let mut cfg = default_test_config();
        cfg.timezone = "Mars/Olympus_Mons".to_string();
        assert_eq!(cfg.tz(), Tz::UTC);

        cfg.timezone = "America/New_York".to_string();
        assert_eq!(cfg.tz(), chrono_tz::America::New_York);
    }
}
