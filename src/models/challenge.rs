use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Trade;

pub const DAYS_PER_WEEK: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; DAYS_PER_WEEK] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub key: Weekday,
    pub date: NaiveDate,
    /// Newest first.
    pub trades: Vec<Trade>,
    /// Descriptive only; trades may still be recorded on a no-trade day.
    pub no_trade: bool,
}

impl Day {
    pub fn pl(&self) -> f64 {
        self.trades.iter().map(|t| t.pl).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub strategy: String,
    pub pair: String,
    pub week_id: u16,
    pub week_start: NaiveDate,
    pub days: Vec<Day>,
    pub day_index: usize,
    pub trade_counter: u64,
}

impl Challenge {
    /// Builds the Monday–Friday window containing `date`.
    pub fn new(strategy: &str, pair: &str, week_id: u16, date: NaiveDate) -> Self {
        let monday = week_start(date);
        let days = Weekday::ALL
            .iter()
            .enumerate()
            .map(|(i, &key)| Day {
                key,
                date: monday + Duration::days(i as i64),
                trades: Vec::new(),
                no_trade: false,
            })
            .collect();

        Self {
            strategy: strategy.to_string(),
            pair: pair.to_string(),
            week_id,
            week_start: monday,
            days,
            day_index: 0,
            trade_counter: 0,
        }
    }

    /// Five days and a day index that points at one of them.
    pub fn is_well_formed(&self) -> bool {
        self.days.len() == DAYS_PER_WEEK && self.day_index < self.days.len()
    }

    pub fn current_day(&self) -> &Day {
        &self.days[self.day_index]
    }

    /// Monday to Friday, each day's trades newest first.
    pub fn all_trades(&self) -> impl Iterator<Item = &Trade> {
        self.days.iter().flat_map(|d| d.trades.iter())
    }

    /// The `n` latest trades across every day, newest first.
    pub fn recent_trades(&self, n: usize) -> Vec<&Trade> {
        let mut trades: Vec<&Trade> = self.all_trades().collect();
        trades.sort_by(|a, b| b.seq.cmp(&a.seq));
        trades.truncate(n);
        trades
    }

    pub fn trade_count(&self) -> usize {
        self.days.iter().map(|d| d.trades.len()).sum()
    }

    pub fn week_pl(&self) -> f64 {
        self.days.iter().map(Day::pl).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_snaps_to_monday() {
        // 2024-01-17 is a Wednesday
        assert_eq!(week_start(date(2024, 1, 17)), date(2024, 1, 15));
        assert_eq!(week_start(date(2024, 1, 15)), date(2024, 1, 15));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(date(2024, 1, 21)), date(2024, 1, 15));
    }

    #[test]
    fn new_challenge_has_five_weekdays() {
        let c = Challenge::new("ICT", "EURUSD", 1234, date(2024, 1, 19));
        assert_eq!(c.days.len(), DAYS_PER_WEEK);
        assert_eq!(c.week_start, date(2024, 1, 15));
        assert_eq!(c.days[0].key, Weekday::Monday);
        assert_eq!(c.days[4].key, Weekday::Friday);
        assert_eq!(c.days[4].date, date(2024, 1, 19));
        assert_eq!(c.day_index, 0);
        assert!(c.days.iter().all(|d| d.trades.is_empty() && !d.no_trade));
    }
}
