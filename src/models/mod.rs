pub mod account;
pub mod challenge;
pub mod direction;
pub mod report;
pub mod trade;

pub use account::{Account, Settings, Stats};
pub use challenge::{week_start, Challenge, Day, Weekday, DAYS_PER_WEEK};
pub use direction::*;
pub use report::{DaySummary, GradeDistribution, RuleAdherence, WeeklyReport};
pub use trade::{RuleChecks, RuleRatings, Trade, TradeInput, RULE_FOLLOWED_STARS};
