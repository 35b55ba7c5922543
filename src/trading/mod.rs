pub mod badges;
pub mod challenge;
pub mod ledger;
pub mod report;

pub use badges::{evaluate_badges, Badge, BadgeEvent, BadgeSet};
pub use challenge::{advance_day, finalize_week, mark_no_trade, start_challenge, ChallengeState};
pub use ledger::{parse_trade, r_multiple, record_trade, ParsedTrade, Recorded};
pub use report::build_report;
