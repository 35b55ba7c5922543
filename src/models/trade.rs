use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Direction, Grade};

/// Star rating at or above which a rule counts as followed.
pub const RULE_FOLLOWED_STARS: u8 = 4;

/// Raw trade form, exactly as the input layer collected it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInput {
    pub entry: String,
    pub stop: String,
    pub exit: String,
    /// Blank means "use the base risk from settings".
    #[serde(default)]
    pub risk_pct: String,
    pub grade: String,
    #[serde(default)]
    pub notes: String,
    pub strategy_stars: String,
    pub management_stars: String,
    pub risk_stars: String,
    pub plan_stars: String,
}

impl Default for TradeInput {
    fn default() -> Self {
        Self {
            entry: String::new(),
            stop: String::new(),
            exit: String::new(),
            risk_pct: String::new(),
            grade: "B".to_string(),
            notes: String::new(),
            strategy_stars: "3".to_string(),
            management_stars: "3".to_string(),
            risk_stars: "3".to_string(),
            plan_stars: "3".to_string(),
        }
    }
}

impl TradeInput {
    pub fn new(entry: impl ToString, stop: impl ToString, exit: impl ToString) -> Self {
        Self {
            entry: entry.to_string(),
            stop: stop.to_string(),
            exit: exit.to_string(),
            ..Self::default()
        }
    }

    pub fn with_risk(mut self, risk_pct: impl ToString) -> Self {
        self.risk_pct = risk_pct.to_string();
        self
    }

    pub fn with_grade(mut self, grade: impl ToString) -> Self {
        self.grade = grade.to_string();
        self
    }

    pub fn with_stars(mut self, strategy: u8, management: u8, risk: u8, plan: u8) -> Self {
        self.strategy_stars = strategy.to_string();
        self.management_stars = management.to_string();
        self.risk_stars = risk.to_string();
        self.plan_stars = plan.to_string();
        self
    }

    pub fn with_notes(mut self, notes: impl ToString) -> Self {
        self.notes = notes.to_string();
        self
    }
}

/// 1–5 star self ratings, one per rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRatings {
    pub strategy: u8,
    pub trade_management: u8,
    pub risk_management: u8,
    pub plan: u8,
}

impl RuleRatings {
    pub fn checks(&self) -> RuleChecks {
        RuleChecks {
            strategy: self.strategy >= RULE_FOLLOWED_STARS,
            trade_management: self.trade_management >= RULE_FOLLOWED_STARS,
            risk_management: self.risk_management >= RULE_FOLLOWED_STARS,
            plan: self.plan >= RULE_FOLLOWED_STARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleChecks {
    pub strategy: bool,
    pub trade_management: bool,
    pub risk_management: bool,
    pub plan: bool,
}

impl RuleChecks {
    pub fn all(&self) -> bool {
        self.strategy && self.trade_management && self.risk_management && self.plan
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Insertion order within the owning challenge, starting at 1.
    pub seq: u64,
    pub time: DateTime<Utc>,
    pub pair: String,
    pub direction: Direction,
    pub entry: f64,
    pub stop: f64,
    pub exit: f64,
    pub risk_pct: f64,
    pub grade: Grade,
    pub notes: String,
    pub ratings: RuleRatings,
    pub rules: RuleChecks,
    /// Risk above twice the base risk from settings.
    pub over_risk: bool,
    pub r_multiple: f64,
    pub pl: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pl > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.pl < 0.0
    }
}
