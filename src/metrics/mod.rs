pub mod level;
pub mod score;

pub use level::{derive_level, LevelInfo, LEVELS};
pub use score::{composite_score, profit_factor, win_rate, ProfitFactor, PF_CAP};

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
