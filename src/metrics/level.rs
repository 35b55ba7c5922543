use serde::Serialize;

/// Ascending (name, minimum MPI) ladder.
pub const LEVELS: &[(&str, u32)] = &[
    ("Novice", 0),
    ("Apprentice", 200),
    ("Consistent", 500),
    ("Professional", 900),
    ("Elite", 1300),
    ("Master", 1800),
    ("Legend", 2400),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub name: &'static str,
    pub index: usize,
    /// Fraction of the way from this threshold to the next, 0 at the top.
    pub progress_to_next: f64,
    pub next: Option<&'static str>,
    /// Position on a bar where every level, the top one included, gets
    /// the same width, 0–100.
    pub cumulative_pct: f64,
}

pub fn derive_level(score: u32) -> LevelInfo {
    let index = LEVELS
        .iter()
        .rposition(|&(_, min)| score >= min)
        .unwrap_or(0);
    let (name, min) = LEVELS[index];
    let segments = LEVELS.len() as f64;

    match LEVELS.get(index + 1) {
        Some(&(next_name, next_min)) => {
            let span = (next_min - min) as f64;
            let progress = ((score as f64 - min as f64) / span).clamp(0.0, 1.0);
            LevelInfo {
                name,
                index,
                progress_to_next: progress,
                next: Some(next_name),
                cumulative_pct: (index as f64 + progress) / segments * 100.0,
            }
        }
        None => LevelInfo {
            name,
            index,
            progress_to_next: 0.0,
            next: None,
            cumulative_pct: 100.0,
        },
    }
}
