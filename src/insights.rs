use crate::models::{CheckIn, Comparison, MoodPoint, SavingsResponse, Stats};

pub const SAVINGS_GOAL: f64 = 200.0;
pub const MOOD_WINDOW: usize = 14;
const PROJECTION_DAYS: f64 = 31.0;

const COMPARISONS: [(&str, f64); 4] = [
    ("Coffees", 4.0),
    ("Movie tickets", 12.0),
    ("Nice meals", 15.0),
    ("Concert tickets", 50.0),
];

/// Savings breakdown shown next to the money total. Values stay unrounded.
pub fn savings_breakdown(stats: &Stats) -> SavingsResponse {
    let saved = stats.total_money_saved;

    let comparisons = COMPARISONS
        .iter()
        .map(|(item, cost)| Comparison {
            item: (*item).to_string(),
            amount: (saved / cost).floor() as u64,
        })
        .filter(|comparison| comparison.amount > 0)
        .collect();

    let projection_31_days = (stats.current_streak > 0)
        .then(|| PROJECTION_DAYS / f64::from(stats.current_streak) * saved);

    SavingsResponse {
        total_money_saved: saved,
        total_units_avoided: stats.total_units_avoided,
        goal: SAVINGS_GOAL,
        progress_percent: (saved * 100.0 / SAVINGS_GOAL).min(100.0),
        comparisons,
        projection_31_days,
    }
}

/// Most recent check-ins in chronological order, mood on a 1-5 scale.
pub fn mood_series(newest_first: &[CheckIn]) -> Vec<MoodPoint> {
    newest_first
        .iter()
        .take(MOOD_WINDOW)
        .rev()
        .map(|check_in| MoodPoint {
            date: check_in.date,
            mood: check_in.mood_index + 1,
            emoji: check_in.mood_emoji().to_string(),
        })
        .collect()
}
