use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MOOD_EMOJIS: [&str; 5] = ["😔", "😐", "😊", "😤", "🎉"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStatus {
    Success,
    Slip,
}

impl CheckInStatus {
    pub fn is_success(self) -> bool {
        matches!(self, CheckInStatus::Success)
    }
}

/// One daily record. Stored records are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub date: NaiveDate,
    pub status: CheckInStatus,
    pub mood_index: u8,
    pub units_avoided: f64,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl CheckIn {
    pub fn mood_emoji(&self) -> &'static str {
        MOOD_EMOJIS
            .get(usize::from(self.mood_index))
            .copied()
            .unwrap_or("")
    }
}

/// Derived snapshot, always recomputed in full from the check-in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_days_completed: u32,
    pub total_units_avoided: f64,
    pub total_money_saved: f64,
    pub last_check_in_date: Option<NaiveDate>,
    pub computed_at: DateTime<Utc>,
}

impl Stats {
    pub fn empty(computed_at: DateTime<Utc>) -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_days_completed: 0,
            total_units_avoided: 0.0,
            total_money_saved: 0.0,
            last_check_in_date: None,
            computed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub price_per_unit: f64,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub profile: UserProfile,
    #[serde(default)]
    pub check_ins: Vec<CheckIn>,
    #[serde(default)]
    pub stats: Option<Stats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub users: BTreeMap<String, UserRecord>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub status: CheckInStatus,
    pub mood_index: u8,
    #[serde(default)]
    pub units_avoided: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub check_in: CheckIn,
    pub stats: Stats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub can_check_in: bool,
    pub check_in: Option<CheckIn>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub price_per_unit: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoodPoint {
    pub date: NaiveDate,
    pub mood: u8,
    pub emoji: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Comparison {
    pub item: String,
    pub amount: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavingsResponse {
    pub total_money_saved: f64,
    pub total_units_avoided: f64,
    pub goal: f64,
    pub progress_percent: f64,
    pub comparisons: Vec<Comparison>,
    pub projection_31_days: Option<f64>,
}
