use crate::config::Config;
use crate::models::{AppData, UserProfile};
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub default_price_per_unit: f64,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(config: &Config, data: AppData) -> Self {
        Self {
            data_path: config.data_path.clone(),
            default_price_per_unit: config.default_price_per_unit,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Profile given to a user the first time they show up.
    pub fn default_profile(&self, user_id: &str, today: NaiveDate) -> UserProfile {
        UserProfile {
            display_name: user_id.to_string(),
            price_per_unit: self.default_price_per_unit,
            start_date: today,
        }
    }
}
