use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppData>(&bytes) {
            Ok(data) => {
                info!(users = data.users.len(), "loaded {}", path.display());
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write data file {}: {err}", path.display());
        AppError::internal(err)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckIn, CheckInStatus, UserProfile};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("habit_tracker_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn persisted_document_loads_back() {
        let path = temp_path("roundtrip");
        let date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let mut data = AppData::default();
        data.insert_check_in(
            "sam",
            CheckIn {
                date,
                status: CheckInStatus::Slip,
                mood_index: 0,
                units_avoided: 0.0,
                notes: "rough day".to_string(),
                created_at: Utc.with_ymd_and_hms(2026, 2, 2, 21, 0, 0).unwrap(),
            },
            || UserProfile {
                display_name: "sam".to_string(),
                price_per_unit: 4.0,
                start_date: date,
            },
        )
        .unwrap();

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.fetch_all_check_ins("sam"), data.fetch_all_check_ins("sam"));
        assert_eq!(loaded.profile("sam").map(|p| p.price_per_unit), Some(4.0));
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_starts_empty() {
        let missing = temp_path("missing");
        assert!(load_data(&missing).await.users.is_empty());

        let corrupt = temp_path("corrupt");
        std::fs::write(&corrupt, b"{ not json").unwrap();
        let loaded = load_data(&corrupt).await;
        let _ = std::fs::remove_file(&corrupt);
        assert!(loaded.users.is_empty());
    }
}
