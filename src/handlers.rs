use crate::errors::AppError;
use crate::insights::{mood_series, savings_breakdown};
use crate::models::{
    AppData, CheckIn, CheckInRequest, CheckInResponse, CheckInStatus, DashboardQuery, MonthQuery,
    MoodPoint, ProfileUpdate, SavingsResponse, Stats, TodayResponse, UserProfile,
};
use crate::state::AppState;
use crate::stats::{compute_stats, compute_stats_at};
use crate::storage::persist_data;
use crate::ui::{render_index, DashboardView};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{DateTime, Local, Utc};
use tracing::{error, info, warn};

pub const DEFAULT_USER: &str = "default";
pub const MAX_UNITS_AVOIDED: f64 = 100.0;
pub const MAX_MOOD_INDEX: u8 = 4;
pub const MAX_NOTES_CHARS: usize = 500;
pub const MAX_DISPLAY_NAME_CHARS: usize = 50;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, AppError> {
    let user_id = query
        .user
        .map(|user| user.trim().to_string())
        .filter(|user| !user.is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string());
    let now = Local::now();
    let today = now.date_naive();

    let mut data = state.data.lock().await;
    let stats = recompute_and_save(&state, &mut data, &user_id, &now).await?;
    let profile = profile_or_default(&state, &data, &user_id);
    let today_check_in = data.check_in_for_date(&user_id, today).cloned();

    Ok(Html(render_index(&DashboardView {
        user_id: &user_id,
        today,
        profile: &profile,
        stats: &stats,
        savings: &savings_breakdown(&stats),
        today_check_in: today_check_in.as_ref(),
    })))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Stats>, AppError> {
    let mut data = state.data.lock().await;
    let stats = recompute_and_save(&state, &mut data, &user_id, &Local::now()).await?;
    Ok(Json(stats))
}

pub async fn list_check_ins(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<CheckIn>> {
    let data = state.data.lock().await;
    Json(data.fetch_all_check_ins(&user_id))
}

pub async fn month_check_ins(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CheckIn>>, AppError> {
    let data = state.data.lock().await;
    let check_ins = data.fetch_check_ins_for_month(&user_id, query.year, query.month)?;
    Ok(Json(check_ins))
}

pub async fn get_today(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<TodayResponse> {
    let date = Local::now().date_naive();
    let data = state.data.lock().await;
    let check_in = data.check_in_for_date(&user_id, date).cloned();

    Json(TodayResponse {
        date,
        can_check_in: check_in.is_none(),
        check_in,
    })
}

pub async fn submit_check_in(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<CheckInResponse>), AppError> {
    let now = Local::now();
    let check_in = build_check_in(payload, now.date_naive(), now.with_timezone(&Utc))
        .inspect_err(|err| warn!(user_id = %user_id, "rejected check-in: {}", err.message))?;

    let mut data = state.data.lock().await;
    let snapshot = data.users.get(&user_id).cloned();
    let default_profile = state.default_profile(&user_id, now.date_naive());
    data.insert_check_in(&user_id, check_in.clone(), || default_profile)
        .inspect_err(|err| warn!(user_id = %user_id, "rejected check-in: {err}"))?;

    let stats = match recompute_and_save(&state, &mut data, &user_id, &now).await {
        Ok(stats) => stats,
        Err(err) => {
            // the document must keep matching the file, or a retry would hit 409
            data.restore_user(&user_id, snapshot);
            error!(user_id = %user_id, "check-in not stored: {}", err.message);
            return Err(err);
        }
    };
    info!(
        user_id = %user_id,
        status = ?check_in.status,
        current_streak = stats.current_streak,
        "check-in recorded"
    );

    Ok((StatusCode::CREATED, Json(CheckInResponse { check_in, stats })))
}

pub async fn get_mood(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<MoodPoint>> {
    let data = state.data.lock().await;
    Json(mood_series(&data.fetch_all_check_ins(&user_id)))
}

pub async fn get_savings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SavingsResponse>, AppError> {
    let data = state.data.lock().await;
    let price = profile_or_default(&state, &data, &user_id).price_per_unit;
    let stats = compute_stats(&data.fetch_all_check_ins(&user_id), price)?;
    Ok(Json(savings_breakdown(&stats)))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<UserProfile> {
    let data = state.data.lock().await;
    Json(profile_or_default(&state, &data, &user_id))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    if let Some(price) = update.price_per_unit {
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::bad_request("price_per_unit must be at least 0"));
        }
    }
    let display_name = match update.display_name.as_deref().map(str::trim) {
        Some("") => return Err(AppError::bad_request("display_name must not be empty")),
        Some(name) if name.chars().count() > MAX_DISPLAY_NAME_CHARS => {
            return Err(AppError::bad_request(format!(
                "display_name must be at most {MAX_DISPLAY_NAME_CHARS} characters"
            )));
        }
        other => other.map(str::to_string),
    };

    let now = Local::now();
    let mut data = state.data.lock().await;
    let snapshot = data.users.get(&user_id).cloned();
    let default_profile = state.default_profile(&user_id, now.date_naive());
    let profile = {
        let user = data.user_or_insert_with(&user_id, || default_profile);
        if let Some(name) = display_name {
            user.profile.display_name = name;
        }
        if let Some(price) = update.price_per_unit {
            user.profile.price_per_unit = price;
        }
        user.profile.clone()
    };

    // money saved depends on the price, so the stats are rebuilt
    if let Err(err) = recompute_and_save(&state, &mut data, &user_id, &now).await {
        data.restore_user(&user_id, snapshot);
        error!(user_id = %user_id, "profile not stored: {}", err.message);
        return Err(err);
    }
    info!(user_id = %user_id, price_per_unit = profile.price_per_unit, "profile updated");

    Ok(Json(profile))
}

/// Rebuilds the user's stats from their full history and stores the snapshot.
/// Users with nothing stored yet get fresh stats without creating a record.
async fn recompute_and_save(
    state: &AppState,
    data: &mut AppData,
    user_id: &str,
    now: &DateTime<Local>,
) -> Result<Stats, AppError> {
    let price = profile_or_default(state, data, user_id).price_per_unit;
    let stats = compute_stats_at(&data.fetch_all_check_ins(user_id), price, now)?;

    if data.save_stats(user_id, stats.clone()) {
        persist_data(&state.data_path, data).await?;
    }

    Ok(stats)
}

fn profile_or_default(state: &AppState, data: &AppData, user_id: &str) -> UserProfile {
    data.profile(user_id)
        .cloned()
        .unwrap_or_else(|| state.default_profile(user_id, Local::now().date_naive()))
}

fn build_check_in(
    payload: CheckInRequest,
    date: chrono::NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<CheckIn, AppError> {
    if payload.mood_index > MAX_MOOD_INDEX {
        return Err(AppError::bad_request(format!(
            "mood_index must be at most {MAX_MOOD_INDEX}"
        )));
    }

    let units_avoided = match payload.status {
        CheckInStatus::Success => {
            let units = payload.units_avoided;
            if !units.is_finite() || units < 0.0 {
                return Err(AppError::bad_request("units_avoided must be at least 0"));
            }
            if units > MAX_UNITS_AVOIDED {
                return Err(AppError::bad_request(format!(
                    "units_avoided must be at most {MAX_UNITS_AVOIDED}"
                )));
            }
            units
        }
        CheckInStatus::Slip => 0.0,
    };

    Ok(CheckIn {
        date,
        status: payload.status,
        mood_index: payload.mood_index,
        units_avoided,
        notes: truncate_notes(payload.notes.as_deref().unwrap_or_default()),
        created_at,
    })
}

fn truncate_notes(notes: &str) -> String {
    notes
        .chars()
        .take(MAX_NOTES_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
