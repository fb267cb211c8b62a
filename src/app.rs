use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/users/:user_id/stats", get(handlers::get_stats))
        .route(
            "/api/users/:user_id/check-ins",
            get(handlers::list_check_ins).post(handlers::submit_check_in),
        )
        .route("/api/users/:user_id/check-ins/month", get(handlers::month_check_ins))
        .route("/api/users/:user_id/check-ins/today", get(handlers::get_today))
        .route("/api/users/:user_id/mood", get(handlers::get_mood))
        .route("/api/users/:user_id/savings", get(handlers::get_savings))
        .route(
            "/api/users/:user_id/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .with_state(state)
}
