use axum::http::StatusCode;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("invalid check-in on {date}: {reason}")]
    InvalidRecord { date: NaiveDate, reason: String },
    #[error("price per unit must be a non-negative number, got {0}")]
    InvalidPrice(f64),
}

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("already checked in on {0}")]
    AlreadyCheckedIn(NaiveDate),
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

// stored history the engine rejects means the data file is corrupt
impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        Self::internal(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyCheckedIn(_) => Self::conflict(err.to_string()),
            StoreError::InvalidMonth { .. } => Self::bad_request(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
