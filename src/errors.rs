use axum::http::StatusCode;
use thiserror::Error;

use crate::models::HabitId;

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

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
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

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Busy => Self::conflict(err.to_string()),
            DashboardError::Interrupted(_) => Self::internal(err),
            DashboardError::UnknownHabit(_)
            | DashboardError::DayOutOfRange { .. }
            | DashboardError::Validation(_) => Self::bad_request(err.to_string()),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self::bad_gateway(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failures talking to the habit backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    /// The backend answered but did not report success.
    #[error("request rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend served a dashboard the controller cannot track.
    #[error("invalid dashboard: {0}")]
    InvalidPage(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a habit name")]
    EmptyName,
    #[error("Habit name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Interactions the controller refuses before any request is sent, plus a
/// request task that died before settling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("unknown habit {0}")]
    UnknownHabit(HabitId),
    #[error("day {day} is outside 1..={current_day}")]
    DayOutOfRange { day: u32, current_day: u32 },
    #[error("a request for this control is already in flight")]
    Busy,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request task stopped: {0}")]
    Interrupted(String),
}

impl From<tokio::task::JoinError> for DashboardError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Interrupted(err.to_string())
    }
}
