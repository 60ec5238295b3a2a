use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

use crate::sources::SourceError;

/// Reasons a set of bars cannot form a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("Bar at index {index} is dated before its predecessor")]
    UnorderedDates { index: usize },

    #[error("Duplicate bar date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("Series contains no bars")]
    Empty,
}

impl SeriesError {
    pub(crate) fn invalid_bar(index: usize, reason: impl Into<String>) -> Self {
        SeriesError::InvalidBar {
            index,
            reason: reason.into(),
        }
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Series(_) => StatusCode::BAD_REQUEST,
            AppError::Source(SourceError::Series(_)) => StatusCode::BAD_REQUEST,
            AppError::Source(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
