use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shared::constants::SPIN_IN_PROGRESS_ERROR;
use shared::shared_wheel_game::WheelError;

#[derive(Debug)]
pub enum Error {
    Store(String),
    Wheel(WheelError),
    SpinInProgress,
    InvalidPlayer(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "History store error: {}", e),
            Error::Wheel(e) => write!(f, "Wheel error: {}", e),
            Error::SpinInProgress => write!(f, "{}", SPIN_IN_PROGRESS_ERROR),
            Error::InvalidPlayer(id) => write!(f, "Invalid player id: {}", id),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<WheelError> for Error {
    fn from(err: WheelError) -> Self {
        Error::Wheel(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "History store error".to_string()),
            Error::Wheel(e @ WheelError::InvalidAngle(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            Error::Wheel(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Wheel is misconfigured".to_string()),
            Error::SpinInProgress => (StatusCode::CONFLICT, SPIN_IN_PROGRESS_ERROR.to_string()),
            Error::InvalidPlayer(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error".to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
