use crate::applications::{ShortlistError, StatusError};
use crate::config::ConfigError;
use crate::domain::InvalidStatus;
use crate::eligibility::ResolveError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Resolve(ResolveError),
    Status(StatusError),
    Shortlist(ShortlistError),
    InvalidStatus(InvalidStatus),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Resolve(err) => write!(f, "eligibility error: {}", err),
            AppError::Status(err) => write!(f, "status update error: {}", err),
            AppError::Shortlist(err) => write!(f, "shortlist error: {}", err),
            AppError::InvalidStatus(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Resolve(err) => Some(err),
            AppError::Status(err) => Some(err),
            AppError::Shortlist(err) => Some(err),
            AppError::InvalidStatus(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Resolve(ResolveError::ProfileNotFound)
            | AppError::Resolve(ResolveError::Store(StoreError::NotFound))
            | AppError::Status(StatusError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Resolve(ResolveError::Store(StoreError::Unavailable(_)))
            | AppError::Status(StatusError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Shortlist(_) | AppError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "success": false, "message": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ResolveError> for AppError {
    fn from(value: ResolveError) -> Self {
        Self::Resolve(value)
    }
}

impl From<StatusError> for AppError {
    fn from(value: StatusError) -> Self {
        Self::Status(value)
    }
}

impl From<ShortlistError> for AppError {
    fn from(value: ShortlistError) -> Self {
        Self::Shortlist(value)
    }
}

impl From<InvalidStatus> for AppError {
    fn from(value: InvalidStatus) -> Self {
        Self::InvalidStatus(value)
    }
}
