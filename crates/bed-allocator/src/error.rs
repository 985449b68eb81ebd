use crate::allocation::{AllocationRequestError, AllocationServiceError};
use crate::config::ConfigError;
use crate::forecast::ForecastImportError;
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
    Forecast(ForecastImportError),
    Dataset(AllocationServiceError),
    Request(AllocationRequestError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Forecast(err) => write!(f, "forecast import error: {}", err),
            AppError::Dataset(err) => write!(f, "dataset error: {}", err),
            AppError::Request(err) => write!(f, "request rejected: {}", err),
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
            AppError::Forecast(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Request(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Forecast(_) => StatusCode::BAD_REQUEST,
            AppError::Request(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
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

impl From<ForecastImportError> for AppError {
    fn from(value: ForecastImportError) -> Self {
        Self::Forecast(value)
    }
}

impl From<AllocationServiceError> for AppError {
    fn from(value: AllocationServiceError) -> Self {
        Self::Dataset(value)
    }
}

impl From<AllocationRequestError> for AppError {
    fn from(value: AllocationRequestError) -> Self {
        Self::Request(value)
    }
}
