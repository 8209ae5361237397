use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::pricing::CostError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Price sheet or service configuration could not be loaded
    ConfigError(String),
    /// Fee lookup for a category missing from the price sheet
    UnknownCategory(String),
    /// Negative count or duration
    InvalidQuantity(String),
    /// Query parameter out of range or naming an unknown column
    InvalidParameter(String),
    /// Malformed or empty request body
    InvalidRequest(String),
    /// Required data artifact not present
    NotFound(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::UnknownCategory(msg) => write!(f, "Unknown category: {}", msg),
            Self::InvalidQuantity(msg) => write!(f, "Invalid quantity: {}", msg),
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ConfigError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnknownCategory(_)
            | Self::InvalidQuantity(_)
            | Self::InvalidParameter(_)
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            Self::ConfigError(msg)
            | Self::UnknownCategory(msg)
            | Self::InvalidQuantity(msg)
            | Self::InvalidParameter(msg)
            | Self::InvalidRequest(msg)
            | Self::NotFound(msg)
            | Self::InternalError(msg) => msg.clone(),
        };

        crate::metrics::record_error(error_type_name(&self));

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigError(_) => "config_error",
        AppError::UnknownCategory(_) => "unknown_category",
        AppError::InvalidQuantity(_) => "invalid_quantity",
        AppError::InvalidParameter(_) => "invalid_parameter",
        AppError::InvalidRequest(_) => "invalid_request",
        AppError::NotFound(_) => "not_found",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<CostError> for AppError {
    fn from(err: CostError) -> Self {
        match err {
            CostError::ConfigLoad { .. } => Self::ConfigError(err.to_string()),
            CostError::UnknownCategory { .. } => Self::UnknownCategory(err.to_string()),
            CostError::InvalidQuantity { .. } | CostError::OutOfRange { .. } => {
                Self::InvalidQuantity(err.to_string())
            }
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidParameter(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

// Implement conversions from common error types
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(format!("{:#}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self::InternalError(format!("CSV error: {}", err))
    }
}
