use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use evasio_core::StoreError;
use evasio_pay::PayError;

#[derive(Debug)]
pub enum AppError {
    /// A required provider secret is missing; no external call was attempted.
    Config(String),
    Validation(String),
    NotFound(String),
    /// A provider returned a non-2xx; its status is mirrored and the body
    /// attached for diagnostics.
    Upstream { status: u16, details: String },
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::Config(msg) => {
                tracing::error!("configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Upstream { status, details } => {
                tracing::error!("upstream error {}: {}", status, details);
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    "upstream provider error".to_string(),
                    Some(details),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({ "error": error_message });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(format!("not found: {}", what)),
            StoreError::Transport(msg) => AppError::Upstream {
                status: 502,
                details: msg,
            },
            StoreError::Api { status, body } => AppError::Upstream {
                status,
                details: body,
            },
            StoreError::Decode(msg) => AppError::Internal(msg),
        }
    }
}

impl From<PayError> for AppError {
    fn from(err: PayError) -> Self {
        match err {
            PayError::Transport(e) => AppError::Upstream {
                status: 502,
                details: e.to_string(),
            },
            PayError::Api { status, message } => AppError::Upstream {
                status,
                details: message,
            },
            PayError::Parse(e) => AppError::Internal(e.to_string()),
            PayError::Signature(msg) => AppError::Validation(msg),
        }
    }
}
