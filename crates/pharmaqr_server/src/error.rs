use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pharmaqr_core::TabletError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No JSON data received")]
    MissingBody,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("tablet not found: {0}")]
    UnknownId(String),

    #[error(transparent)]
    Tablet(#[from] TabletError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingBody | ApiError::MalformedPayload(_) => "malformed_payload",
            ApiError::UnknownId(_) => "not_found",
            ApiError::Tablet(err) => err.kind(),
            ApiError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingBody | ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownId(_) => StatusCode::NOT_FOUND,
            ApiError::Tablet(TabletError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Tablet(TabletError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Tablet(TabletError::Encoding(_) | TabletError::Storage(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.to_string(),
            "kind": self.kind(),
        });

        (self.status(), Json(body)).into_response()
    }
}
