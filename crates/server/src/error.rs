use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::BoardError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Rejected(#[from] BoardError),

    #[error("Missing Authorization header")]
    Unauthorized,

    #[error("Invalid admin token")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected(BoardError::CooldownActive { .. }) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Rejected(BoardError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Rejected(e) => e.kind(),
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Forbidden => "Forbidden",
            ApiError::Internal(_) => "ServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!("Request failed: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (
            status,
            Json(json!({ "errorKind": self.kind(), "error": message })),
        )
            .into_response();

        if let ApiError::Rejected(BoardError::CooldownActive { retry_after }) = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}
