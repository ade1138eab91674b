//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
    pub const GATEWAY_TIMEOUT: i32 = 504;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    ServiceUnavailable(String),
    GatewayTimeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno::BAD_REQUEST, error = %msg, "Bad request");
                ErrorResponse::new(errno::BAD_REQUEST, msg.clone())
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = errno::INTERNAL_ERROR, error = %msg, "Internal server error");
                ErrorResponse::new(errno::INTERNAL_ERROR, msg.clone())
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno = errno::SERVICE_UNAVAILABLE, error = %msg, "Service unavailable");
                ErrorResponse::new(errno::SERVICE_UNAVAILABLE, msg.clone())
            }
            ApiError::GatewayTimeout(msg) => {
                tracing::warn!(errno = errno::GATEWAY_TIMEOUT, error = %msg, "Analysis timed out");
                ErrorResponse::new(errno::GATEWAY_TIMEOUT, msg.clone())
            }
        };

        // 业务错误统一返回 200，由 errno 区分
        (StatusCode::OK, Json(response)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::Timeout { .. } => ApiError::GatewayTimeout(e.to_string()),
            ApplicationError::CollaboratorError(_) => ApiError::ServiceUnavailable(e.to_string()),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ApiError) -> serde_json::Value {
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_timeout_maps_to_504() {
        let body = body_json(ApiError::from(ApplicationError::Timeout {
            tasks: vec!["sentiment"],
        }))
        .await;
        assert_eq!(body["errno"], errno::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], "The analysis took too long. Please try again later.");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let body = body_json(ApiError::from(ApplicationError::validation("empty input"))).await;
        assert_eq!(body["errno"], errno::BAD_REQUEST);
        assert_eq!(body["error"], "empty input");
    }

    #[tokio::test]
    async fn test_collaborator_maps_to_503() {
        let body = body_json(ApiError::from(ApplicationError::collaborator("model offline"))).await;
        assert_eq!(body["errno"], errno::SERVICE_UNAVAILABLE);
    }
}
