//! Inference Error - 推理协作方错误

use thiserror::Error;

/// 推理服务错误
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown label: {0}")]
    UnknownLabel(String),
}
