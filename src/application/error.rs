//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::domain::analysis::AnalysisError;

/// 超时时展示给用户的唯一错误文案
pub const TIMEOUT_MESSAGE: &str = "The analysis took too long. Please try again later.";

/// 应用层错误
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// 验证错误（空输入等），不会调度任何任务
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 任一任务超过自身的超时预算
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout {
        /// 超时的任务名（sentiment / summary）
        tasks: Vec<&'static str>,
    },

    /// 协作方（模型）调用失败
    #[error("The analysis failed: {0}")]
    CollaboratorError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建协作方错误
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::CollaboratorError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<AnalysisError> for ApplicationError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::EmptyInput => Self::ValidationError(err.to_string()),
            AnalysisError::ScoreOutOfRange(_) => Self::CollaboratorError(err.to_string()),
        }
    }
}
