//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SentimentEngine、SummaryEngine）
//! - commands: 分析命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{AnalyzeTextHandler, PrecheckTextHandler},
    AnalysisReport, AnalyzeText, PrecheckReport, PrecheckText,
};

pub use error::{ApplicationError, TIMEOUT_MESSAGE};

pub use ports::{InferenceError, SentimentEnginePort, SummaryEnginePort};
