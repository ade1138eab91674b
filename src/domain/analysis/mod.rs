//! Analysis Context - 文本分析上下文
//!
//! 职责:
//! - 分析请求校验（非空文本）
//! - 情感 / 摘要结果值对象
//! - 任务结果 TaskOutcome
//! - 词数预检（摘要下限、大文本提示）

mod errors;
mod value_objects;

pub use errors::AnalysisError;
pub use value_objects::{
    word_count, AnalysisRequest, SentimentLabel, SentimentResult, SummaryResult, TaskOutcome,
    WordThresholds, DEFAULT_ADVISORY_WORDS, DEFAULT_SUMMARY_MIN_WORDS, TOO_SHORT_MESSAGE,
};
