//! Analysis Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("empty input")]
    EmptyInput,

    #[error("sentiment score out of range: {0}")]
    ScoreOutOfRange(f32),
}
