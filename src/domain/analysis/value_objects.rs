//! Analysis Context - Value Objects

use serde::{Deserialize, Serialize};

use super::errors::AnalysisError;

/// 摘要任务的最少词数（低于此值返回 TooShort）
pub const DEFAULT_SUMMARY_MIN_WORDS: usize = 50;

/// 超过此词数时提示"大文本可能较慢"
pub const DEFAULT_ADVISORY_WORDS: usize = 100;

/// TooShort 哨兵值的展示文本
pub const TOO_SHORT_MESSAGE: &str =
    "The input text is too short for summarization. Please enter a longer text.";

/// 统计空白分隔的词数
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 分析请求 - 一次用户提交的原始文本
///
/// 不变量:
/// - 去除首尾空白后非空
/// - 创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    text: String,
    word_count: usize,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Result<Self, AnalysisError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let word_count = word_count(&text);
        Ok(Self { text, word_count })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

/// 情感标签（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Positive => "Positive",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 情感分析结果
///
/// 不变量: score ∈ [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    label: SentimentLabel,
    score: f32,
}

impl SentimentResult {
    pub fn new(label: SentimentLabel, score: f32) -> Result<Self, AnalysisError> {
        if !(0.0..=1.0).contains(&score) {
            return Err(AnalysisError::ScoreOutOfRange(score));
        }
        Ok(Self { label, score })
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// 置信度百分比
    pub fn confidence_percent(&self) -> f32 {
        self.score * 100.0
    }
}

/// 摘要结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum SummaryResult {
    /// 模型生成的摘要
    Generated(String),
    /// 输入过短，未调用摘要模型
    TooShort,
}

impl SummaryResult {
    pub fn is_too_short(&self) -> bool {
        matches!(self, Self::TooShort)
    }

    /// 展示用文本
    pub fn display_text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::TooShort => TOO_SHORT_MESSAGE,
        }
    }
}

/// 单个任务的最终结果，每个任务恰好解析一次
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome<T> {
    Success(T),
    TimedOut,
    Failed(String),
}

impl<T> TaskOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::TimedOut => "timed_out",
            Self::Failed(_) => "failed",
        }
    }
}

/// 文本词数阈值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordThresholds {
    /// 少于此词数不做摘要
    pub summary_min_words: usize,
    /// 多于此词数给出耗时提示
    pub advisory_words: usize,
}

impl Default for WordThresholds {
    fn default() -> Self {
        Self {
            summary_min_words: DEFAULT_SUMMARY_MIN_WORDS,
            advisory_words: DEFAULT_ADVISORY_WORDS,
        }
    }
}

impl WordThresholds {
    /// 恰好达到下限（默认 50 词）的文本会被摘要
    // 边界取 `>=`：只有 `< summary_min_words` 才算过短，50 词不返回 TooShort
    pub fn is_summarizable(&self, word_count: usize) -> bool {
        word_count >= self.summary_min_words
    }

    pub fn needs_size_advisory(&self, word_count: usize) -> bool {
        word_count > self.advisory_words
    }

    /// 大文本提示文案，不需要时返回 None
    pub fn advisory_for(&self, word_count: usize) -> Option<String> {
        self.needs_size_advisory(word_count).then(|| {
            format!(
                "Model might get slower than expected due to large input text (over {} words).",
                self.advisory_words
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_blank_text() {
        assert_eq!(AnalysisRequest::new(""), Err(AnalysisError::EmptyInput));
        assert_eq!(AnalysisRequest::new(" \n\t "), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_request_counts_words() {
        let req = AnalysisRequest::new("I love this product, it works great!").unwrap();
        assert_eq!(req.word_count(), 7);
        assert_eq!(req.text(), "I love this product, it works great!");
    }

    #[test]
    fn test_sentiment_score_range() {
        assert!(SentimentResult::new(SentimentLabel::Positive, 0.97).is_ok());
        assert!(SentimentResult::new(SentimentLabel::Positive, 1.2).is_err());
        assert!(SentimentResult::new(SentimentLabel::Negative, -0.1).is_err());
        assert!(SentimentResult::new(SentimentLabel::Neutral, f32::NAN).is_err());
    }

    #[test]
    fn test_summary_display_text() {
        assert_eq!(SummaryResult::TooShort.display_text(), TOO_SHORT_MESSAGE);
        let generated = SummaryResult::Generated("short".to_string());
        assert_eq!(generated.display_text(), "short");
        assert!(!generated.is_too_short());
    }

    #[test]
    fn test_thresholds() {
        let t = WordThresholds::default();
        assert!(!t.is_summarizable(49));
        // 边界：恰好 50 词做摘要
        assert!(t.is_summarizable(50));
        assert!(!t.needs_size_advisory(100));
        assert!(t.needs_size_advisory(101));
        assert!(t.advisory_for(7).is_none());
        assert!(t.advisory_for(120).unwrap().contains("over 100 words"));
    }
}
