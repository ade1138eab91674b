//! Fake Sentiment Client - 离线情感分类
//!
//! 基于简单词典打分，不调用任何模型服务。用于离线演示和测试

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{InferenceError, SentimentEnginePort};
use crate::domain::analysis::{SentimentLabel, SentimentResult};

const POSITIVE_WORDS: &[&str] = &[
    "love", "great", "good", "excellent", "amazing", "awesome", "fantastic", "happy", "best",
    "wonderful", "nice", "works", "like", "enjoy", "recommend",
];

const NEGATIVE_WORDS: &[&str] = &[
    "hate", "bad", "terrible", "awful", "worst", "poor", "broken", "sad", "angry",
    "disappointed", "horrible", "useless", "fails", "never", "not",
];

/// Fake Sentiment Client 配置
#[derive(Debug, Clone, Default)]
pub struct FakeSentimentClientConfig {
    /// 模拟推理延迟
    pub latency: Duration,
    /// 设置后每次调用都返回该错误
    pub failure: Option<String>,
}

/// Fake Sentiment Client
pub struct FakeSentimentClient {
    config: FakeSentimentClientConfig,
}

impl FakeSentimentClient {
    pub fn new(config: FakeSentimentClientConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency.as_millis() as u64,
            "FakeSentimentClient initialized"
        );
        Self { config }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self::new(FakeSentimentClientConfig {
            latency,
            failure: None,
        })
    }

    fn score(text: &str) -> Result<SentimentResult, InferenceError> {
        let (mut positive, mut negative) = (0usize, 0usize);
        for token in text.split_whitespace() {
            let word = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if POSITIVE_WORDS.contains(&word.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                negative += 1;
            }
        }

        let margin = positive.abs_diff(negative).min(4) as f32;
        let (label, score) = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => (SentimentLabel::Positive, 0.90 + 0.02 * margin),
            std::cmp::Ordering::Less => (SentimentLabel::Negative, 0.90 + 0.02 * margin),
            std::cmp::Ordering::Equal => (SentimentLabel::Neutral, 0.75),
        };

        SentimentResult::new(label, score.min(0.99))
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SentimentEnginePort for FakeSentimentClient {
    async fn classify(&self, text: &str) -> Result<SentimentResult, InferenceError> {
        tracing::debug!(text_len = text.len(), "FakeSentimentClient: scoring with lexicon");

        // 模拟推理延迟
        tokio::time::sleep(self.config.latency).await;

        if let Some(reason) = &self.config.failure {
            return Err(InferenceError::ServiceError(reason.clone()));
        }
        Self::score(text)
    }
}
