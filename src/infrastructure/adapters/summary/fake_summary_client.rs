//! Fake Summary Client - 离线抽取式摘要
//!
//! 取开头若干句作为摘要，保证结果比原文短

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{InferenceError, SummaryEnginePort};

/// Fake Summary Client 配置
#[derive(Debug, Clone)]
pub struct FakeSummaryClientConfig {
    /// 模拟推理延迟
    pub latency: Duration,
    /// 保留的句子数
    pub max_sentences: usize,
    /// 设置后每次调用都返回该错误
    pub failure: Option<String>,
}

impl Default for FakeSummaryClientConfig {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            max_sentences: 2,
            failure: None,
        }
    }
}

/// Fake Summary Client
pub struct FakeSummaryClient {
    config: FakeSummaryClientConfig,
}

impl FakeSummaryClient {
    pub fn new(config: FakeSummaryClientConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency.as_millis() as u64,
            max_sentences = config.max_sentences,
            "FakeSummaryClient initialized"
        );
        Self { config }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self::new(FakeSummaryClientConfig {
            latency,
            ..Default::default()
        })
    }

    fn extract(&self, text: &str) -> String {
        let mut summary = String::new();
        let mut sentences = 0;
        for (idx, ch) in text.char_indices() {
            if matches!(ch, '.' | '!' | '?') {
                sentences += 1;
                if sentences == self.config.max_sentences.max(1) {
                    summary = text[..idx + ch.len_utf8()].trim().to_string();
                    break;
                }
            }
        }

        let total_words = text.split_whitespace().count();
        if summary.is_empty() || summary.split_whitespace().count() >= total_words {
            // 句子太少，按词截断到三分之一
            let keep = (total_words / 3).max(1);
            let mut words: Vec<&str> = text.split_whitespace().take(keep).collect();
            if let Some(last) = words.last_mut() {
                *last = last.trim_end_matches(|c: char| !c.is_alphanumeric());
            }
            summary = format!("{}...", words.join(" "));
        }
        summary
    }
}

#[async_trait]
impl SummaryEnginePort for FakeSummaryClient {
    async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        tracing::debug!(text_len = text.len(), "FakeSummaryClient: extracting leading sentences");

        tokio::time::sleep(self.config.latency).await;

        if let Some(reason) = &self.config.failure {
            return Err(InferenceError::ServiceError(reason.clone()));
        }
        Ok(self.extract(text))
    }
}
