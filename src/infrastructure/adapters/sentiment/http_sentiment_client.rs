//! HTTP Sentiment Client - 调用外部情感分类推理服务
//!
//! 实现 SentimentEnginePort trait
//!
//! Response: [[{"label": "LABEL_2", "score": 0.98}, ...]] 或 [{"label": ..., "score": ...}]

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::super::inference_http::{ensure_success, map_send_error, InferenceEndpoint};
use crate::application::ports::{InferenceError, SentimentEnginePort};
use crate::domain::analysis::{SentimentLabel, SentimentResult};

pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment";

/// 模型原始标签 -> 情感标签
///
/// 换用其它标签体系的模型时只需修改这里
pub fn map_model_label(raw: &str) -> Option<SentimentLabel> {
    match raw {
        "LABEL_0" => Some(SentimentLabel::Negative),
        "LABEL_1" => Some(SentimentLabel::Neutral),
        "LABEL_2" => Some(SentimentLabel::Positive),
        other => match other.to_ascii_lowercase().as_str() {
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            "positive" => Some(SentimentLabel::Positive),
            _ => None,
        },
    }
}

#[derive(Debug, Serialize)]
struct ClassifyHttpRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyHttpResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyHttpResponse {
    /// 取得分最高的标签
    fn top(self) -> Option<LabelScore> {
        let candidates = match self {
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(items) => items,
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

fn to_sentiment(response: ClassifyHttpResponse) -> Result<SentimentResult, InferenceError> {
    let top = response
        .top()
        .ok_or_else(|| InferenceError::InvalidResponse("empty classification".to_string()))?;
    let label = map_model_label(&top.label).ok_or(InferenceError::UnknownLabel(top.label))?;
    SentimentResult::new(label, top.score)
        .map_err(|e| InferenceError::InvalidResponse(e.to_string()))
}

/// HTTP 情感分类客户端
pub struct HttpSentimentClient {
    client: Client,
    endpoint: InferenceEndpoint,
}

impl HttpSentimentClient {
    pub fn new(endpoint: InferenceEndpoint) -> Result<Self, InferenceError> {
        let client = endpoint.build_client()?;
        tracing::info!(url = %endpoint.model_url(), "HttpSentimentClient initialized");
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SentimentEnginePort for HttpSentimentClient {
    async fn classify(&self, text: &str) -> Result<SentimentResult, InferenceError> {
        let url = self.endpoint.model_url();
        tracing::debug!(url = %url, text_len = text.len(), "Sending sentiment request");

        let response = self
            .endpoint
            .authorize(self.client.post(&url))
            .json(&ClassifyHttpRequest { inputs: text })
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let body: ClassifyHttpResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(format!("Failed to parse labels: {}", e)))?;
        let result = to_sentiment(body)?;

        tracing::info!(
            label = %result.label(),
            score = result.score(),
            "Sentiment classification completed"
        );
        Ok(result)
    }

    async fn health_check(&self) -> bool {
        self.endpoint
            .authorize(self.client.get(self.endpoint.model_url()))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
