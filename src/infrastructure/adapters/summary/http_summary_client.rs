//! HTTP Summary Client - 调用外部摘要推理服务
//!
//! Request: {"inputs": "...", "parameters": {"max_length": 130, "min_length": 30, "do_sample": false}}
//! Response: [{"summary_text": "..."}]

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::super::inference_http::{ensure_success, map_send_error, InferenceEndpoint};
use crate::application::ports::{InferenceError, SummaryEnginePort};

pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";

/// 摘要生成参数
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryParameters {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for SummaryParameters {
    fn default() -> Self {
        Self {
            max_length: 130,
            min_length: 30,
            do_sample: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummarizeHttpRequest<'a> {
    inputs: &'a str,
    parameters: SummaryParameters,
}

#[derive(Debug, Deserialize)]
struct SummaryText {
    summary_text: String,
}

fn first_summary(items: Vec<SummaryText>) -> Result<String, InferenceError> {
    items
        .into_iter()
        .map(|item| item.summary_text.trim().to_string())
        .find(|text| !text.is_empty())
        .ok_or_else(|| InferenceError::InvalidResponse("empty summary".to_string()))
}

/// HTTP 摘要客户端
pub struct HttpSummaryClient {
    client: Client,
    endpoint: InferenceEndpoint,
    parameters: SummaryParameters,
}

impl HttpSummaryClient {
    pub fn new(
        endpoint: InferenceEndpoint,
        parameters: SummaryParameters,
    ) -> Result<Self, InferenceError> {
        let client = endpoint.build_client()?;
        tracing::info!(
            url = %endpoint.model_url(),
            max_length = parameters.max_length,
            min_length = parameters.min_length,
            "HttpSummaryClient initialized"
        );
        Ok(Self {
            client,
            endpoint,
            parameters,
        })
    }
}

#[async_trait]
impl SummaryEnginePort for HttpSummaryClient {
    async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        let url = self.endpoint.model_url();
        tracing::debug!(url = %url, text_len = text.len(), "Sending summary request");

        let response = self
            .endpoint
            .authorize(self.client.post(&url))
            .json(&SummarizeHttpRequest {
                inputs: text,
                parameters: self.parameters,
            })
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let items: Vec<SummaryText> = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(format!("Failed to parse summary: {}", e)))?;
        let summary = first_summary(items)?;

        tracing::info!(summary_len = summary.len(), "Summarization completed");
        Ok(summary)
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
