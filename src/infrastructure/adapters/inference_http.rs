//! Inference HTTP helpers - 推理服务 HTTP 客户端公共部分
//!
//! 外部推理 API（Hugging Face Inference API 兼容）:
//! POST {base_url}/models/{model}
//! Request: {"inputs": "...", "parameters": {...}}  (JSON)
//! Authorization: Bearer {api_token}（可选）

use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

use crate::application::ports::InferenceError;

/// 推理服务连接配置
#[derive(Debug, Clone)]
pub struct InferenceEndpoint {
    /// 推理服务基础 URL
    pub base_url: String,
    /// 模型 ID
    pub model: String,
    /// 访问令牌
    pub api_token: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl InferenceEndpoint {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_token: None,
            timeout_secs: 60,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// 推理 URL
    pub fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    pub(crate) fn build_client(&self) -> Result<Client, InferenceError> {
        Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| InferenceError::NetworkError(e.to_string()))
    }

    pub(crate) fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// reqwest 发送错误映射
pub(crate) fn map_send_error(e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout
    } else if e.is_connect() {
        InferenceError::NetworkError(format!("Cannot connect to inference service: {}", e))
    } else {
        InferenceError::NetworkError(e.to_string())
    }
}

/// 非 2xx 响应转为 ServiceError
pub(crate) async fn ensure_success(response: Response) -> Result<Response, InferenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(InferenceError::ServiceError(format!(
        "HTTP {}: {}",
        status, error_text
    )))
}
