//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::domain::analysis::{WordThresholds, DEFAULT_ADVISORY_WORDS, DEFAULT_SUMMARY_MIN_WORDS};
use crate::infrastructure::adapters::{DEFAULT_SENTIMENT_MODEL, DEFAULT_SUMMARY_MODEL};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 模型（推理协作方）配置
    #[serde(default)]
    pub models: ModelsConfig,

    /// 分发器配置
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 推理协作方实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// 远程 HTTP 推理服务
    #[default]
    Http,
    /// 离线词典 / 抽取式实现
    Fake,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Fake => "fake",
        }
    }
}

/// 模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// 协作方实现
    #[serde(default)]
    pub provider: ModelProvider,

    /// 推理服务基础 URL
    #[serde(default = "default_models_base_url")]
    pub base_url: String,

    /// 访问令牌
    #[serde(default)]
    pub api_token: Option<String>,

    /// 情感分类模型
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,

    /// 摘要模型
    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    /// 单次 HTTP 请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// 摘要最大长度（token）
    #[serde(default = "default_summary_max_length")]
    pub summary_max_length: u32,

    /// 摘要最小长度（token）
    #[serde(default = "default_summary_min_length")]
    pub summary_min_length: u32,

    /// fake 实现的模拟延迟（毫秒）
    #[serde(default = "default_fake_latency")]
    pub fake_latency_ms: u64,
}

fn default_models_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_sentiment_model() -> String {
    DEFAULT_SENTIMENT_MODEL.to_string()
}

fn default_summary_model() -> String {
    DEFAULT_SUMMARY_MODEL.to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_summary_max_length() -> u32 {
    130
}

fn default_summary_min_length() -> u32 {
    30
}

fn default_fake_latency() -> u64 {
    1500
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            base_url: default_models_base_url(),
            api_token: None,
            sentiment_model: default_sentiment_model(),
            summary_model: default_summary_model(),
            request_timeout_secs: default_request_timeout(),
            summary_max_length: default_summary_max_length(),
            summary_min_length: default_summary_min_length(),
            fake_latency_ms: default_fake_latency(),
        }
    }
}

/// 分发器配置
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// 任务池容量，至少为 2
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// 每个任务的超时（秒）
    #[serde(default = "default_per_task_timeout")]
    pub per_task_timeout_secs: u64,

    /// 提示间隔（秒）
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// 摘要最少词数
    #[serde(default = "default_summary_min_words")]
    pub summary_min_words: usize,

    /// 大文本提示阈值（词）
    #[serde(default = "default_advisory_words")]
    pub advisory_words: usize,

    /// 等待期间轮换展示的文案
    #[serde(default = "default_filler_messages")]
    pub filler_messages: Vec<String>,
}

fn default_pool_size() -> usize {
    4
}

fn default_per_task_timeout() -> u64 {
    30
}

fn default_tick_interval() -> u64 {
    7
}

fn default_summary_min_words() -> usize {
    DEFAULT_SUMMARY_MIN_WORDS
}

fn default_advisory_words() -> usize {
    DEFAULT_ADVISORY_WORDS
}

fn default_filler_messages() -> Vec<String> {
    [
        "Still analyzing your text...",
        "Reading between the lines...",
        "Condensing the key points...",
        "Weighing the tone of every sentence...",
        "Almost there, the models are still working...",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            per_task_timeout_secs: default_per_task_timeout(),
            tick_interval_secs: default_tick_interval(),
            summary_min_words: default_summary_min_words(),
            advisory_words: default_advisory_words(),
            filler_messages: default_filler_messages(),
        }
    }
}

impl DispatchConfig {
    pub fn per_task_timeout(&self) -> Duration {
        Duration::from_secs(self.per_task_timeout_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn thresholds(&self) -> WordThresholds {
        WordThresholds {
            summary_min_words: self.summary_min_words,
            advisory_words: self.advisory_words,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5060);
        assert_eq!(config.models.provider, ModelProvider::Http);
        assert_eq!(config.models.sentiment_model, DEFAULT_SENTIMENT_MODEL);
        assert_eq!(config.models.summary_model, DEFAULT_SUMMARY_MODEL);
        assert_eq!(config.dispatch.per_task_timeout(), Duration::from_secs(30));
        assert_eq!(config.dispatch.tick_interval(), Duration::from_secs(7));
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5060");
    }

    #[test]
    fn test_thresholds_from_dispatch() {
        let thresholds = DispatchConfig::default().thresholds();
        assert_eq!(thresholds.summary_min_words, 50);
        assert_eq!(thresholds.advisory_words, 100);
    }
}
