//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, ModelProvider};
use crate::infrastructure::adapters::{DEFAULT_SENTIMENT_MODEL, DEFAULT_SUMMARY_MODEL};
use crate::infrastructure::worker::MIN_POOL_CAPACITY;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TEXT_INSIGHTS_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TEXT_INSIGHTS_SERVER__PORT=8080`
/// - `TEXT_INSIGHTS_MODELS__PROVIDER=fake`
/// - `TEXT_INSIGHTS_MODELS__API_TOKEN=hf_xxx`
/// - `TEXT_INSIGHTS_DISPATCH__PER_TASK_TIMEOUT_SECS=45`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("models.provider", "http")?
        .set_default("models.base_url", "https://api-inference.huggingface.co")?
        .set_default("models.sentiment_model", DEFAULT_SENTIMENT_MODEL)?
        .set_default("models.summary_model", DEFAULT_SUMMARY_MODEL)?
        .set_default("models.request_timeout_secs", 60)?
        .set_default("models.summary_max_length", 130)?
        .set_default("models.summary_min_length", 30)?
        .set_default("models.fake_latency_ms", 1500)?
        .set_default("dispatch.pool_size", 4)?
        .set_default("dispatch.per_task_timeout_secs", 30)?
        .set_default("dispatch.tick_interval_secs", 7)?
        .set_default("dispatch.summary_min_words", 50)?
        .set_default("dispatch.advisory_words", 100)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: TEXT_INSIGHTS_MODELS__PROVIDER=fake
    builder = builder.add_source(
        Environment::with_prefix("TEXT_INSIGHTS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.models.provider == ModelProvider::Http && config.models.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Models base URL cannot be empty for the http provider".to_string(),
        ));
    }

    if config.models.summary_min_length > config.models.summary_max_length {
        return Err(ConfigError::ValidationError(
            "Summary min length cannot exceed max length".to_string(),
        ));
    }

    // 两个任务必须能同时运行
    if config.dispatch.pool_size < MIN_POOL_CAPACITY {
        return Err(ConfigError::ValidationError(format!(
            "Dispatch pool size must be at least {}",
            MIN_POOL_CAPACITY
        )));
    }

    if config.dispatch.per_task_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Per-task timeout cannot be 0".to_string(),
        ));
    }

    if config.dispatch.tick_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Tick interval cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Model Provider: {}", config.models.provider.as_str());
    if config.models.provider == ModelProvider::Http {
        tracing::info!("Inference URL: {}", config.models.base_url);
        tracing::info!("Sentiment Model: {}", config.models.sentiment_model);
        tracing::info!("Summary Model: {}", config.models.summary_model);
        tracing::info!("API Token: {}", if config.models.api_token.is_some() { "set" } else { "none" });
    }
    tracing::info!("Worker Pool Size: {}", config.dispatch.pool_size);
    tracing::info!("Per-Task Timeout: {}s", config.dispatch.per_task_timeout_secs);
    tracing::info!("Tick Interval: {}s", config.dispatch.tick_interval_secs);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_small_pool() {
        let mut config = AppConfig::default();
        config.dispatch.pool_size = 1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.dispatch.per_task_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_base_url_allowed_for_fake_provider() {
        let mut config = AppConfig::default();
        config.models.base_url = String::new();
        assert!(validate_config(&config).is_err());

        config.models.provider = ModelProvider::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[models]
provider = "fake"
fake_latency_ms = 10

[dispatch]
pool_size = 3
per_task_timeout_secs = 12
filler_messages = ["one moment"]
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.models.provider, ModelProvider::Fake);
        assert_eq!(config.models.fake_latency_ms, 10);
        assert_eq!(config.dispatch.pool_size, 3);
        assert_eq!(config.dispatch.per_task_timeout_secs, 12);
        assert_eq!(config.dispatch.filler_messages, vec!["one moment".to_string()]);
        // 未设置的项使用默认值
        assert_eq!(config.dispatch.tick_interval_secs, 7);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dispatch]\npool_size = 1").unwrap();
        assert!(matches!(
            load_config_from_path(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
