//! Text Insights - 并发情感分析与摘要服务
//!
//! - Domain: analysis/（请求、结果、词数阈值）
//! - Application: commands, ports
//! - Infrastructure: http, worker, adapters, events

use std::sync::Arc;
use std::time::Duration;

use text_insights::application::ports::{SentimentEnginePort, SummaryEnginePort};
use text_insights::config::{load_config, print_config, AppConfig, ModelProvider, ModelsConfig};
use text_insights::infrastructure::adapters::{
    FakeSentimentClient, FakeSentimentClientConfig, FakeSummaryClient, FakeSummaryClientConfig,
    HttpSentimentClient, HttpSummaryClient, InferenceEndpoint, SummaryParameters,
};
use text_insights::infrastructure::http::{AppState, HttpServer, ServerConfig};
use text_insights::infrastructure::worker::{Dispatcher, DispatcherConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config);

    tracing::info!("Text Insights - sentiment & summary service");
    print_config(&config);

    // 协作方只在启动时创建一次，所有请求复用
    let (sentiment_engine, summary_engine) = build_engines(&config.models)?;

    let dispatcher_config = DispatcherConfig {
        pool_size: config.dispatch.pool_size,
        per_task_timeout: config.dispatch.per_task_timeout(),
        tick_interval: config.dispatch.tick_interval(),
        thresholds: config.dispatch.thresholds(),
        filler_messages: config.dispatch.filler_messages.clone(),
    };
    let dispatcher = Arc::new(Dispatcher::new(
        dispatcher_config,
        sentiment_engine,
        summary_engine,
    )?);

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, AppState::new(dispatcher));

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志；RUST_LOG 优先于配置文件中的级别
fn init_logging(config: &AppConfig) {
    let log_filter = format!(
        "{},text_insights={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_engines(
    models: &ModelsConfig,
) -> anyhow::Result<(Arc<dyn SentimentEnginePort>, Arc<dyn SummaryEnginePort>)> {
    match models.provider {
        ModelProvider::Http => {
            let sentiment_endpoint =
                InferenceEndpoint::new(&models.base_url, &models.sentiment_model)
                    .with_token(models.api_token.clone())
                    .with_timeout(models.request_timeout_secs);
            let summary_endpoint = InferenceEndpoint::new(&models.base_url, &models.summary_model)
                .with_token(models.api_token.clone())
                .with_timeout(models.request_timeout_secs);
            let parameters = SummaryParameters {
                max_length: models.summary_max_length,
                min_length: models.summary_min_length,
                do_sample: false,
            };

            Ok((
                Arc::new(HttpSentimentClient::new(sentiment_endpoint)?),
                Arc::new(HttpSummaryClient::new(summary_endpoint, parameters)?),
            ))
        }
        ModelProvider::Fake => {
            let latency = Duration::from_millis(models.fake_latency_ms);
            Ok((
                Arc::new(FakeSentimentClient::new(FakeSentimentClientConfig {
                    latency,
                    failure: None,
                })),
                Arc::new(FakeSummaryClient::new(FakeSummaryClientConfig {
                    latency,
                    ..Default::default()
                })),
            ))
        }
    }
}
