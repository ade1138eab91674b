//! Dual-Task Dispatcher - 情感分析与摘要并发分发

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::indicator::{spawn_ticker, TickerConfig};
use super::pool::{PoolError, TaskError, WorkerPool};
use super::session::{DispatchSession, TaskSlot, SENTIMENT_TASK, SUMMARY_TASK};
use crate::application::error::ApplicationError;
use crate::application::ports::{SentimentEnginePort, SummaryEnginePort};
use crate::domain::analysis::{AnalysisRequest, SummaryResult, WordThresholds};

/// Dispatcher 配置
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// 任务池容量（至少为 2）
    pub pool_size: usize,
    /// 每个任务的超时预算
    pub per_task_timeout: Duration,
    /// 提示间隔
    pub tick_interval: Duration,
    /// 词数阈值
    pub thresholds: WordThresholds,
    /// 提示文案，按顺序轮换
    pub filler_messages: Vec<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            per_task_timeout: Duration::from_secs(30),
            tick_interval: Duration::from_secs(7),
            thresholds: WordThresholds::default(),
            filler_messages: Vec::new(),
        }
    }
}

/// 双任务分发器
///
/// 协作方在启动时注入一次，跨请求复用，不会按请求重新初始化
pub struct Dispatcher {
    config: DispatcherConfig,
    pool: WorkerPool,
    sentiment_engine: Arc<dyn SentimentEnginePort>,
    summary_engine: Arc<dyn SummaryEnginePort>,
    filler_messages: Arc<[String]>,
}

impl Dispatcher {
    pub fn new(
        config: DispatcherConfig,
        sentiment_engine: Arc<dyn SentimentEnginePort>,
        summary_engine: Arc<dyn SummaryEnginePort>,
    ) -> Result<Self, PoolError> {
        let pool = WorkerPool::new(config.pool_size)?;
        let filler_messages = config.filler_messages.clone().into();

        tracing::info!(
            pool_size = config.pool_size,
            per_task_timeout_ms = config.per_task_timeout.as_millis() as u64,
            tick_interval_ms = config.tick_interval.as_millis() as u64,
            "Dispatcher initialized"
        );

        Ok(Self {
            config,
            pool,
            sentiment_engine,
            summary_engine,
            filler_messages,
        })
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn per_task_timeout(&self) -> Duration {
        self.config.per_task_timeout
    }

    pub fn thresholds(&self) -> WordThresholds {
        self.config.thresholds
    }

    pub fn sentiment_engine(&self) -> &Arc<dyn SentimentEnginePort> {
        &self.sentiment_engine
    }

    pub fn summary_engine(&self) -> &Arc<dyn SummaryEnginePort> {
        &self.summary_engine
    }

    /// 提交一次分析
    ///
    /// 空文本在调度任何任务之前就返回 ValidationError。
    /// 否则同时向池提交情感和摘要两个任务，并启动提示定时器
    pub fn submit(&self, text: &str) -> Result<DispatchSession, ApplicationError> {
        let request = AnalysisRequest::new(text).map_err(|e| {
            tracing::warn!(error = %e, "Rejected analysis request");
            ApplicationError::from(e)
        })?;
        let request = Arc::new(request);

        let session_id = Uuid::new_v4();
        let word_count = request.word_count();
        let summarizable = self.config.thresholds.is_summarizable(word_count);
        let cancel = CancellationToken::new();

        // 两个任务成对获取槽位，不会被其它会话拆开
        let sentiment_work = {
            let engine = self.sentiment_engine.clone();
            let request = request.clone();
            async move {
                engine
                    .classify(request.text())
                    .await
                    .map_err(|e| TaskError::Collaborator(e.to_string()))
            }
        };
        let summary_work = {
            let engine = self.summary_engine.clone();
            let request = request.clone();
            async move {
                if !summarizable {
                    return Ok(SummaryResult::TooShort);
                }
                engine
                    .summarize(request.text())
                    .await
                    .map(SummaryResult::Generated)
                    .map_err(|e| TaskError::Collaborator(e.to_string()))
            }
        };

        let sentiment_started = Instant::now();
        let summary_started = Instant::now();
        let (sentiment_handle, summary_handle) = self.pool.spawn_pair(
            (SENTIMENT_TASK, SUMMARY_TASK),
            cancel.clone(),
            sentiment_work,
            summary_work,
        );

        let ticker_config = TickerConfig {
            interval: self.config.tick_interval,
            window: self.config.per_task_timeout,
            messages: self.filler_messages.clone(),
        };
        let (ticker, indicator) = spawn_ticker(ticker_config, sentiment_started, cancel.clone());

        tracing::info!(
            session_id = %session_id,
            word_count,
            summarizable,
            "Analysis tasks submitted"
        );

        Ok(DispatchSession::new(
            session_id,
            word_count,
            TaskSlot::new(SENTIMENT_TASK, sentiment_started, sentiment_handle),
            TaskSlot::new(SUMMARY_TASK, summary_started, summary_handle),
            cancel,
            ticker,
            indicator,
        ))
    }
}
