//! Dispatch Session - 一次提交对应的两个任务 + 提示流

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::indicator::{BusyIndicator, FeedbackEvent};
use super::pool::TaskError;
use crate::domain::analysis::{SentimentResult, SummaryResult, TaskOutcome};

/// 两个任务的最终结果
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub sentiment: TaskOutcome<SentimentResult>,
    pub summary: TaskOutcome<SummaryResult>,
}

impl DispatchOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.sentiment.is_success() && self.summary.is_success()
    }

    pub fn any_timed_out(&self) -> bool {
        self.sentiment.is_timed_out() || self.summary.is_timed_out()
    }

    /// 超时的任务名
    pub fn timed_out_tasks(&self) -> Vec<&'static str> {
        let mut tasks = Vec::new();
        if self.sentiment.is_timed_out() {
            tasks.push(SENTIMENT_TASK);
        }
        if self.summary.is_timed_out() {
            tasks.push(SUMMARY_TASK);
        }
        tasks
    }
}

pub(crate) const SENTIMENT_TASK: &str = "sentiment";
pub(crate) const SUMMARY_TASK: &str = "summary";

/// 单个任务槽：句柄 + 自己的计时起点
pub(crate) struct TaskSlot<T> {
    name: &'static str,
    started_at: Instant,
    handle: Option<JoinHandle<Result<T, TaskError>>>,
}

impl<T> TaskSlot<T> {
    pub(crate) fn new(
        name: &'static str,
        started_at: Instant,
        handle: JoinHandle<Result<T, TaskError>>,
    ) -> Self {
        Self {
            name,
            started_at,
            handle: Some(handle),
        }
    }

    fn deadline(&self, timeout: Duration) -> Instant {
        self.started_at + timeout
    }

    /// 等待任务结束；可安全地在 select! 中被丢弃后重新调用
    async fn join(&mut self) -> TaskOutcome<T> {
        let Some(handle) = self.handle.as_mut() else {
            return TaskOutcome::Failed("task cancelled".to_string());
        };
        let result = handle.await;
        self.handle = None;
        Self::to_outcome(self.name, result)
    }

    /// 超时返回时收集另一个任务：已完成则取结果，否则视为超时
    async fn collect_if_finished(&mut self) -> TaskOutcome<T> {
        match &self.handle {
            Some(handle) if !handle.is_finished() => TaskOutcome::TimedOut,
            _ => self.join().await,
        }
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                tracing::debug!(task = self.name, "Aborting pending task");
                handle.abort();
            }
        }
    }

    fn to_outcome(name: &'static str, result: Result<Result<T, TaskError>, JoinError>) -> TaskOutcome<T> {
        match result {
            Ok(Ok(value)) => TaskOutcome::Success(value),
            Ok(Err(e)) => {
                tracing::warn!(task = name, error = %e, "Task failed");
                TaskOutcome::Failed(e.to_string())
            }
            Err(e) if e.is_cancelled() => TaskOutcome::Failed("task cancelled".to_string()),
            Err(e) => {
                tracing::error!(task = name, error = %e, "Task panicked");
                TaskOutcome::Failed(format!("task panicked: {}", e))
            }
        }
    }
}

/// 分发会话
///
/// 独占两个任务句柄和提示定时器。结果解析后、超时后或被丢弃时拆除：
/// 取消未完成任务、释放池槽位、停止提示流
pub struct DispatchSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    word_count: usize,
    sentiment: TaskSlot<SentimentResult>,
    summary: TaskSlot<SummaryResult>,
    cancel: CancellationToken,
    ticker: Option<JoinHandle<()>>,
    indicator: Option<mpsc::Receiver<FeedbackEvent>>,
    outcome: Option<DispatchOutcome>,
    shut_down: bool,
}

impl DispatchSession {
    pub(crate) fn new(
        id: Uuid,
        word_count: usize,
        sentiment: TaskSlot<SentimentResult>,
        summary: TaskSlot<SummaryResult>,
        cancel: CancellationToken,
        ticker: JoinHandle<()>,
        indicator: mpsc::Receiver<FeedbackEvent>,
    ) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            word_count,
            sentiment,
            summary,
            cancel,
            ticker: Some(ticker),
            indicator: Some(indicator),
            outcome: None,
            shut_down: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// 获取提示流
    ///
    /// 只有第一次调用拿到实时流，之后返回空流
    pub fn poll_busy_indicator(&mut self) -> BusyIndicator {
        match self.indicator.take() {
            Some(receiver) if !self.shut_down => BusyIndicator::new(receiver, self.cancel.clone()),
            _ => BusyIndicator::finished(),
        }
    }

    /// 等待两个任务的结果
    ///
    /// 每个任务从自己提交时刻开始计时。任一任务超时即立即返回，
    /// 不再等待另一个任务。返回前总是拆除会话。
    ///
    /// 已知限制：超时任务只是收到取消信号并被 abort，
    /// 如果协作方正处于不可中断的阻塞计算中，底层计算可能继续运行到结束
    pub async fn await_results(&mut self, per_task_timeout: Duration) -> DispatchOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let mut sentiment: Option<TaskOutcome<SentimentResult>> = None;
        let mut summary: Option<TaskOutcome<SummaryResult>> = None;

        {
            let sentiment_deadline = tokio::time::sleep_until(self.sentiment.deadline(per_task_timeout));
            let summary_deadline = tokio::time::sleep_until(self.summary.deadline(per_task_timeout));
            tokio::pin!(sentiment_deadline);
            tokio::pin!(summary_deadline);

            while sentiment.is_none() || summary.is_none() {
                tokio::select! {
                    outcome = self.sentiment.join(), if sentiment.is_none() => {
                        sentiment = Some(outcome);
                    }
                    outcome = self.summary.join(), if summary.is_none() => {
                        summary = Some(outcome);
                    }
                    _ = &mut sentiment_deadline, if sentiment.is_none() => {
                        sentiment = Some(TaskOutcome::TimedOut);
                        break;
                    }
                    _ = &mut summary_deadline, if summary.is_none() => {
                        summary = Some(TaskOutcome::TimedOut);
                        break;
                    }
                }
            }
        }

        let sentiment = match sentiment {
            Some(outcome) => outcome,
            None => self.sentiment.collect_if_finished().await,
        };
        let summary = match summary {
            Some(outcome) => outcome,
            None => self.summary.collect_if_finished().await,
        };

        let outcome = DispatchOutcome { sentiment, summary };

        if outcome.any_timed_out() {
            tracing::warn!(
                session_id = %self.id,
                timed_out = ?outcome.timed_out_tasks(),
                timeout_ms = per_task_timeout.as_millis() as u64,
                "Analysis timed out"
            );
        } else {
            tracing::info!(
                session_id = %self.id,
                sentiment = outcome.sentiment.as_str(),
                summary = outcome.summary.as_str(),
                "Analysis resolved"
            );
        }

        self.outcome = Some(outcome.clone());
        self.shutdown();
        outcome
    }

    /// 拆除会话：取消未完成任务、释放槽位、停止提示流
    ///
    /// 幂等；正常完成、超时、错误路径和 Drop 都会调用
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        self.cancel.cancel();
        self.sentiment.abort();
        self.summary.abort();
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.indicator = None;

        tracing::debug!(
            session_id = %self.id,
            lifetime_ms = (Utc::now() - self.created_at).num_milliseconds(),
            "Dispatch session torn down"
        );
    }
}

impl Drop for DispatchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
