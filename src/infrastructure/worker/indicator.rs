//! Busy Indicator - "仍在处理" 提示流
//!
//! 独立的定时任务按固定间隔产生 FeedbackEvent，与推理任务没有数据依赖

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// 提示缓冲区大小，写满后丢弃新提示，不阻塞定时任务
const TICK_BUFFER: usize = 16;

const DEFAULT_FILLER: &str = "Still working on your text...";

/// 一次"仍在处理"提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEvent {
    /// 第几次提示（从 1 开始）
    pub sequence: u32,
    /// 距离提交的毫秒数
    pub elapsed_ms: u64,
    /// 展示文案
    pub message: String,
}

/// 定时器参数
#[derive(Debug, Clone)]
pub(crate) struct TickerConfig {
    pub interval: Duration,
    /// 提示窗口，与任务超时一致
    pub window: Duration,
    pub messages: Arc<[String]>,
}

impl TickerConfig {
    fn message_for(&self, sequence: u32) -> String {
        if self.messages.is_empty() {
            return DEFAULT_FILLER.to_string();
        }
        let idx = (sequence as usize - 1) % self.messages.len();
        self.messages[idx].clone()
    }
}

/// 启动定时任务
///
/// 在以下任一情况下停止并释放定时器：
/// - `stop` 被取消（结果已解析或会话被关闭）
/// - 超出提示窗口
/// - 接收端被丢弃
pub(crate) fn spawn_ticker(
    config: TickerConfig,
    started_at: Instant,
    stop: CancellationToken,
) -> (JoinHandle<()>, mpsc::Receiver<FeedbackEvent>) {
    let (tx, rx) = mpsc::channel(TICK_BUFFER);

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(started_at + config.interval, config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let window = tokio::time::sleep_until(started_at + config.window);
        tokio::pin!(window);

        let mut sequence = 0u32;
        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = &mut window => break,
                tick = interval.tick() => {
                    sequence += 1;
                    let event = FeedbackEvent {
                        sequence,
                        elapsed_ms: tick.duration_since(started_at).as_millis() as u64,
                        message: config.message_for(sequence),
                    };
                    match tx.try_send(event) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            tracing::trace!(sequence, "Indicator buffer full, tick dropped");
                        }
                        Err(TrySendError::Closed(_)) => break,
                    }
                }
            }
        }

        tracing::debug!(ticks = sequence, "Busy indicator stopped");
    });

    (handle, rx)
}

/// 提示流
///
/// 有限序列；一旦结果解析（`stop` 被取消）就不再产出任何事件，
/// 即使缓冲区里还有未读的提示。消费者不需要读完
pub struct BusyIndicator {
    receiver: Option<mpsc::Receiver<FeedbackEvent>>,
    stop: CancellationToken,
}

impl BusyIndicator {
    pub(crate) fn new(receiver: mpsc::Receiver<FeedbackEvent>, stop: CancellationToken) -> Self {
        Self {
            receiver: Some(receiver),
            stop,
        }
    }

    /// 已结束的空流
    pub(crate) fn finished() -> Self {
        Self {
            receiver: None,
            stop: CancellationToken::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.receiver.is_none() || self.stop.is_cancelled()
    }
}

impl Stream for BusyIndicator {
    type Item = FeedbackEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.stop.is_cancelled() {
            self.receiver = None;
            return Poll::Ready(None);
        }

        let Some(receiver) = self.receiver.as_mut() else {
            return Poll::Ready(None);
        };

        match receiver.poll_recv(cx) {
            Poll::Ready(None) => {
                self.receiver = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}
