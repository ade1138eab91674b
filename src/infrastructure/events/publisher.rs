//! Event Publisher Implementation
//!
//! 单个 WebSocket 连接的分析事件推送

use serde::Serialize;
use tokio::sync::mpsc;

use crate::application::commands::AnalysisReport;
use crate::application::error::ApplicationError;
use crate::infrastructure::worker::FeedbackEvent;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum AnalysisEvent {
    /// 大文本耗时提示，在任务开始前发送
    Advisory { message: String },
    /// 等待期间的"仍在处理"提示
    Working(FeedbackEvent),
    /// 分析完成
    Completed(AnalysisReport),
    /// 分析失败（验证、超时或协作方错误）
    Failed {
        error: String,
        timed_out: bool,
    },
}

impl AnalysisEvent {
    pub fn from_result(result: Result<AnalysisReport, ApplicationError>) -> Self {
        match result {
            Ok(report) => Self::Completed(report),
            Err(e) => Self::Failed {
                timed_out: e.is_timeout(),
                error: e.to_string(),
            },
        }
    }

    /// 是否为终止事件
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed { .. })
    }
}

/// 事件发布器
///
/// 每个连接一个；提示回调是同步的，所以使用无界通道
#[derive(Clone)]
pub struct EventPublisher {
    sender: mpsc::UnboundedSender<AnalysisEvent>,
}

impl EventPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AnalysisEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn publish_advisory(&self, message: String) {
        self.publish(AnalysisEvent::Advisory { message });
    }

    pub fn publish_working(&self, feedback: FeedbackEvent) {
        self.publish(AnalysisEvent::Working(feedback));
    }

    pub fn publish_result(&self, result: Result<AnalysisReport, ApplicationError>) {
        self.publish(AnalysisEvent::from_result(result));
    }

    fn publish(&self, event: AnalysisEvent) {
        // 连接已关闭时接收端被丢弃，事件直接丢弃即可
        if self.sender.send(event).is_err() {
            tracing::debug!("Event receiver dropped, discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = AnalysisEvent::Working(FeedbackEvent {
            sequence: 2,
            elapsed_ms: 14_000,
            message: "Still working...".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Working");
        assert_eq!(json["data"]["sequence"], 2);
        assert_eq!(json["data"]["elapsed_ms"], 14_000);
    }

    #[test]
    fn test_timeout_maps_to_failed() {
        let event = AnalysisEvent::from_result(Err(ApplicationError::Timeout {
            tasks: vec!["summary"],
        }));
        assert!(event.is_terminal());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Failed");
        assert_eq!(json["data"]["timed_out"], true);
        assert_eq!(
            json["data"]["error"],
            "The analysis took too long. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_publish_order() {
        let (publisher, mut receiver) = EventPublisher::new();
        publisher.publish_advisory("large input".to_string());
        publisher.publish_result(Err(ApplicationError::validation("empty input")));
        drop(publisher);

        assert!(matches!(receiver.recv().await, Some(AnalysisEvent::Advisory { .. })));
        assert!(matches!(receiver.recv().await, Some(AnalysisEvent::Failed { timed_out: false, .. })));
        assert!(receiver.recv().await.is_none());
    }
}
