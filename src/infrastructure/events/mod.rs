//! Events - WebSocket 分析事件

mod publisher;

pub use publisher::{AnalysisEvent, EventPublisher};
