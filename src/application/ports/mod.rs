//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod inference_error;
mod sentiment_engine;
mod summary_engine;

pub use inference_error::InferenceError;
pub use sentiment_engine::SentimentEnginePort;
pub use summary_engine::SummaryEnginePort;
