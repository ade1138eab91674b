//! Text Insights - 并发情感分析与摘要
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Analysis: 分析请求、情感/摘要结果、任务结果、词数阈值
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SentimentEngine, SummaryEngine）
//! - Commands: 分析 / 预检命令处理器
//!
//! 基础设施层 (infrastructure/):
//! - Worker: 有界任务池、双任务分发、超时等待、提示流
//! - Adapters: HTTP 推理客户端与离线 Fake 实现
//! - HTTP: RESTful API + WebSocket
//! - Events: WebSocket 分析事件

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
