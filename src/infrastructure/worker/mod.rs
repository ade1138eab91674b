//! Worker Layer - 双任务并发分发
//!
//! - WorkerPool: Semaphore 控制的有界任务池
//! - Dispatcher: 同时提交情感分析与摘要两个任务
//! - DispatchSession: 单次提交的任务句柄、超时等待与拆除
//! - BusyIndicator: 等待期间的"仍在处理"提示流

mod dispatcher;
mod indicator;
mod pool;
mod session;

pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use indicator::{BusyIndicator, FeedbackEvent};
pub use pool::{PoolError, TaskError, WorkerPool, MIN_POOL_CAPACITY};
pub use session::{DispatchOutcome, DispatchSession};
