//! Application State
//!
//! 包含分发器与分析用例 Handlers 的应用状态

use std::sync::Arc;

use crate::application::{AnalyzeTextHandler, PrecheckTextHandler};
use crate::infrastructure::worker::Dispatcher;

/// 应用状态
///
/// 分发器（连同两个协作方）在启动时构建一次，所有请求共享
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,

    // ========== Command Handlers ==========
    pub analyze_handler: AnalyzeTextHandler,
    pub precheck_handler: PrecheckTextHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            analyze_handler: AnalyzeTextHandler::new(dispatcher.clone()),
            precheck_handler: PrecheckTextHandler::new(dispatcher.thresholds()),
            dispatcher,
        }
    }
}
