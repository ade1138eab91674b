//! Data Transfer Objects

use serde::{Deserialize, Serialize};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Analyze DTOs
// ============================================================================

/// 分析 / 预检请求体，WebSocket 首条消息也使用该格式
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" 或 "degraded"
    pub status: &'static str,
    pub sentiment_engine: bool,
    pub summary_engine: bool,
    pub pool_capacity: usize,
    pub pool_available: usize,
}
