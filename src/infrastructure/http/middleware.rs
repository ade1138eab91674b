//! HTTP Middleware
//!
//! 请求日志中间件：HTTP 状态码错误 + 分析请求的耗时与池占用

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokio::time::Instant;

use super::state::AppState;

/// 请求日志类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestLog {
    ServerError,
    ClientError,
    Analysis,
    Quiet,
}

/// 分析路由：REST 分析、预检和 WebSocket 分析
fn is_analysis_route(path: &str) -> bool {
    path == "/ws/analyze" || path == "/api/analyze" || path.starts_with("/api/analyze/")
}

fn classify(path: &str, status: StatusCode) -> RequestLog {
    if status.is_server_error() {
        RequestLog::ServerError
    } else if status.is_client_error() {
        RequestLog::ClientError
    } else if is_analysis_route(path) {
        RequestLog::Analysis
    } else {
        RequestLog::Quiet
    }
}

/// 请求日志中间件
///
/// 4xx / 5xx 状态码记录 warn / error；分析路由额外记录耗时和池内空闲槽位。
/// 业务错误（errno != 0）的 HTTP 状态仍为 200，在 `ApiError::into_response()` 中记录。
/// WebSocket 路由的耗时只覆盖握手，分析过程在 handler 中记录
pub async fn request_logging_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    match classify(&path, status) {
        RequestLog::ServerError => tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "HTTP server error"
        ),
        RequestLog::ClientError => tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "HTTP client error"
        ),
        RequestLog::Analysis => tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            pool_available = state.dispatcher.pool().available(),
            pool_capacity = state.dispatcher.pool().capacity(),
            "Analysis request served"
        ),
        RequestLog::Quiet => {}
    }

    response
}
