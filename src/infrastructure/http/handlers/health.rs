//! Health Handler
//!
//! 协作方健康检查与任务池占用情况

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, HealthResponse};
use crate::infrastructure::http::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let dispatcher = &state.dispatcher;
    let (sentiment_engine, summary_engine) = tokio::join!(
        dispatcher.sentiment_engine().health_check(),
        dispatcher.summary_engine().health_check()
    );

    if !(sentiment_engine && summary_engine) {
        tracing::warn!(sentiment_engine, summary_engine, "Collaborator health check failed");
    }

    Json(ApiResponse::success(HealthResponse {
        status: if sentiment_engine && summary_engine { "ok" } else { "degraded" },
        sentiment_engine,
        summary_engine,
        pool_capacity: dispatcher.pool().capacity(),
        pool_available: dispatcher.pool().available(),
    }))
}
