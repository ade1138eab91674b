//! Analyze HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{AnalysisReport, AnalyzeText, PrecheckReport, PrecheckText};
use crate::infrastructure::http::dto::{AnalyzeRequest, ApiResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 分析文本：并发执行情感分析与摘要，等待两个结果
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisReport>>, ApiError> {
    let report = state
        .analyze_handler
        .handle(AnalyzeText { text: req.text })
        .await?;

    Ok(Json(ApiResponse::success(report)))
}

/// 词数预检：是否会生成摘要、是否需要耗时提示
pub async fn precheck(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<ApiResponse<PrecheckReport>> {
    let report = state.precheck_handler.handle(PrecheckText { text: req.text });
    Json(ApiResponse::success(report))
}
