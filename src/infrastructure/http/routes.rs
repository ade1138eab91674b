//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/health            GET   协作方健康检查
//! - /api/analyze           POST  分析文本（情感 + 摘要）
//! - /api/analyze/precheck  POST  词数预检
//! - /ws/analyze            WS    带进度提示的分析

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/analyze", get(handlers::analyze_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .route("/analyze/precheck", post(handlers::precheck))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    use crate::infrastructure::adapters::{
        FakeSentimentClient, FakeSummaryClient, FakeSummaryClientConfig,
    };
    use crate::infrastructure::worker::{Dispatcher, DispatcherConfig};

    fn test_router(summary_failure: Option<String>) -> Router {
        let dispatcher = Dispatcher::new(
            DispatcherConfig::default(),
            Arc::new(FakeSentimentClient::with_latency(Duration::ZERO)),
            Arc::new(FakeSummaryClient::new(FakeSummaryClientConfig {
                failure: summary_failure,
                ..Default::default()
            })),
        )
        .unwrap();
        create_routes().with_state(Arc::new(AppState::new(Arc::new(dispatcher))))
    }

    async fn call(router: Router, request: Request<Body>) -> serde_json::Value {
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let request = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();
        let body = call(test_router(None), request).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_reports_pool() {
        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let body = call(test_router(None), request).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["pool_capacity"], 4);
        assert_eq!(body["data"]["pool_available"], 4);
    }

    #[tokio::test]
    async fn test_analyze_short_text() {
        let body = call(
            test_router(None),
            post_json(
                "/api/analyze",
                serde_json::json!({ "text": "I love this product, it works great!" }),
            ),
        )
        .await;

        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["sentiment"], "Positive");
        assert_eq!(body["data"]["summarized"], false);
        assert_eq!(body["data"]["word_count"], 7);
    }

    #[tokio::test]
    async fn test_analyze_blank_text_is_bad_request() {
        let body = call(
            test_router(None),
            post_json("/api/analyze", serde_json::json!({ "text": "  " })),
        )
        .await;
        assert_eq!(body["errno"], 400);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_analyze_collaborator_failure() {
        let text = "word ".repeat(60);
        let body = call(
            test_router(Some("model offline".to_string())),
            post_json("/api/analyze", serde_json::json!({ "text": text })),
        )
        .await;
        assert_eq!(body["errno"], 503);
    }

    #[tokio::test]
    async fn test_precheck() {
        let text = "word ".repeat(120);
        let body = call(
            test_router(None),
            post_json("/api/analyze/precheck", serde_json::json!({ "text": text })),
        )
        .await;
        assert_eq!(body["data"]["word_count"], 120);
        assert_eq!(body["data"]["summarizable"], true);
        assert!(body["data"]["advisory"].is_string());
    }
}
