//! WebSocket Handler - 带进度提示的分析
//!
//! 客户端发送 `{"text": "..."}`，服务端依次推送：
//! Advisory（可选）、Working（每次提示）、Completed 或 Failed，然后关闭连接

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::stream::SplitStream;
use futures_util::{Sink, SinkExt, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::{AnalyzeText, ApplicationError, PrecheckText};
use crate::infrastructure::events::{AnalysisEvent, EventPublisher};
use crate::infrastructure::http::dto::AnalyzeRequest;
use crate::infrastructure::http::state::AppState;

/// 分析 WebSocket 连接处理
pub async fn analyze_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_analyze_socket(socket, state))
}

async fn handle_analyze_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    tracing::info!("Analyze WebSocket connected");

    let Some(text) = read_request(&mut receiver).await else {
        let _ = sender.close().await;
        return;
    };

    let text = match text {
        Ok(text) => text,
        Err(e) => {
            let event = AnalysisEvent::from_result(Err(e));
            let _ = send_event(&mut sender, &event).await;
            let _ = sender.close().await;
            return;
        }
    };

    let (publisher, event_rx) = EventPublisher::new();

    // 分析与事件转发在同一个任务中运行；客户端断开时整个 future 被丢弃，
    // 会话随之拆除，任务槽位立即释放
    let analysis = run_analysis(&state, text, &publisher);
    let work = async {
        tokio::join!(analysis, forward_events(&mut sender, event_rx));
    };

    tokio::select! {
        _ = work => {
            let _ = sender.close().await;
        }
        _ = wait_for_close(&mut receiver) => {
            tracing::info!("Analyze WebSocket closed by client before completion");
        }
    }

    tracing::info!("Analyze WebSocket disconnected");
}

/// 运行一次分析并把事件交给 publisher
///
/// 顺序：Advisory（可选）、每次提示一个 Working、最后 Completed 或 Failed
async fn run_analysis(state: &AppState, text: String, publisher: &EventPublisher) {
    let precheck = state.precheck_handler.handle(PrecheckText { text: text.clone() });
    if let Some(advisory) = precheck.advisory {
        publisher.publish_advisory(advisory);
    }

    let result = state
        .analyze_handler
        .handle_with_feedback(AnalyzeText { text }, |feedback| {
            publisher.publish_working(feedback)
        })
        .await;
    publisher.publish_result(result);
}

/// 读取客户端的第一条文本消息
///
/// 连接在发送请求前关闭时返回 None
async fn read_request(
    receiver: &mut SplitStream<WebSocket>,
) -> Option<Result<String, ApplicationError>> {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(json)) => {
                return Some(
                    serde_json::from_str::<AnalyzeRequest>(&json)
                        .map(|req| req.text)
                        .map_err(|e| ApplicationError::validation(format!("Invalid request: {}", e))),
                );
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Analyze WebSocket closed by client");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket error");
                return None;
            }
            // Ping/Pong 由 axum 处理
            _ => {}
        }
    }
    None
}

/// 转发事件直到终止事件
async fn forward_events<S>(sender: &mut S, mut event_rx: mpsc::UnboundedReceiver<AnalysisEvent>)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(event) = event_rx.recv().await {
        let terminal = event.is_terminal();
        if send_event(sender, &event).await.is_err() || terminal {
            break;
        }
    }
}

async fn send_event<S>(sender: &mut S, event: &AnalysisEvent) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let msg = match serde_json::to_string(event) {
        Ok(json) => Message::Text(json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize event");
            return Ok(());
        }
    };

    sender.send(msg).await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to send WebSocket message");
    })
}

/// 等待客户端关闭连接
async fn wait_for_close(receiver: &mut SplitStream<WebSocket>) {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }
}
