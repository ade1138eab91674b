//! Analyze Command Handlers

use std::sync::Arc;

use futures_util::StreamExt;

use crate::application::commands::analyze_commands::*;
use crate::application::error::ApplicationError;
use crate::domain::analysis::{word_count, SentimentResult, TaskOutcome, WordThresholds};
use crate::infrastructure::worker::{DispatchOutcome, Dispatcher, FeedbackEvent};

/// AnalyzeText Handler - 提交分析并等待两个任务
pub struct AnalyzeTextHandler {
    dispatcher: Arc<Dispatcher>,
}

impl AnalyzeTextHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// 分析文本，忽略等待期间的提示
    pub async fn handle(&self, cmd: AnalyzeText) -> Result<AnalysisReport, ApplicationError> {
        self.handle_with_feedback(cmd, |_| {}).await
    }

    /// 分析文本，等待期间的每次提示都交给 `on_feedback`
    ///
    /// 部分结果不会返回：任一任务超时返回 Timeout，任一任务失败返回 CollaboratorError
    pub async fn handle_with_feedback<F>(
        &self,
        cmd: AnalyzeText,
        mut on_feedback: F,
    ) -> Result<AnalysisReport, ApplicationError>
    where
        F: FnMut(FeedbackEvent) + Send,
    {
        let mut session = self.dispatcher.submit(&cmd.text)?;
        let session_id = session.id();
        let words = session.word_count();
        let mut indicator = session.poll_busy_indicator();

        let outcome = {
            let results = session.await_results(self.dispatcher.per_task_timeout());
            tokio::pin!(results);

            loop {
                tokio::select! {
                    biased;
                    outcome = &mut results => break outcome,
                    Some(event) = indicator.next() => {
                        tracing::debug!(
                            session_id = %session_id,
                            sequence = event.sequence,
                            "Analysis still running"
                        );
                        on_feedback(event);
                    }
                }
            }
        };
        session.shutdown();

        build_report(words, self.dispatcher.thresholds(), outcome)
    }
}

fn build_report(
    words: usize,
    thresholds: WordThresholds,
    outcome: DispatchOutcome,
) -> Result<AnalysisReport, ApplicationError> {
    if outcome.any_timed_out() {
        return Err(ApplicationError::Timeout {
            tasks: outcome.timed_out_tasks(),
        });
    }

    let sentiment = into_result("sentiment", outcome.sentiment)?;
    let summary = into_result("summary", outcome.summary)?;

    Ok(AnalysisReport {
        sentiment: sentiment.label().as_str().to_string(),
        confidence_percent: sentiment.confidence_percent(),
        sentiment_text: sentiment_text(&sentiment),
        summarized: !summary.is_too_short(),
        summary: summary.display_text().to_string(),
        word_count: words,
        advisory: thresholds.advisory_for(words),
    })
}

fn into_result<T>(task: &'static str, outcome: TaskOutcome<T>) -> Result<T, ApplicationError> {
    match outcome {
        TaskOutcome::Success(value) => Ok(value),
        TaskOutcome::TimedOut => Err(ApplicationError::Timeout { tasks: vec![task] }),
        TaskOutcome::Failed(reason) => {
            Err(ApplicationError::collaborator(format!("{} task: {}", task, reason)))
        }
    }
}

fn sentiment_text(result: &SentimentResult) -> String {
    format!(
        "Sentiment: {}\nConfidence Score: {:.2}%",
        result.label(),
        result.confidence_percent()
    )
}

/// PrecheckText Handler - 提交前的词数预检
pub struct PrecheckTextHandler {
    thresholds: WordThresholds,
}

impl PrecheckTextHandler {
    pub fn new(thresholds: WordThresholds) -> Self {
        Self { thresholds }
    }

    pub fn handle(&self, cmd: PrecheckText) -> PrecheckReport {
        let words = word_count(&cmd.text);
        PrecheckReport {
            word_count: words,
            summarizable: self.thresholds.is_summarizable(words),
            advisory: self.thresholds.advisory_for(words),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::TOO_SHORT_MESSAGE;
    use crate::infrastructure::adapters::{
        FakeSentimentClient, FakeSummaryClient, FakeSummaryClientConfig,
    };
    use crate::infrastructure::worker::DispatcherConfig;
    use std::time::Duration;

    fn dispatcher(sentiment_latency: Duration, summary: FakeSummaryClientConfig) -> Arc<Dispatcher> {
        let config = DispatcherConfig {
            pool_size: 2,
            per_task_timeout: Duration::from_secs(30),
            tick_interval: Duration::from_secs(7),
            thresholds: WordThresholds::default(),
            filler_messages: vec!["Still working...".to_string()],
        };
        Arc::new(
            Dispatcher::new(
                config,
                Arc::new(FakeSentimentClient::with_latency(sentiment_latency)),
                Arc::new(FakeSummaryClient::new(summary)),
            )
            .unwrap(),
        )
    }

    fn quick_summary() -> FakeSummaryClientConfig {
        FakeSummaryClientConfig {
            latency: Duration::from_secs(1),
            ..Default::default()
        }
    }

    fn long_text(words: usize) -> String {
        let sentence = "The new library opened downtown and residents enjoy the quiet reading rooms.";
        let mut text = String::new();
        while word_count(&text) < words {
            text.push_str(sentence);
            text.push(' ');
        }
        text.split_whitespace().take(words).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_positive_text() {
        let handler = AnalyzeTextHandler::new(dispatcher(Duration::from_secs(1), quick_summary()));

        let report = handler
            .handle(AnalyzeText {
                text: "I love this product, it works great!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(report.sentiment, "Positive");
        assert!(report.confidence_percent >= 90.0);
        assert!(report.sentiment_text.starts_with("Sentiment: Positive\nConfidence Score: "));
        assert!(report.sentiment_text.ends_with('%'));
        assert!(!report.summarized);
        assert_eq!(report.summary, TOO_SHORT_MESSAGE);
        assert_eq!(report.word_count, 7);
        assert_eq!(report.advisory, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_text_gets_summary_and_advisory() {
        let handler = AnalyzeTextHandler::new(dispatcher(Duration::from_secs(2), quick_summary()));
        let text = long_text(120);

        let report = handler.handle(AnalyzeText { text: text.clone() }).await.unwrap();

        assert!(report.summarized);
        assert!(!report.summary.is_empty());
        assert!(report.summary.len() < text.len());
        assert_eq!(report.word_count, 120);
        assert_eq!(
            report.advisory.as_deref(),
            Some("Model might get slower than expected due to large input text (over 100 words).")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_text_is_rejected() {
        let handler = AnalyzeTextHandler::new(dispatcher(Duration::ZERO, quick_summary()));
        let err = handler
            .handle(AnalyzeText {
                text: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sentiment_times_out_with_feedback() {
        let handler = AnalyzeTextHandler::new(dispatcher(Duration::from_secs(40), quick_summary()));
        let mut events = Vec::new();

        let err = handler
            .handle_with_feedback(
                AnalyzeText {
                    text: "The service was fine overall.".to_string(),
                },
                |event| events.push(event),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "The analysis took too long. Please try again later.");
        match err {
            ApplicationError::Timeout { tasks } => assert_eq!(tasks, vec!["sentiment"]),
            other => panic!("expected timeout, got {:?}", other),
        }
        // 7s, 14s, 21s, 28s
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[0].message, "Still working...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_failure_reported() {
        let handler = AnalyzeTextHandler::new(dispatcher(
            Duration::ZERO,
            FakeSummaryClientConfig {
                latency: Duration::ZERO,
                failure: Some("model offline".to_string()),
                ..Default::default()
            },
        ));

        let err = handler
            .handle(AnalyzeText { text: long_text(60) })
            .await
            .unwrap_err();
        match err {
            ApplicationError::CollaboratorError(message) => {
                assert!(message.contains("summary"));
                assert!(message.contains("model offline"));
            }
            other => panic!("expected collaborator error, got {:?}", other),
        }
    }

    #[test]
    fn test_precheck() {
        let handler = PrecheckTextHandler::new(WordThresholds::default());

        let short = handler.handle(PrecheckText {
            text: "Just a few words here".to_string(),
        });
        assert_eq!(short.word_count, 5);
        assert!(!short.summarizable);
        assert_eq!(short.advisory, None);

        let long = handler.handle(PrecheckText { text: long_text(101) });
        assert!(long.summarizable);
        assert!(long.advisory.is_some());

        let exactly_fifty = handler.handle(PrecheckText { text: long_text(50) });
        assert!(exactly_fifty.summarizable);
    }
}
