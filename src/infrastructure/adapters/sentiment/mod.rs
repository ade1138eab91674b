//! Sentiment Adapter - 情感分类客户端实现

mod fake_sentiment_client;
mod http_sentiment_client;

pub use fake_sentiment_client::{FakeSentimentClient, FakeSentimentClientConfig};
pub use http_sentiment_client::{map_model_label, HttpSentimentClient, DEFAULT_SENTIMENT_MODEL};
