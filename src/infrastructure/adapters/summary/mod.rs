//! Summary Adapter - 摘要客户端实现

mod fake_summary_client;
mod http_summary_client;

pub use fake_summary_client::{FakeSummaryClient, FakeSummaryClientConfig};
pub use http_summary_client::{HttpSummaryClient, SummaryParameters, DEFAULT_SUMMARY_MODEL};
