//! Sentiment Engine Port - 情感分类模型抽象
//!
//! 定义情感分类的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;

use super::InferenceError;
use crate::domain::analysis::SentimentResult;

/// Sentiment Engine Port
///
/// 预训练情感分类模型的抽象接口。启动时构造一次，跨请求复用
#[async_trait]
pub trait SentimentEnginePort: Send + Sync {
    /// 对文本做情感分类，返回标签和置信度
    async fn classify(&self, text: &str) -> Result<SentimentResult, InferenceError>;

    /// 检查模型服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
