//! Summary Engine Port - 文本摘要模型抽象

use async_trait::async_trait;

use super::InferenceError;

/// Summary Engine Port
///
/// 预训练摘要模型的抽象接口。只对词数达到下限的文本调用
#[async_trait]
pub trait SummaryEnginePort: Send + Sync {
    /// 生成摘要文本
    async fn summarize(&self, text: &str) -> Result<String, InferenceError>;

    /// 检查模型服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
