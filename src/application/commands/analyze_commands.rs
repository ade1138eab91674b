//! Analyze Commands - 文本分析命令

use serde::Serialize;

/// 分析文本命令
#[derive(Debug, Clone)]
pub struct AnalyzeText {
    pub text: String,
}

/// 词数预检命令
#[derive(Debug, Clone)]
pub struct PrecheckText {
    pub text: String,
}

/// 分析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// 情感标签（Negative / Neutral / Positive）
    pub sentiment: String,
    /// 置信度百分比
    pub confidence_percent: f32,
    /// 展示用情感文本
    pub sentiment_text: String,
    /// 摘要文本，输入过短时为提示文案
    pub summary: String,
    /// 是否真正生成了摘要
    pub summarized: bool,
    pub word_count: usize,
    /// 大文本耗时提示
    pub advisory: Option<String>,
}

/// 预检结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecheckReport {
    pub word_count: usize,
    pub summarizable: bool,
    pub advisory: Option<String>,
}
