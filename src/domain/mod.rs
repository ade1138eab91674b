//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Analysis Context: 文本情感分析与摘要

pub mod analysis;
