//! 应用层 - 命令
//!
//! 分析用例的命令及结果

mod analyze_commands;

pub mod handlers;

pub use analyze_commands::*;
