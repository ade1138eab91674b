//! Command Handlers 实现

mod analyze_handlers;

pub use analyze_handlers::*;
