//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod inference_http;
pub mod sentiment;
pub mod summary;

pub use inference_http::InferenceEndpoint;
pub use sentiment::*;
pub use summary::*;
