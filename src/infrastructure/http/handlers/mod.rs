//! HTTP Handlers

mod analyze;
mod health;
mod ping;
mod websocket;

pub use analyze::*;
pub use health::*;
pub use ping::*;
pub use websocket::*;
