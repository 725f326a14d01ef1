//! HTTP handlers for template-service.

pub mod health;
pub mod metrics;
pub mod ping;

pub use health::health_check;
pub use ping::ping;
