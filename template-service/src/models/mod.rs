//! Domain models for template-service.

mod kv;

pub use kv::{Kv, MAX_KEY_LEN};
