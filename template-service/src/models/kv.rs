//! Key-value record model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Upper bound on key length, in characters (`VARCHAR(100)`).
pub const MAX_KEY_LEN: usize = 100;

/// A single persisted key/value pair, stored in the `kv_store` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Kv {
    pub key: String,
    pub value: String,
}

impl Kv {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
