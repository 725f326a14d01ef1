//! Services module for template-service.

pub mod cache;
pub mod database;
pub mod kv_memory;
pub mod kv_store;
pub mod metrics;

pub use cache::{CacheStore, RedisCache};
pub use database::Database;
pub use kv_memory::{MemoryKvDao, MemoryKvTable};
pub use kv_store::{KvDao, KvError, PgKvDao};
pub use metrics::{get_metrics, init_metrics};
