//! In-process key-value table with the same contract as the Postgres DAO.

use crate::models::{Kv, MAX_KEY_LEN};
use crate::services::kv_store::{KvDao, KvError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Handle for [`MemoryKvDao`]: the table itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvTable {
    rows: BTreeMap<String, String>,
}

impl MemoryKvTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryKvDao;

impl MemoryKvDao {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KvDao for MemoryKvDao {
    type Handle = MemoryKvTable;

    async fn get(&self, handle: &mut MemoryKvTable, key: &str) -> Result<String, KvError> {
        handle
            .rows
            .get(key)
            .cloned()
            .ok_or_else(|| KvError::NotFound(key.to_string()))
    }

    async fn set(&self, handle: &mut MemoryKvTable, key: &str, value: &str) -> Result<(), KvError> {
        // Mirrors the VARCHAR(100) column.
        if key.chars().count() > MAX_KEY_LEN {
            return Err(KvError::Storage(
                format!("key exceeds {} characters", MAX_KEY_LEN).into(),
            ));
        }
        // Postgres text cannot hold NUL.
        if key.contains('\0') || value.contains('\0') {
            return Err(KvError::Storage(
                "invalid byte sequence for encoding \"UTF8\": 0x00".into(),
            ));
        }
        handle.rows.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, handle: &mut MemoryKvTable, key: &str) -> Result<(), KvError> {
        handle.rows.remove(key);
        Ok(())
    }

    async fn exists(&self, handle: &mut MemoryKvTable, key: &str) -> Result<bool, KvError> {
        Ok(handle.rows.contains_key(key))
    }

    async fn get_all(&self, handle: &mut MemoryKvTable) -> Result<Vec<Kv>, KvError> {
        Ok(handle
            .rows
            .iter()
            .map(|(k, v)| Kv::new(k.as_str(), v.as_str()))
            .collect())
    }

    async fn get_by_prefix(
        &self,
        handle: &mut MemoryKvTable,
        prefix: &str,
    ) -> Result<Vec<Kv>, KvError> {
        Ok(handle
            .rows
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| Kv::new(k.as_str(), v.as_str()))
            .collect())
    }
}
