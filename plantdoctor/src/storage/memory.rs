//! In-memory storage
//!
//! A map-backed [`StoragePort`] with an optional byte quota, sized the same
//! way browsers size local storage (UTF-16 code units of key and value).

use super::port::StoragePort;
use super::resilient::estimate_bytes;
use crate::error::{AppError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Unbounded storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes pushing usage above `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Estimated bytes currently in use
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(k, v)| estimate_bytes(k) + estimate_bytes(v))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let others: usize = self
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| estimate_bytes(k) + estimate_bytes(v))
                .sum();
            let needed = others + estimate_bytes(key) + estimate_bytes(value);

            if needed > quota {
                return Err(AppError::QuotaExceeded(format!(
                    "Setting the value of '{}' exceeded the quota ({} > {} bytes)",
                    key, needed, quota
                )));
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
