//! File-backed storage
//!
//! Stores each key as one file under a root directory, with a byte quota
//! across all keys so the medium behaves like a bounded local store.
//!
//! Example: key "plant-doctor-history-v2" is stored at "<root>/plant-doctor-history-v2.json"

use super::port::StoragePort;
use crate::error::{AppError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const FILE_EXTENSION: &str = "json";

/// Directory of key files with a shared byte quota
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    quota_bytes: usize,
}

impl FileStorage {
    /// Create a file store at the given root directory
    pub fn new(root: PathBuf, quota_bytes: usize) -> Self {
        Self { root, quota_bytes }
    }

    /// Initialize the store (create directory if needed)
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        tracing::info!("File storage initialized at: {:?}", self.root);
        Ok(())
    }

    /// Bytes currently used by all keys
    pub fn used_bytes(&self) -> Result<usize> {
        self.usage_excluding(None)
    }

    /// Get store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get file path for a key
    fn get_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');

        if !valid {
            return Err(AppError::Storage(format!("Invalid storage key: {:?}", key)));
        }

        Ok(self.root.join(format!("{}.{}", key, FILE_EXTENSION)))
    }

    fn usage_excluding(&self, skip: Option<&Path>) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut total = 0usize;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if skip == Some(path.as_path()) {
                continue;
            }
            total += fs::metadata(&path)?.len() as usize;
        }

        Ok(total)
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.get_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path)?;
        tracing::debug!("Read key: {} ({} bytes)", key, value.len());

        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.get_path(key)?;

        let needed = self.usage_excluding(Some(path.as_path()))? + value.len();
        if needed > self.quota_bytes {
            return Err(AppError::QuotaExceeded(format!(
                "Writing '{}' exceeded the quota ({} > {} bytes)",
                key, needed, self.quota_bytes
            )));
        }

        fs::create_dir_all(&self.root)?;

        // Write to temp file first (atomic write)
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        // Rename to final location
        fs::rename(temp_path, &path)?;

        tracing::debug!("Wrote key: {} ({} bytes)", key, value.len());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.get_path(key)?;

        if !path.exists() {
            return Ok(()); // Already deleted
        }

        fs::remove_file(&path)?;

        tracing::debug!("Removed key: {}", key);

        Ok(())
    }
}
