//! Storage port
//!
//! The single capability the persistence layer needs from its medium:
//! string values addressed by string keys.

use crate::error::Result;

/// Key/value storage slot provider.
///
/// Implementations report a full medium with an error for which
/// [`AppError::is_quota_exceeded`](crate::error::AppError::is_quota_exceeded)
/// returns true. Any other error is treated as a defect.
pub trait StoragePort {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting an absent key succeeds
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: StoragePort + ?Sized> StoragePort for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: StoragePort + ?Sized> StoragePort for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
