//! Quota-resilient history persistence
//!
//! Writes the whole history under [`STORAGE_KEY`]. When the medium is full
//! the payload shrinks in stages, oldest records first:
//!
//! 1. strip thumbnails one record at a time, retrying after each strip
//! 2. drop whole records one at a time, retrying after each drop
//! 3. remove the key entirely
//!
//! Quota errors never reach the caller; they become a [`StorageNotice`].
//! Every other error is returned unchanged.

use super::port::StoragePort;
use crate::config::STORAGE_KEY;
use crate::error::Result;
use crate::models::CaseRecord;
use serde::Serialize;
use std::fmt;

/// User-facing outcome of a degraded or pruned history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageNotice {
    ThumbnailsRemoved,
    OldestPruned,
    StorageFull,
    HistoryCompacted,
}

impl fmt::Display for StorageNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            StorageNotice::ThumbnailsRemoved => "Storage was full. Older thumbnails were removed.",
            StorageNotice::OldestPruned => "Storage was full. Oldest cases were pruned.",
            StorageNotice::StorageFull => "Storage was completely full. History could not be saved.",
            StorageNotice::HistoryCompacted => "History compacted: thumbnails removed and list pruned.",
        };
        f.write_str(message)
    }
}

/// Approximate storage footprint of a string (UTF-16, two bytes per unit).
/// Informational only; persistence decisions never use it.
pub fn estimate_bytes(value: &str) -> usize {
    value.encode_utf16().count() * 2
}

/// Persist `history` (newest first), degrading under quota pressure.
///
/// Returns the notice describing any degradation, `None` when the full
/// history was written. The caller's slice is never modified.
pub fn persist_history<S>(storage: &mut S, history: &[CaseRecord]) -> Result<Option<StorageNotice>>
where
    S: StoragePort + ?Sized,
{
    if try_write(storage, history)? {
        return Ok(None);
    }

    tracing::warn!(
        "History of {} cases exceeds storage quota, removing thumbnails",
        history.len()
    );

    let mut working = history.to_vec();

    for index in (0..working.len()).rev() {
        if working[index].thumb_url.take().is_none() {
            continue;
        }
        if try_write(storage, &working)? {
            tracing::warn!("History saved after removing thumbnails from index {} onward", index);
            return Ok(Some(StorageNotice::ThumbnailsRemoved));
        }
    }

    tracing::warn!("History still exceeds quota without thumbnails, pruning oldest cases");

    while working.pop().is_some() {
        if try_write(storage, &working)? {
            tracing::warn!(
                "History saved after pruning to {} of {} cases",
                working.len(),
                history.len()
            );
            return Ok(Some(StorageNotice::OldestPruned));
        }
    }

    storage.remove(STORAGE_KEY)?;
    tracing::error!("Storage completely full, history could not be saved");

    Ok(Some(StorageNotice::StorageFull))
}

/// [`persist_history`] reporting any notice through a callback
pub fn persist_history_with_notice<S, F>(storage: &mut S, history: &[CaseRecord], mut on_notice: F) -> Result<()>
where
    S: StoragePort + ?Sized,
    F: FnMut(StorageNotice),
{
    if let Some(notice) = persist_history(storage, history)? {
        on_notice(notice);
    }
    Ok(())
}

/// One write attempt. `Ok(false)` means the quota was hit.
fn try_write<S>(storage: &mut S, history: &[CaseRecord]) -> Result<bool>
where
    S: StoragePort + ?Sized,
{
    let payload = serde_json::to_string(history)?;

    match storage.set(STORAGE_KEY, &payload) {
        Ok(()) => {
            tracing::debug!(
                "Persisted {} cases (~{} bytes)",
                history.len(),
                estimate_bytes(&payload)
            );
            Ok(true)
        }
        Err(err) if err.is_quota_exceeded() => {
            tracing::debug!("Write of {} cases rejected: {}", history.len(), err);
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
