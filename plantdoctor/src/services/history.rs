//! History service
//!
//! Owns the in-memory case history (newest first) and keeps the storage slot
//! in sync after every mutation. Diagnose runs go through here so each one
//! lands in the history as a complete case record.

use super::identity::{CaseIdentity, SystemIdentity};
use crate::config::{HISTORY_SOFT_LIMIT, LEGACY_STORAGE_KEY, STORAGE_KEY};
use crate::diagnosis;
use crate::error::{AppError, Result};
use crate::models::{CaseDraft, CaseRecord};
use crate::storage::{estimate_bytes, persist_history, StorageNotice, StoragePort};

/// Service for managing the case history
pub struct HistoryService<S, I = SystemIdentity> {
    storage: S,
    identity: I,
    history: Vec<CaseRecord>,
    notice: Option<StorageNotice>,
}

impl<S: StoragePort> HistoryService<S, SystemIdentity> {
    pub fn new(storage: S) -> Self {
        Self::with_identity(storage, SystemIdentity)
    }
}

impl<S: StoragePort, I: CaseIdentity> HistoryService<S, I> {
    pub fn with_identity(storage: S, identity: I) -> Self {
        Self {
            storage,
            identity,
            history: Vec::new(),
            notice: None,
        }
    }

    /// Load the stored history, migrating the legacy key if the current one
    /// is absent. Unreadable payloads leave the history empty.
    pub fn load(&mut self) -> Result<&[CaseRecord]> {
        self.history = Vec::new();

        if let Some(raw) = self.storage.get(STORAGE_KEY)?.filter(|raw| !raw.is_empty()) {
            match serde_json::from_str(&raw) {
                Ok(records) => {
                    self.history = records;
                    tracing::info!("Loaded {} cases from history", self.history.len());
                }
                Err(err) => {
                    tracing::warn!("Ignoring unreadable history, starting empty: {}", err);
                }
            }
            return Ok(&self.history);
        }

        if let Some(raw) = self.storage.get(LEGACY_STORAGE_KEY)? {
            match serde_json::from_str::<Vec<CaseRecord>>(&raw) {
                Ok(mut records) => {
                    records.truncate(HISTORY_SOFT_LIMIT);
                    for record in &mut records {
                        record.image_url = None;
                    }

                    tracing::info!("Migrating {} cases from legacy history", records.len());

                    self.history = records;
                    self.persist()?;
                    self.storage.remove(LEGACY_STORAGE_KEY)?;
                }
                Err(err) => {
                    tracing::warn!("Ignoring unreadable legacy history: {}", err);
                }
            }
        }

        Ok(&self.history)
    }

    /// Run a diagnosis on the draft and record it as the newest case.
    ///
    /// The returned record keeps the draft's session preview; the stored
    /// history never does.
    pub fn diagnose(&mut self, draft: CaseDraft) -> Result<CaseRecord> {
        let results = diagnosis::evaluate(
            &draft.symptoms,
            &draft.toggles,
            draft.moisture_level,
            draft.light_level,
            &draft.notes,
        );

        let record = CaseRecord {
            id: self.identity.next_id(),
            created_at: self.identity.now(),
            plant_name: draft.plant_name,
            plant_type: draft.plant_type,
            environment: draft.environment,
            notes: draft.notes,
            symptoms: draft.symptoms,
            toggles: draft.toggles,
            moisture_level: draft.moisture_level,
            light_level: draft.light_level,
            results,
            thumb_url: draft.thumb_url,
            image_url: draft.image_url,
        };

        tracing::info!(
            "Recorded case {} for '{}': {}",
            record.id,
            record.plant_name,
            record.results[0].issue
        );

        self.history.insert(0, record.clone());
        self.history.truncate(HISTORY_SOFT_LIMIT);
        for stored in &mut self.history {
            stored.image_url = None;
        }

        self.persist()?;

        Ok(record)
    }

    /// Get a case by ID
    pub fn get_case(&self, id: &str) -> Result<&CaseRecord> {
        self.history
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::CaseNotFound(id.to_string()))
    }

    /// Delete a single case
    pub fn delete_case(&mut self, id: &str) -> Result<()> {
        let index = self
            .history
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| AppError::CaseNotFound(id.to_string()))?;

        self.history.remove(index);
        tracing::info!("Deleted case: {}", id);

        self.persist()?;
        Ok(())
    }

    /// Drop every case
    pub fn clear(&mut self) -> Result<()> {
        tracing::info!("Clearing {} cases", self.history.len());
        self.history.clear();
        self.persist()?;
        Ok(())
    }

    /// Keep the newest half of the soft limit and strip all thumbnails
    pub fn compact(&mut self) -> Result<()> {
        self.history.truncate(HISTORY_SOFT_LIMIT.div_ceil(2));
        for record in &mut self.history {
            record.thumb_url = None;
        }

        tracing::info!("Compacted history to {} cases", self.history.len());

        if self.persist()?.is_none() {
            self.notice = Some(StorageNotice::HistoryCompacted);
        }
        Ok(())
    }

    /// Current history, newest first
    pub fn history(&self) -> &[CaseRecord] {
        &self.history
    }

    /// Most recent storage notice, if any
    pub fn notice(&self) -> Option<StorageNotice> {
        self.notice
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Approximate serialized history size in KiB, for display only
    pub fn storage_size_kb(&self) -> Result<usize> {
        let payload = serde_json::to_string(&self.history)?;
        Ok((estimate_bytes(&payload) as f64 / 1024.0).round() as usize)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<Option<StorageNotice>> {
        let notice = persist_history(&mut self.storage, &self.history)?;
        if let Some(notice) = notice {
            tracing::warn!("{}", notice);
            self.notice = Some(notice);
        }
        Ok(notice)
    }
}
