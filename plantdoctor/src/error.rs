//! Error types for Plant Doctor
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to a UI shell as plain strings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("{0}")]
    Generic(String),
}

/// Message fragments that mark a storage failure as capacity-related.
const QUOTA_SIGNATURES: &[&str] = &["QuotaExceeded", "exceeded the quota", "quota"];

impl AppError {
    /// Whether this error means the storage medium is full.
    ///
    /// Quota errors are recovered from by shrinking the payload; everything
    /// else is a defect and must reach the caller unchanged.
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            AppError::QuotaExceeded(_) => true,
            AppError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::StorageFull | std::io::ErrorKind::QuotaExceeded
            ),
            AppError::Storage(msg) => QUOTA_SIGNATURES.iter().any(|sig| msg.contains(sig)),
            _ => false,
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
