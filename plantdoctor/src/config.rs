//! Application configuration constants
//!
//! Central location for storage keys, history limits, diagnostic thresholds
//! and confidence adjustments used throughout the application.

// ===== Storage =====

/// Key holding the current-schema history (thumbnails only, no full previews)
pub const STORAGE_KEY: &str = "plant-doctor-history-v2";

/// Key holding the older schema, read once for migration then deleted
pub const LEGACY_STORAGE_KEY: &str = "plant-doctor-history-v1";

/// Maximum number of case records kept in normal operation
pub const HISTORY_SOFT_LIMIT: usize = 50;

/// Default byte quota for file-backed storage.
/// Mirrors the ~5 MiB budget browsers give local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

// ===== Diagnostic Thresholds =====

/// Moisture at or above this level counts as soggy soil
pub const SOGGY_MOISTURE_THRESHOLD: u8 = 70;

/// Moisture at or below this level counts as very dry soil
pub const VERY_DRY_MOISTURE_THRESHOLD: u8 = 25;

/// Light below this level counts as low light
pub const LOW_LIGHT_THRESHOLD: u8 = 30;

// ===== Confidence Adjustments =====

/// Confidence removed from nutrient-deficiency candidates after recent fertilizing
pub const FERTILIZED_NUTRIENT_PENALTY: f64 = 0.15;

/// Confidence of the "no clear issue" fallback
pub const FALLBACK_CONFIDENCE: f64 = 0.2;

/// Phrases in the notes that shift every candidate's confidence.
/// Duration phrases raise it, hedges lower it.
pub const NOTE_CONFIDENCE_BUMPS: &[(&str, f64)] = &[("for days", 0.05), ("weeks", 0.05), ("maybe", -0.05)];

// ===== Export =====

/// Filename used when exporting the whole history
pub const HISTORY_EXPORT_FILENAME: &str = "plant-doctor-history.json";

/// Label used in a case export filename when the plant has no name
pub const CASE_EXPORT_FALLBACK_LABEL: &str = "case";
