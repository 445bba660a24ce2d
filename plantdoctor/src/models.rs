//! Data models
//!
//! Rust structs for diagnosis results and persisted case records.
//! Field names serialize as camelCase so stored history stays readable
//! by any shell that wrote the same schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Observed symptom identifiers. Membership only.
pub type SymptomSet = BTreeSet<String>;

/// Named boolean conditions. Absent keys read as `false`.
pub type ConditionMap = BTreeMap<String, bool>;

/// How soon the user should act on a diagnosis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        };
        f.write_str(label)
    }
}

/// One ranked diagnosis hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisCandidate {
    pub issue: String,
    /// Hand-tuned plausibility in [0, 1]
    pub confidence: f64,
    #[serde(default)]
    pub urgency: Urgency,
    pub reasons: Vec<String>,
    pub actions: Vec<String>,
}

/// Form snapshot handed over by the UI shell for one diagnose action
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDraft {
    pub plant_name: String,
    pub plant_type: String,
    pub environment: String,
    pub notes: String,
    pub symptoms: SymptomSet,
    pub toggles: ConditionMap,
    pub moisture_level: u8,
    pub light_level: u8,
    pub thumb_url: Option<String>,
    pub image_url: Option<String>,
}

impl Default for CaseDraft {
    fn default() -> Self {
        Self {
            plant_name: String::new(),
            plant_type: String::new(),
            environment: String::new(),
            notes: String::new(),
            symptoms: SymptomSet::new(),
            toggles: ConditionMap::new(),
            moisture_level: 50,
            light_level: 50,
            thumb_url: None,
            image_url: None,
        }
    }
}

/// A persisted diagnosis case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub plant_name: String,
    pub plant_type: String,
    pub environment: String,
    pub notes: String,
    pub symptoms: SymptomSet,
    pub toggles: ConditionMap,
    pub moisture_level: u8,
    pub light_level: u8,
    pub results: Vec<DiagnosisCandidate>,
    /// Small data-URL thumbnail; the only image that may persist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    /// Session-only full preview, never serialized
    #[serde(skip)]
    pub image_url: Option<String>,
}

/// The inputs and results of one case, as exported for the user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExport<'a> {
    pub plant_name: &'a str,
    pub plant_type: &'a str,
    pub environment: &'a str,
    pub notes: &'a str,
    pub symptoms: &'a SymptomSet,
    pub toggles: &'a ConditionMap,
    pub moisture_level: u8,
    pub light_level: u8,
    pub results: &'a [DiagnosisCandidate],
}

impl<'a> From<&'a CaseRecord> for CaseExport<'a> {
    fn from(record: &'a CaseRecord) -> Self {
        Self {
            plant_name: &record.plant_name,
            plant_type: &record.plant_type,
            environment: &record.environment,
            notes: &record.notes,
            symptoms: &record.symptoms,
            toggles: &record.toggles,
            moisture_level: record.moisture_level,
            light_level: record.light_level,
            results: &record.results,
        }
    }
}
