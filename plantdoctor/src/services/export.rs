//! Case export
//!
//! Pretty-printed JSON downloads of the whole history or of a single case's
//! inputs and results.

use crate::config::{CASE_EXPORT_FALLBACK_LABEL, HISTORY_EXPORT_FILENAME};
use crate::error::Result;
use crate::models::{CaseExport, CaseRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// A named JSON document ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

impl ExportFile {
    /// Save into `dir`, returning the written path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.contents)?;
        tracing::info!("Exported {} ({} bytes)", path.display(), self.contents.len());
        Ok(path)
    }
}

/// Export every stored case
pub fn export_history(history: &[CaseRecord]) -> Result<ExportFile> {
    Ok(ExportFile {
        filename: HISTORY_EXPORT_FILENAME.to_string(),
        contents: serde_json::to_string_pretty(history)?,
    })
}

/// Export one case's form inputs and diagnosis results
pub fn export_case(record: &CaseRecord) -> Result<ExportFile> {
    Ok(ExportFile {
        filename: format!("plant-doctor-{}.json", file_label(&record.plant_name)),
        contents: serde_json::to_string_pretty(&CaseExport::from(record))?,
    })
}

fn file_label(plant_name: &str) -> String {
    let trimmed = plant_name.trim();
    if trimmed.is_empty() {
        return CASE_EXPORT_FALLBACK_LABEL.to_string();
    }

    trimmed
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(name: &str) -> CaseRecord {
        CaseRecord {
            id: "abc".to_string(),
            created_at: Utc.timestamp_millis_opt(0).unwrap(),
            plant_name: name.to_string(),
            plant_type: "Ficus".to_string(),
            environment: String::new(),
            notes: "notes".to_string(),
            symptoms: ["webbing".to_string()].into_iter().collect(),
            toggles: Default::default(),
            moisture_level: 40,
            light_level: 60,
            results: vec![],
            thumb_url: Some("data:thumb".to_string()),
            image_url: None,
        }
    }

    #[test]
    fn test_case_filename_uses_plant_name() {
        assert_eq!(export_case(&record("Figgy")).unwrap().filename, "plant-doctor-Figgy.json");
        assert_eq!(export_case(&record("  ")).unwrap().filename, "plant-doctor-case.json");
        assert_eq!(export_case(&record("a/b")).unwrap().filename, "plant-doctor-a_b.json");
    }

    #[test]
    fn test_case_export_has_inputs_and_results_only() {
        let file = export_case(&record("Figgy")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&file.contents).unwrap();

        assert_eq!(value["plantName"], "Figgy");
        assert_eq!(value["moistureLevel"], 40);
        assert!(value.get("results").is_some());
        assert!(value.get("id").is_none());
        assert!(value.get("thumbUrl").is_none());
        assert!(file.contents.contains("\n  "));
    }

    #[test]
    fn test_history_export_round_trips() {
        let history = vec![record("A"), record("B")];
        let file = export_history(&history).unwrap();

        assert_eq!(file.filename, "plant-doctor-history.json");
        let parsed: Vec<CaseRecord> = serde_json::from_str(&file.contents).unwrap();
        assert_eq!(parsed, history);
    }

    #[test]
    fn test_write_to_directory() {
        let temp = TempDir::new().unwrap();
        let file = export_history(&[]).unwrap();

        let path = file.write_to(&temp.path().join("exports")).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }
}
