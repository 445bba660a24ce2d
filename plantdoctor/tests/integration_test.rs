//! Integration tests for Plant Doctor
//!
//! These tests verify end-to-end functionality including:
//! - Diagnosis ranking through the public API
//! - Quota-pressured persistence against memory and file storage
//! - History lifecycle and export

use plantdoctor::config::{HISTORY_SOFT_LIMIT, STORAGE_KEY};
use plantdoctor::diagnosis::evaluate;
use plantdoctor::error::{AppError, Result};
use plantdoctor::models::{CaseDraft, CaseRecord, ConditionMap, DiagnosisCandidate, SymptomSet, Urgency};
use plantdoctor::services::{export_case, export_history, HistoryService};
use plantdoctor::storage::{persist_history, FileStorage, MemoryStorage, StorageNotice, StoragePort};
use chrono::Utc;
use tempfile::TempDir;

fn symptoms(ids: &[&str]) -> SymptomSet {
    ids.iter().map(|s| s.to_string()).collect()
}

fn toggles(flags: &[(&str, bool)]) -> ConditionMap {
    flags.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Helper to build a stored case shaped like a real history entry
fn sample_case(i: usize) -> CaseRecord {
    CaseRecord {
        id: format!("id_{}", i),
        created_at: Utc::now(),
        plant_name: format!("P{}", i),
        plant_type: "Testus".to_string(),
        environment: String::new(),
        notes: "x".repeat(50),
        symptoms: SymptomSet::new(),
        toggles: ConditionMap::new(),
        moisture_level: 50,
        light_level: 50,
        results: vec![DiagnosisCandidate {
            issue: "None".to_string(),
            confidence: 0.2,
            urgency: Urgency::Low,
            reasons: vec![],
            actions: vec![],
        }],
        thumb_url: Some(format!("data:image/jpeg;base64,{}", "A".repeat(250))),
        image_url: None,
    }
}

/// Helper to create file storage in a temp dir
fn create_test_file_storage(quota: usize) -> (FileStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("data"), quota);
    storage.initialize().unwrap();

    (storage, temp_dir)
}

/// Rejects the first write with a quota error, then behaves normally
struct FirstWriteFull {
    inner: MemoryStorage,
    writes: usize,
}

impl StoragePort for FirstWriteFull {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes += 1;
        if self.writes == 1 {
            return Err(AppError::Storage("QuotaExceededError: exceeded the quota".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

#[test]
fn test_diagnosis_properties() {
    let res = evaluate(&symptoms(&["wilting"]), &toggles(&[("soil_dry", true)]), 10, 50, "");
    assert_eq!(res[0].issue, "Underwatering");
    assert!(res[0].confidence >= 0.7);

    let res = evaluate(
        &symptoms(&["yellowing", "mushy_stem"]),
        &toggles(&[("soil_soggy", true)]),
        80,
        50,
        "",
    );
    assert!(res[0].issue.contains("Root rot"));
    assert!(res[0].confidence >= 0.9);
    assert_eq!(res[0].urgency, Urgency::High);

    let res = evaluate(&symptoms(&["webbing"]), &ConditionMap::new(), 50, 50, "");
    assert!(res.iter().any(|r| r.issue == "Spider mites"));
}

#[test]
fn test_diagnosis_is_deterministic() {
    let s = symptoms(&["browning_tips", "sticky", "stunted", "tiny_flies"]);
    let t = toggles(&[("fertilized", true), ("overhead_sun", true)]);

    let first = evaluate(&s, &t, 40, 20, "Weeks of this, maybe");
    let second = evaluate(&s, &t, 40, 20, "Weeks of this, maybe");

    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0].confidence >= w[1].confidence));
}

#[test]
fn test_small_history_persists() {
    let mut storage = MemoryStorage::new();
    let history = vec![sample_case(1), sample_case(2), sample_case(3)];

    assert_eq!(persist_history(&mut storage, &history).unwrap(), None);

    let stored = storage.get(STORAGE_KEY).unwrap().unwrap();
    let parsed: Vec<CaseRecord> = serde_json::from_str(&stored).unwrap();
    assert_eq!(parsed.len(), 3);
}

#[test]
fn test_first_write_quota_error_degrades() {
    let mut storage = FirstWriteFull {
        inner: MemoryStorage::new(),
        writes: 0,
    };
    let big: Vec<CaseRecord> = (0..200).map(sample_case).collect();

    let notice = persist_history(&mut storage, &big).unwrap();

    assert_eq!(notice, Some(StorageNotice::ThumbnailsRemoved));
    let stored = storage.get(STORAGE_KEY).unwrap().unwrap();
    assert!(stored.len() < serde_json::to_string(&big).unwrap().len());
}

#[test]
fn test_persist_is_idempotent() {
    let mut storage = MemoryStorage::new();
    let history: Vec<CaseRecord> = (0..5).map(sample_case).collect();

    persist_history(&mut storage, &history).unwrap();
    let first = storage.get(STORAGE_KEY).unwrap();
    persist_history(&mut storage, &history).unwrap();
    let second = storage.get(STORAGE_KEY).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_file_storage_quota_prunes_oldest() {
    let one_case = serde_json::to_string(&[sample_case(0)]).unwrap().len();
    let (mut storage, _temp) = create_test_file_storage(one_case * 3);
    let history: Vec<CaseRecord> = (0..10).map(sample_case).collect();

    let notice = persist_history(&mut storage, &history).unwrap();

    assert_eq!(notice, Some(StorageNotice::OldestPruned));
    let stored: Vec<CaseRecord> = serde_json::from_str(&storage.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert!(!stored.is_empty() && stored.len() < 10);
    assert_eq!(stored[0].id, "id_0");
    assert!(stored.iter().all(|r| r.thumb_url.is_none()));
}

#[test]
fn test_history_service_round_trip_on_disk() {
    let (storage, temp) = create_test_file_storage(1024 * 1024);
    let root = storage.root().to_path_buf();

    let mut service = HistoryService::new(storage);
    service.load().unwrap();

    let record = service
        .diagnose(CaseDraft {
            plant_name: "Monstera".to_string(),
            symptoms: symptoms(&["yellowing", "mushy_stem"]),
            toggles: toggles(&[("soil_soggy", true)]),
            moisture_level: 85,
            ..CaseDraft::default()
        })
        .unwrap();
    assert_eq!(record.results[0].issue, "Root rot from overwatering");

    let mut reopened = HistoryService::new(FileStorage::new(root, 1024 * 1024));
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, record.id);

    let export = export_case(reopened.get_case(&record.id).unwrap()).unwrap();
    assert_eq!(export.filename, "plant-doctor-Monstera.json");
    let path = export.write_to(temp.path()).unwrap();
    assert!(path.exists());

    let all = export_history(reopened.history()).unwrap();
    let parsed: Vec<CaseRecord> = serde_json::from_str(&all.contents).unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_history_service_under_tight_quota() {
    let mut service = HistoryService::new(MemoryStorage::with_quota(20 * 1024));

    for i in 0..HISTORY_SOFT_LIMIT {
        service
            .diagnose(CaseDraft {
                plant_name: format!("P{}", i),
                symptoms: symptoms(&["yellowing", "webbing"]),
                thumb_url: Some(format!("data:image/jpeg;base64,{}", "B".repeat(400))),
                ..CaseDraft::default()
            })
            .unwrap();
    }

    assert_eq!(service.history().len(), HISTORY_SOFT_LIMIT);
    assert!(matches!(
        service.notice(),
        Some(StorageNotice::ThumbnailsRemoved) | Some(StorageNotice::OldestPruned)
    ));

    let stored: Vec<CaseRecord> =
        serde_json::from_str(&service.storage().get(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored[0].id, service.history()[0].id);
}
