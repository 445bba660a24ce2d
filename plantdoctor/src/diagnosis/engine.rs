//! Diagnosis engine
//!
//! Runs the rule battery, applies the fertilizer post-pass and the notes
//! nudge, then ranks candidates by confidence.

use super::rules::{Category, Finding, Signals, NO_CLEAR_ISSUE, RULES, SALT_BUILDUP};
use crate::config::{FERTILIZED_NUTRIENT_PENALTY, NOTE_CONFIDENCE_BUMPS};
use crate::models::{ConditionMap, DiagnosisCandidate, SymptomSet};

/// Rank diagnoses for one set of observations.
///
/// Never returns an empty list: when no rule fires, the single
/// "No clear issue detected" candidate is returned. Confidence is clamped to
/// [0, 1] and the list is sorted by descending confidence, with ties kept in
/// rule order.
pub fn evaluate(
    symptoms: &SymptomSet,
    toggles: &ConditionMap,
    moisture_level: u8,
    light_level: u8,
    notes: &str,
) -> Vec<DiagnosisCandidate> {
    let signals = Signals::new(symptoms, toggles, moisture_level, light_level);

    let mut findings: Vec<Finding> = RULES.iter().filter_map(|rule| rule.fire(&signals)).collect();

    apply_fertilizer_adjustment(&signals, &mut findings);

    if findings.is_empty() {
        findings.push(NO_CLEAR_ISSUE.build(&signals));
    }

    let bump = notes_bump(notes);

    let mut candidates: Vec<DiagnosisCandidate> = findings
        .into_iter()
        .map(|finding| {
            let mut candidate = finding.candidate;
            candidate.confidence = clamp01(candidate.confidence + bump);
            candidate
        })
        .collect();

    // sort_by is stable, so equal confidences keep firing order
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    tracing::debug!(
        "Evaluated {} symptoms into {} candidates (top: {})",
        symptoms.len(),
        candidates.len(),
        candidates[0].issue
    );

    candidates
}

/// Recent fertilizing lowers nutrient-deficiency findings already present,
/// then may add a salt-buildup finding.
fn apply_fertilizer_adjustment(signals: &Signals<'_>, findings: &mut Vec<Finding>) {
    if !signals.toggle("fertilized") {
        return;
    }

    for finding in findings.iter_mut().filter(|f| f.category == Category::Nutrient) {
        let confidence = &mut finding.candidate.confidence;
        *confidence = (*confidence - FERTILIZED_NUTRIENT_PENALTY).max(0.0);
    }

    if let Some(finding) = SALT_BUILDUP.fire(signals) {
        findings.push(finding);
    }
}

/// Sum of every note phrase found in the text, case-insensitively
fn notes_bump(notes: &str) -> f64 {
    let text = notes.to_lowercase();
    NOTE_CONFIDENCE_BUMPS
        .iter()
        .filter(|(phrase, _)| text.contains(phrase))
        .map(|(_, amount)| amount)
        .sum()
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
