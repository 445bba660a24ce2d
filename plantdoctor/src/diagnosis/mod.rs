//! Diagnosis module
//!
//! Deterministic, explainable rule table mapping observations to ranked
//! diagnosis candidates. Pure: no I/O, no shared state.

pub mod catalog;
pub mod engine;
pub mod rules;

pub use catalog::{CatalogEntry, SYMPTOMS, TOGGLES};
pub use engine::evaluate;
