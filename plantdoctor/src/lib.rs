//! Plant Doctor library
//!
//! Explainable houseplant diagnosis and a quota-resilient local case
//! history. Exposed as a library for UI shells and for testing.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
