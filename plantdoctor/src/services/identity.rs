//! Case identity
//!
//! Id and clock source for new case records, injectable so tests can pin
//! both.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Supplies a unique id and the creation time for each new case
pub trait CaseIdentity {
    fn next_id(&mut self) -> String;
    fn now(&self) -> DateTime<Utc>;
}

/// Random v4 UUIDs and the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl CaseIdentity for SystemIdentity {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
