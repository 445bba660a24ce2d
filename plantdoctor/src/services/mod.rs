//! Services module
//!
//! Business logic that coordinates the diagnosis engine with the storage
//! layer on behalf of a UI shell.

pub mod export;
pub mod history;
pub mod identity;

pub use export::{export_case, export_history, ExportFile};
pub use history::HistoryService;
pub use identity::{CaseIdentity, SystemIdentity};
