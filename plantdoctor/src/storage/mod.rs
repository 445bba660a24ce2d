//! Storage module
//!
//! A key/value storage port, its memory and file backends, and the
//! quota-resilient history writer built on top of them.

pub mod file_store;
pub mod memory;
pub mod port;
pub mod resilient;

pub use file_store::FileStorage;
pub use memory::MemoryStorage;
pub use port::StoragePort;
pub use resilient::{estimate_bytes, persist_history, persist_history_with_notice, StorageNotice};
