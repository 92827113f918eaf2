//! Persistence layer abstractions.
//!
//! # Responsibility
//! - Define the key-value access contract the controller persists through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Stored values are opaque strings; interpretation belongs to callers.

pub mod kv_repo;
pub mod session_store;
