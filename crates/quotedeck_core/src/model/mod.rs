//! Domain model for the quote collection.
//!
//! # Responsibility
//! - Define the canonical quote record shared by storage, import/export and
//!   remote merge paths.
//!
//! # Invariants
//! - Quotes created through the add path are trimmed and non-empty.
//! - Merge deduplication treats the exact `text` value as identity.

pub mod quote;
