//! Core domain logic for quotedeck.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::quote::{default_quotes, Quote, QuoteValidationError, CATEGORY_ALL};
pub use notify::{LogNotifier, Notice, Notifier, DEFAULT_NOTICE_DURATION_MS};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use repo::session_store::SessionStore;
pub use service::quote_service::{
    FormatError, MergeReport, QuoteService, QuoteStoreError, ServiceResult,
};
pub use sync::remote::{HttpQuoteSource, RemoteQuoteSource, DEFAULT_REMOTE_URL};
pub use sync::scheduler::{spawn_sync_scheduler, DEFAULT_SYNC_INTERVAL};
pub use sync::{sync_once, SyncError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
