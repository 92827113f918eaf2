//! Remote quote synchronization.
//!
//! # Responsibility
//! - Fetch candidate quotes from a remote source and merge them into the
//!   controller, deduplicating by exact text.
//! - Surface round outcomes to the user as transient notices.
//!
//! # Invariants
//! - A failed fetch leaves the collection unmodified; the next scheduled
//!   round is unaffected.
//! - No retry, backoff, or cancellation beyond the unconditional timer.

use crate::model::quote::Quote;
use crate::notify::{Notice, Notifier};
use crate::repo::kv_repo::KvRepository;
use crate::service::quote_service::{MergeReport, QuoteService, QuoteStoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod remote;
pub mod scheduler;

pub use remote::{HttpQuoteSource, RemoteQuoteSource};

/// Failure of one sync round.
#[derive(Debug)]
pub enum SyncError {
    /// Transport-level failure reaching the remote source.
    Http(reqwest::Error),
    /// Response body did not decode into the expected shape.
    Decode(String),
    /// The merge could not be persisted.
    Store(QuoteStoreError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "remote request failed: {err}"),
            Self::Decode(reason) => write!(f, "remote response malformed: {reason}"),
            Self::Store(err) => write!(f, "merge could not be stored: {err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<QuoteStoreError> for SyncError {
    fn from(value: QuoteStoreError) -> Self {
        Self::Store(value)
    }
}

/// Runs one fetch-and-merge round.
///
/// Emits the same notices the periodic scheduler does, so a manual round
/// and a timed one look identical to the user.
pub fn sync_once<R: KvRepository>(
    service: &mut QuoteService<R>,
    source: &dyn RemoteQuoteSource,
    notifier: &dyn Notifier,
) -> Result<MergeReport, SyncError> {
    notifier.notify(Notice::new("Syncing quotes with server..."));

    let candidates = match source.fetch_quotes() {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!("event=sync module=sync status=error stage=fetch error={err}");
            notifier.notify(Notice::new("Failed to sync with server."));
            return Err(err);
        }
    };

    merge_fetched(service, candidates, notifier)
}

/// Merges already-fetched candidates and reports the outcome.
///
/// Split out so the scheduler can fetch without holding the service lock
/// and take it only for this step.
pub(crate) fn merge_fetched<R: KvRepository>(
    service: &mut QuoteService<R>,
    candidates: Vec<Quote>,
    notifier: &dyn Notifier,
) -> Result<MergeReport, SyncError> {
    match service.merge_remote(candidates) {
        Ok(report) => {
            if report.has_changes() {
                info!(
                    "event=sync module=sync status=ok candidates={} merged={}",
                    report.candidates, report.merged
                );
                notifier.notify(Notice::new(format!(
                    "Synced {} new quote(s) from server.",
                    report.merged
                )));
            } else {
                info!(
                    "event=sync module=sync status=ok candidates={} merged=0",
                    report.candidates
                );
                notifier.notify(Notice::new("No new updates from server."));
            }
            Ok(report)
        }
        Err(err) => {
            warn!("event=sync module=sync status=error stage=merge error={err}");
            notifier.notify(Notice::new("Failed to sync with server."));
            Err(err.into())
        }
    }
}
