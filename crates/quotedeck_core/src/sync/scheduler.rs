//! Periodic sync scheduler.
//!
//! A detached background thread runs one round immediately, then every
//! interval for the remainder of the process lifetime. It is never
//! cancelled and applies no backoff or jitter.
//!
//! The fetch runs without the service lock; the merge takes the lock once.
//! The duplicate check therefore sees the collection as of merge start,
//! not fetch start, and quotes added while a fetch is in flight are not
//! coordinated with it.

use crate::notify::{Notice, Notifier};
use crate::repo::kv_repo::KvRepository;
use crate::service::quote_service::QuoteService;
use crate::sync::{merge_fetched, RemoteQuoteSource};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default interval between sync rounds.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Spawns the periodic sync thread over a shared service handle.
///
/// The returned handle is not joined in normal operation; the thread ends
/// with the process.
pub fn spawn_sync_scheduler<R, S, N>(
    service: Arc<Mutex<QuoteService<R>>>,
    source: S,
    notifier: N,
    interval: Duration,
) -> JoinHandle<()>
where
    R: KvRepository + Send + 'static,
    S: RemoteQuoteSource + Send + 'static,
    N: Notifier + Send + 'static,
{
    thread::spawn(move || {
        info!(
            "event=scheduler_start module=sync status=ok interval_secs={}",
            interval.as_secs()
        );
        loop {
            run_round(&service, &source, &notifier);
            thread::sleep(interval);
        }
    })
}

fn run_round<R, S, N>(service: &Arc<Mutex<QuoteService<R>>>, source: &S, notifier: &N)
where
    R: KvRepository,
    S: RemoteQuoteSource,
    N: Notifier,
{
    notifier.notify(Notice::new("Syncing quotes with server..."));

    let candidates = match source.fetch_quotes() {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!("event=sync module=sync status=error stage=fetch error={err}");
            notifier.notify(Notice::new("Failed to sync with server."));
            return;
        }
    };

    let Ok(mut guard) = service.lock() else {
        warn!("event=sync module=sync status=error stage=merge error=service_lock_poisoned");
        return;
    };
    // Outcome notices are handled inside; a merge failure only skips this
    // round, the timer keeps running.
    let _ = merge_fetched(&mut guard, candidates, notifier);
}
