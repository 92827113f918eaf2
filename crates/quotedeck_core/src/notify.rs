//! Transient user-facing notifications.
//!
//! Sync progress and outcomes surface as short-lived notices. Delivery goes
//! through a trait so the CLI, tests and the background sync thread can each
//! render notices their own way; auto-dismissal after `duration_ms` is the
//! front end's concern and the duration only travels with the message.

use log::info;

/// Default display duration, in milliseconds.
pub const DEFAULT_NOTICE_DURATION_MS: u64 = 3000;

/// A transient message with a suggested display duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub duration_ms: u64,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration_ms: DEFAULT_NOTICE_DURATION_MS,
        }
    }

    pub fn with_duration(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            message: message.into(),
            duration_ms,
        }
    }
}

/// Sink for transient notices.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Records notices through the logging backend. Default sink for headless
/// runs and tests that only care about side effects elsewhere.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        info!(
            "event=notice module=notify duration_ms={} message={}",
            notice.duration_ms, notice.message
        );
    }
}
