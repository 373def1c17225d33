//! Reload requests.
//!
//! Producers (the file watcher, the SIGHUP forwarder, tests) hold a
//! [`ReloadTrigger`]. Requests go through a single-slot queue: while one
//! request is pending, further requests are absorbed into it.

use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::observability::metrics;

/// Why a reload was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadReason {
    /// The watcher saw the config file change.
    FileChanged,
    /// An operator asked for a reload (SIGHUP).
    Requested,
}

impl ReloadReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReloadReason::FileChanged => "file_changed",
            ReloadReason::Requested => "requested",
        }
    }
}

impl fmt::Display for ReloadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle for asking the reload loop to re-read the config file.
///
/// Cheap to clone. The loop stops once every trigger has been dropped.
#[derive(Debug, Clone)]
pub struct ReloadTrigger {
    tx: mpsc::Sender<ReloadReason>,
}

impl ReloadTrigger {
    /// Create a trigger and the receiving end of its queue.
    pub fn new() -> (Self, mpsc::Receiver<ReloadReason>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    /// Request a reload without blocking.
    ///
    /// Returns `false` when the request was folded into one already pending,
    /// or when the loop has stopped.
    pub fn request(&self, reason: ReloadReason) -> bool {
        match self.tx.try_send(reason) {
            Ok(()) => {
                metrics::record_reload_request(reason.as_str(), false);
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::debug!(reason = %reason, "Reload already pending");
                metrics::record_reload_request(reason.as_str(), true);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(reason = %reason, "Reload loop stopped, request dropped");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_requests_coalesce() {
        let (trigger, mut rx) = ReloadTrigger::new();

        assert!(trigger.request(ReloadReason::FileChanged));
        for _ in 0..10 {
            assert!(!trigger.request(ReloadReason::FileChanged));
        }
        assert!(!trigger.request(ReloadReason::Requested));

        assert_eq!(rx.recv().await, Some(ReloadReason::FileChanged));
        assert!(rx.try_recv().is_err());

        // Slot is free again
        assert!(trigger.request(ReloadReason::Requested));
        assert_eq!(rx.recv().await, Some(ReloadReason::Requested));
    }

    #[tokio::test]
    async fn test_closed_loop() {
        let (trigger, rx) = ReloadTrigger::new();
        drop(rx);

        assert!(trigger.is_closed());
        assert!(!trigger.request(ReloadReason::Requested));
    }

    #[test]
    fn test_request_from_plain_thread() {
        let (trigger, mut rx) = ReloadTrigger::new();
        let remote = trigger.clone();

        std::thread::spawn(move || remote.request(ReloadReason::FileChanged))
            .join()
            .unwrap();

        assert_eq!(rx.try_recv().ok(), Some(ReloadReason::FileChanged));
    }
}
