//! The reload loop.
//!
//! # State Transitions
//! ```text
//! Init          → Loading        unconditional first load
//! Loading       → Published      load succeeded
//! Loading       → Loading        not found, nothing published yet, under the retry limit
//! Loading       → Fatal          nothing published yet, any other failure or retries exhausted
//! Loading       → AwaitingEvent  load failed after a publish (keep current snapshot)
//! Published     → AwaitingEvent  consumer accepted the snapshot
//! AwaitingEvent → Loading        reload requested
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::loader::{ConfigSource, LoadError};
use crate::config::schema::ConfigSnapshot;
use crate::observability::metrics;
use crate::reload::trigger::{ReloadReason, ReloadTrigger};

/// Number of consecutive "not found" results tolerated before the first load
/// is declared fatal.
pub const NOT_FOUND_LIMIT: u32 = 5;

/// Anything that can produce a complete snapshot on demand.
pub trait SnapshotSource: Send {
    /// Where snapshots come from, for log messages.
    fn location(&self) -> &Path;

    fn load(&mut self) -> Result<ConfigSnapshot, LoadError>;
}

impl SnapshotSource for ConfigSource {
    fn location(&self) -> &Path {
        self.path()
    }

    fn load(&mut self) -> Result<ConfigSnapshot, LoadError> {
        ConfigSource::load(self)
    }
}

/// Tunables for [`ReloadLoop`].
#[derive(Debug, Clone)]
pub struct ReloadOptions {
    /// Not-found attempts allowed for the first load.
    pub not_found_limit: u32,
    /// Pause between first-load attempts.
    pub retry_delay: Duration,
    /// Quiet period after a request, so bursts of file events land in one load.
    pub settle: Duration,
}

impl Default for ReloadOptions {
    fn default() -> Self {
        Self {
            not_found_limit: NOT_FOUND_LIMIT,
            retry_delay: Duration::from_millis(500),
            settle: Duration::from_millis(50),
        }
    }
}

/// The first load failed; the daemon cannot start.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("config file not loaded after {attempts} attempts: {source}")]
    NotFound {
        attempts: u32,
        #[source]
        source: LoadError,
    },

    #[error("can't read config file: {0}")]
    InitialLoad(#[source] LoadError),
}

/// Lock-free view of the most recently published snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotHandle(Arc<ArcSwapOption<ConfigSnapshot>>);

impl SnapshotHandle {
    fn new() -> Self {
        Self(Arc::new(ArcSwapOption::empty()))
    }

    /// `None` until the first snapshot has been published.
    pub fn load(&self) -> Option<Arc<ConfigSnapshot>> {
        self.0.load_full()
    }

    fn store(&self, snapshot: Arc<ConfigSnapshot>) {
        self.0.store(Some(snapshot));
    }
}

enum Phase {
    Init,
    AwaitingEvent,
    Loading,
    Published(Arc<ConfigSnapshot>),
    Fatal(FatalError),
}

/// Turns reload requests into an ordered stream of snapshots for one consumer.
pub struct ReloadLoop<S> {
    source: S,
    options: ReloadOptions,
    requests: mpsc::Receiver<ReloadReason>,
    snapshots: mpsc::Sender<Arc<ConfigSnapshot>>,
    current: SnapshotHandle,
    not_found: u32,
    published: u64,
}

impl<S: SnapshotSource> ReloadLoop<S> {
    /// Create the loop.
    ///
    /// Returns the loop, a trigger for requesting reloads, and the receiver
    /// every published snapshot is delivered to.
    pub fn new(
        source: S,
        options: ReloadOptions,
    ) -> (Self, ReloadTrigger, mpsc::Receiver<Arc<ConfigSnapshot>>) {
        let (trigger, requests) = ReloadTrigger::new();
        let (snapshots, snapshot_rx) = mpsc::channel(1);

        let reload_loop = Self {
            source,
            options,
            requests,
            snapshots,
            current: SnapshotHandle::new(),
            not_found: 0,
            published: 0,
        };
        (reload_loop, trigger, snapshot_rx)
    }

    pub fn current(&self) -> SnapshotHandle {
        self.current.clone()
    }

    /// Run until the process can no longer make progress.
    ///
    /// Returns `Ok` once every trigger or the consumer is gone, and `Err`
    /// only when the very first load fails.
    pub async fn run(mut self) -> Result<(), FatalError> {
        let path = self.source.location().to_path_buf();
        let mut phase = Phase::Init;

        loop {
            phase = match phase {
                Phase::Init => Phase::Loading,

                Phase::AwaitingEvent => match self.next_request().await {
                    Some(reason) => {
                        tracing::info!(reason = %reason, path = %path.display(), "Reload the config file");
                        Phase::Loading
                    }
                    None => {
                        tracing::info!("All reload triggers dropped, config loop exiting");
                        return Ok(());
                    }
                },

                Phase::Loading => self.load().await,

                Phase::Published(snapshot) => {
                    if self.published == 0 {
                        tracing::info!(path = %path.display(), "Finished reading the config file");
                    } else {
                        tracing::info!(path = %path.display(), "Config file reloaded");
                    }

                    if self.snapshots.send(snapshot.clone()).await.is_err() {
                        tracing::info!("Config consumer dropped, config loop exiting");
                        return Ok(());
                    }
                    self.current.store(snapshot);
                    self.published += 1;
                    metrics::record_published();
                    Phase::AwaitingEvent
                }

                Phase::Fatal(err) => {
                    tracing::error!(path = %path.display(), error = %err, "Can't read config file");
                    return Err(err);
                }
            };
        }
    }

    /// Wait for a request, then absorb anything that arrives while settling.
    async fn next_request(&mut self) -> Option<ReloadReason> {
        let reason = self.requests.recv().await?;

        if !self.options.settle.is_zero() {
            tokio::time::sleep(self.options.settle).await;
        }
        while let Ok(extra) = self.requests.try_recv() {
            tracing::debug!(reason = %extra, "Coalesced reload request");
        }
        Some(reason)
    }

    async fn load(&mut self) -> Phase {
        let err = match self.source.load() {
            Ok(snapshot) => {
                metrics::record_load("success");
                return Phase::Published(Arc::new(snapshot));
            }
            Err(err) => err,
        };

        let path = self.source.location();
        if self.published > 0 {
            if err.is_not_found() {
                metrics::record_not_found();
            } else {
                metrics::record_load("error");
            }
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "Can't reload config file, keeping current configuration"
            );
            return Phase::AwaitingEvent;
        }

        if !err.is_not_found() {
            metrics::record_load("error");
            return Phase::Fatal(FatalError::InitialLoad(err));
        }

        metrics::record_not_found();
        self.not_found += 1;
        tracing::warn!(path = %path.display(), attempt = self.not_found, "Config file not loaded");

        if self.not_found < self.options.not_found_limit {
            tokio::time::sleep(self.options.retry_delay).await;
            return Phase::Loading;
        }

        tracing::warn!(path = %path.display(), "Config file not loaded (max times exceeded)");
        Phase::Fatal(FatalError::NotFound {
            attempts: self.not_found,
            source: err,
        })
    }
}
