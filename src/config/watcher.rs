//! Configuration file watcher for hot reload.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::reload::{ReloadReason, ReloadTrigger};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot watch {}: path has no file name", .0.display())]
    InvalidPath(PathBuf),

    #[error("file watch failed: {0}")]
    Notify(#[from] notify::Error),
}

/// A watcher that turns config file changes into reload requests.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by writing a temp file and renaming it over the original are
/// still noticed.
pub struct ConfigWatcher {
    path: PathBuf,
    trigger: ReloadTrigger,
}

impl ConfigWatcher {
    pub fn new(path: &Path, trigger: ReloadTrigger) -> Self {
        Self {
            path: path.to_path_buf(),
            trigger,
        }
    }

    /// Start watching in notify's background thread.
    ///
    /// The returned watcher must be kept alive for events to flow.
    pub fn run(self) -> Result<RecommendedWatcher, WatchError> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| WatchError::InvalidPath(self.path.clone()))?;
        let dir = watch_dir(&self.path);
        let trigger = self.trigger;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_config_change(&event, &file_name) {
                        tracing::warn!(file = ?event.paths, "Config file changed");
                        trigger.request(ReloadReason::FileChanged);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Check if an event leaves new content at the config file name.
///
/// Renames away from the name are ignored; a reload would only find the file
/// missing.
fn is_config_change(event: &Event, file_name: &OsString) -> bool {
    let is_target = |p: &PathBuf| p.file_name() == Some(file_name.as_os_str());
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => false,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().is_some_and(is_target)
        }
        EventKind::Create(_) | EventKind::Modify(_) => event.paths.iter().any(is_target),
        _ => false,
    }
}
