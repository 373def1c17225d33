//! Configuration reload subsystem.
//!
//! # Data Flow
//! ```text
//! notify event (config/watcher.rs) ─┐
//! SIGHUP (lifecycle/signals.rs) ────┼─→ ReloadTrigger (single-slot queue)
//! tests ────────────────────────────┘        │
//!                                            ▼
//!                                       ReloadLoop ─→ SnapshotSource::load
//!                                            │
//!                                            ▼
//!                         mpsc (capacity 1) → consumer → diff::ChangeTracker
//!                         SnapshotHandle   → any reader
//! ```
//!
//! # Design Decisions
//! - One task owns the loop; it is the only caller of the loader and the
//!   only writer of the current snapshot
//! - At most one request waits while a load is in flight
//! - Publishing blocks until the consumer has room, so the loop never races
//!   ahead of a consumer still applying a previous change set
//! - Only the first load may be fatal; later failures keep the last good
//!   snapshot

pub mod service;
pub mod trigger;

pub use service::{FatalError, ReloadLoop, ReloadOptions, SnapshotHandle, SnapshotSource, NOT_FOUND_LIMIT};
pub use trigger::{ReloadReason, ReloadTrigger};
