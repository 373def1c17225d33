//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse flags → Init logging/metrics → Start watcher & signals → Run reload loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Exit
//!     SIGHUP → Config reload request
//! ```
//!
//! # Design Decisions
//! - A failed first load is fatal: the daemon never runs without a config
//! - Failed reloads are not: the last good config stays active

pub mod signals;
