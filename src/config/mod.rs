//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/YAML/JSON)
//!     → format.rs (pick parser from hint or extension)
//!     → loader.rs (read & deserialize, unknown keys rejected)
//!     → defaults.rs (fill unset values, inherit from peer groups)
//!     → ConfigSnapshot (complete, immutable)
//!
//! On change:
//!     watcher.rs detects a write or rename in the config directory
//!     → ReloadTrigger (see reload/)
//!     → loader.rs loads a fresh snapshot
//! ```
//!
//! # Design Decisions
//! - A snapshot is never patched; every change produces a new one
//! - Serde handles syntax and schema, defaults.rs the few semantic checks
//!   the diff relies on (unique names and addresses)

pub mod defaults;
pub mod format;
pub mod loader;
pub mod schema;
pub mod watcher;

pub use format::{ConfigFormat, FormatHint};
pub use loader::{ConfigSource, LoadError, ParseError};
pub use schema::{ConfigSnapshot, Neighbor, PeerGroup, RoutingPolicy};
pub use watcher::{ConfigWatcher, WatchError};
