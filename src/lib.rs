//! BGP configuration reload daemon library.
//!
//! Watches a declarative BGP config file, re-parses it on change, and hands
//! each new snapshot to a consumer that computes the minimal change set
//! against the configuration it last applied.

pub mod config;
pub mod diff;
pub mod lifecycle;
pub mod observability;
pub mod reload;

pub use config::schema::ConfigSnapshot;
pub use diff::{ChangeSet, ChangeTracker, ConfigChanges};
pub use reload::{ReloadLoop, ReloadOptions, ReloadTrigger};
