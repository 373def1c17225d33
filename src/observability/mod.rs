//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Config loader, reload loop, watcher:
//!     → logging.rs (structured log events)
//!     → metrics.rs (load counters, last-load timestamp)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with `tracing` fields, never formatted-in values
//! - Metrics go through the `metrics` facade; without an installed
//!   recorder every call is a no-op, which keeps tests silent

pub mod logging;
pub mod metrics;
