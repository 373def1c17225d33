//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bgp_config_loads_total` (counter): load attempts by `result`
//!   (`success`, `not_found`, `error`)
//! - `bgp_config_not_found_total` (counter): loads that found no config file
//! - `bgp_config_reload_requests_total` (counter): reload requests by `reason`
//!   and whether they were `coalesced`
//! - `bgp_config_last_load_timestamp_seconds` (gauge): unix time of the last
//!   published snapshot
//! - `bgp_config_published_total` (counter): snapshots handed to the consumer

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const LOADS_TOTAL: &str = "bgp_config_loads_total";
pub const NOT_FOUND_TOTAL: &str = "bgp_config_not_found_total";
pub const RELOAD_REQUESTS_TOTAL: &str = "bgp_config_reload_requests_total";
pub const LAST_LOAD_TIMESTAMP: &str = "bgp_config_last_load_timestamp_seconds";
pub const PUBLISHED_TOTAL: &str = "bgp_config_published_total";

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_load(result: &'static str) {
    metrics::counter!(LOADS_TOTAL, "result" => result).increment(1);
}

pub fn record_not_found() {
    metrics::counter!(LOADS_TOTAL, "result" => "not_found").increment(1);
    metrics::counter!(NOT_FOUND_TOTAL).increment(1);
}

pub fn record_reload_request(reason: &'static str, coalesced: bool) {
    let coalesced = if coalesced { "true" } else { "false" };
    metrics::counter!(RELOAD_REQUESTS_TOTAL, "reason" => reason, "coalesced" => coalesced).increment(1);
}

pub fn record_published() {
    metrics::counter!(PUBLISHED_TOTAL).increment(1);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    metrics::gauge!(LAST_LOAD_TIMESTAMP).set(now);
}
