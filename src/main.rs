//! BGP configuration reload daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──notify──▶ ConfigWatcher ──┐
//!                                           ├──▶ ReloadTrigger ──▶ ReloadLoop ──▶ ConfigSource::load
//!   SIGHUP ────────────────▶ signals ───────┘                          │
//!                                                                      ▼
//!                                                   snapshot channel (capacity 1)
//!                                                                      │
//!                                                                      ▼
//!                                              consumer: ChangeTracker → ConfigChanges → log
//! ```
//!
//! Reconciliation against live BGP sessions is external; this binary logs the
//! change sets it would hand over.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use bgp_confd::config::{ConfigSnapshot, ConfigSource, ConfigWatcher, FormatHint};
use bgp_confd::diff::{ChangeTracker, ConfigChanges};
use bgp_confd::lifecycle::signals;
use bgp_confd::observability::{logging, metrics};
use bgp_confd::reload::{ReloadLoop, ReloadOptions};

#[derive(Parser, Debug)]
#[command(name = "bgp-confd", version)]
#[command(about = "Keeps a BGP daemon's configuration in sync with its config file")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short = 'f', long = "config-file")]
    config_file: PathBuf,

    /// Config format: toml, yaml, json or auto (from the file extension).
    #[arg(short = 't', long = "config-type", default_value = "auto")]
    config_type: FormatHint,

    /// Default log level when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    /// Pause between attempts while the config file is missing at startup.
    #[arg(long, default_value_t = 500)]
    retry_delay_ms: u64,

    /// Quiet period that folds bursts of file events into one reload.
    #[arg(long, default_value_t = 50)]
    settle_ms: u64,

    /// Load the config once, print it as JSON and exit.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json);

    let source = ConfigSource::new(&cli.config_file, cli.config_type);

    if cli.dry_run {
        let snapshot = source.load()?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    tracing::info!(
        path = %cli.config_file.display(),
        format = %source.format(),
        "bgp-confd v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if let Some(addr) = cli.metrics_address {
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(metrics_address = %addr, error = %e, "Failed to start metrics endpoint");
        }
    }

    let options = ReloadOptions {
        retry_delay: Duration::from_millis(cli.retry_delay_ms),
        settle: Duration::from_millis(cli.settle_ms),
        ..Default::default()
    };
    let (reload_loop, trigger, mut snapshots) = ReloadLoop::new(source, options);

    // Without a watcher the daemon can still be reloaded with SIGHUP.
    let _watcher = match ConfigWatcher::new(&cli.config_file, trigger.clone()).run() {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(error = %e, "Config file watch unavailable, reload with SIGHUP only");
            None
        }
    };

    let signal_trigger = trigger.clone();
    tokio::spawn(async move {
        if let Err(e) = signals::forward_reload_signals(signal_trigger).await {
            tracing::warn!(error = %e, "Failed to install SIGHUP handler");
        }
    });
    drop(trigger);

    let mut loop_task = tokio::spawn(reload_loop.run());

    tokio::spawn(async move {
        let mut tracker = ChangeTracker::new();
        while let Some(snapshot) = snapshots.recv().await {
            let changes = tracker.changes(&snapshot);
            report_changes(&snapshot, &changes);
            tracker.commit(snapshot);
        }
    });

    tokio::select! {
        res = &mut loop_task => match res {
            Ok(Ok(())) => tracing::info!("Config loop stopped"),
            // The loop has already logged why.
            Ok(Err(_)) => std::process::exit(1),
            Err(e) => return Err(e.into()),
        },
        _ = signals::shutdown_signal() => {}
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log what reconciliation would have to apply.
fn report_changes(snapshot: &Arc<ConfigSnapshot>, changes: &ConfigChanges) {
    if changes.is_empty() {
        tracing::info!("Config unchanged");
        return;
    }

    if changes.global_changed {
        tracing::warn!(
            router_id = %snapshot.global.config.router_id,
            as_number = snapshot.global.config.as_number,
            "Global config changed; restart required to apply"
        );
    }

    for pg in &changes.peer_groups.added {
        tracing::info!(peer_group = %pg.name(), "Peer group added");
    }
    for pg in &changes.peer_groups.deleted {
        tracing::info!(peer_group = %pg.name(), "Peer group deleted");
    }
    for pg in &changes.peer_groups.updated {
        tracing::info!(peer_group = %pg.name(), "Peer group updated");
    }

    for n in &changes.neighbors.added {
        tracing::info!(neighbor = %n.address(), peer_as = n.config.peer_as, "Neighbor added");
    }
    for n in &changes.neighbors.deleted {
        tracing::info!(neighbor = %n.address(), "Neighbor deleted");
    }
    for n in &changes.neighbors.updated {
        tracing::info!(neighbor = %n.address(), "Neighbor updated");
    }

    if changes.policy_changed {
        tracing::info!(
            policies = snapshot.policy_definitions.len(),
            "Routing policy changed, replacing"
        );
    }
}
