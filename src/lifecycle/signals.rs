//! OS signal handling.
//!
//! # Responsibilities
//! - SIGHUP → reload request
//! - SIGINT/SIGTERM → process shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP goes through the same queue as file events, so a flood of
//!   signals coalesces like a flood of writes

use crate::reload::{ReloadReason, ReloadTrigger};

/// Forward SIGHUP to the reload loop until the loop stops.
#[cfg(unix)]
pub async fn forward_reload_signals(trigger: ReloadTrigger) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    while hangup.recv().await.is_some() {
        tracing::info!("SIGHUP received");
        trigger.request(ReloadReason::Requested);
        if trigger.is_closed() {
            break;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn forward_reload_signals(_trigger: ReloadTrigger) -> std::io::Result<()> {
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
