//! roused — LAN host registry daemon with reachability probing and
//! wake-on-LAN.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use rouse_core::config::RouseConfig;
use rouse_services::{
    HostRegistry, IcmpProbe, MacResolver, ProcNeighborTable, StatusProber, WakeSender,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = RouseConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = RouseConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        RouseConfig::default()
    });
    tracing::info!(
        api_port = config.network.api_port,
        interval_secs = config.probe.interval_secs,
        "roused starting"
    );

    // Registry, loaded from durable storage
    if let Some(parent) = config.storage.hosts_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create data directory")?;
    }
    let registry = HostRegistry::with_persistence(config.storage.hosts_path.clone());
    tracing::info!(
        count = registry.len(),
        path = %config.storage.hosts_path.display(),
        "registry ready"
    );

    // Core collaborators
    let probe = Arc::new(IcmpProbe);
    let neighbors = Arc::new(ProcNeighborTable::new());
    let resolver = Arc::new(MacResolver::new(
        probe.clone(),
        neighbors,
        Duration::from_millis(config.probe.prime_timeout_ms),
    ));
    let broadcast_addr: IpAddr = config
        .wake
        .broadcast_addr
        .parse()
        .with_context(|| format!("invalid broadcast address '{}'", config.wake.broadcast_addr))?;
    let waker = Arc::new(WakeSender::new(broadcast_addr, config.wake.port));

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Spawn tasks ──────────────────────────────────────────────────────────

    let prober_task = tokio::spawn(
        StatusProber::new(
            registry.clone(),
            probe,
            Duration::from_secs(config.probe.interval_secs),
            Duration::from_millis(config.probe.timeout_ms),
        )
        .run(shutdown_tx.subscribe()),
    );

    let api_task = {
        let state = rouse_api::ApiState {
            registry,
            resolver,
            waker,
        };
        let port = config.network.api_port;
        tokio::spawn(async move {
            if let Err(e) = rouse_api::serve(state, port).await {
                tracing::error!(error = %e, "API server failed");
            }
        })
    };

    // ── Wait for exit ────────────────────────────────────────────────────────

    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => tracing::info!("shutting down"),
        r = prober_task        => tracing::error!("prober task exited: {:?}", r),
        r = api_task           => tracing::error!("API task exited: {:?}", r),
    }

    Ok(())
}
