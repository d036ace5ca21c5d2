//! Status prober — the long-lived loop that keeps every entry's
//! reachability field current.
//!
//! Each cycle snapshots the registry, probes every host concurrently, and
//! writes statuses back in place. One host's failure never touches another:
//! a probe error maps to `error` status for that entry and nothing else.
//! Status writes bypass persistence — status is derived state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use rouse_core::HostStatus;

use crate::probe::ReachabilityProbe;
use crate::registry::HostRegistry;

pub struct StatusProber {
    registry: HostRegistry,
    probe: Arc<dyn ReachabilityProbe>,
    interval: Duration,
    timeout: Duration,
}

impl StatusProber {
    pub fn new(
        registry: HostRegistry,
        probe: Arc<dyn ReachabilityProbe>,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            probe,
            interval,
            timeout,
        }
    }

    /// Run for the lifetime of the process. The shutdown receiver is the
    /// only exit path; individual probes carry their own timeouts and the
    /// loop itself is never cancelled mid-cycle.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.interval);
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            timeout_ms = self.timeout.as_millis() as u64,
            "status prober starting"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => self.run_once().await,
                _ = shutdown.recv() => {
                    tracing::info!("status prober stopping");
                    return;
                }
            }
        }
    }

    /// One probe cycle. Public so tests can drive cycles directly.
    pub async fn run_once(&self) {
        // snapshot tolerates concurrent structural mutation; entries added
        // after this point are picked up next cycle
        let snapshot = self.registry.list();
        if snapshot.is_empty() {
            return;
        }

        let probes = snapshot.iter().map(|host| {
            let probe = self.probe.clone();
            let ip = host.ip.clone();
            let id = host.id;
            let timeout = self.timeout;
            async move {
                let status = match probe.probe(&ip, timeout).await {
                    Ok(true) => HostStatus::Online,
                    Ok(false) => HostStatus::Offline,
                    Err(e) => {
                        tracing::warn!(ip = %ip, error = %e, "probe error");
                        HostStatus::Error
                    }
                };
                (id, status)
            }
        });

        for (id, status) in futures::future::join_all(probes).await {
            self.registry.set_status(id, status);
        }
        tracing::trace!(count = snapshot.len(), "probe cycle complete");
    }
}
