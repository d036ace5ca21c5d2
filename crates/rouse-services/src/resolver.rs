//! Hardware-address discovery: prime the neighbor cache, then query it.
//!
//! A cold cache yields no binding on first lookup for a host never
//! previously contacted, so the priming probe is mandatory, not an
//! optimization. Every failure mode folds into `Resolution::Failed` —
//! resolution is best-effort and never fatal to the caller.

use std::sync::Arc;
use std::time::Duration;

use rouse_core::is_valid_mac;

use crate::neighbor::NeighborTable;
use crate::probe::ReachabilityProbe;

/// Outcome of one resolution attempt. The string is surfaced to the end
/// user as an informational message either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Failed(String),
}

impl Resolution {
    /// The resolved address, or the empty string on failure — the form the
    /// registry stores.
    pub fn mac(&self) -> &str {
        match self {
            Resolution::Resolved(mac) => mac,
            Resolution::Failed(_) => "",
        }
    }
}

/// Best-effort MAC discovery for a given network address.
pub struct MacResolver {
    probe: Arc<dyn ReachabilityProbe>,
    neighbors: Arc<dyn NeighborTable>,
    prime_timeout: Duration,
}

impl MacResolver {
    pub fn new(
        probe: Arc<dyn ReachabilityProbe>,
        neighbors: Arc<dyn NeighborTable>,
        prime_timeout: Duration,
    ) -> Self {
        Self {
            probe,
            neighbors,
            prime_timeout,
        }
    }

    pub async fn resolve(&self, ip: &str) -> Resolution {
        let ip = ip.trim();
        if ip.is_empty() {
            return Resolution::Failed("no network address to resolve from".to_string());
        }

        // outcome discarded — this only exists to make the kernel exchange
        // traffic with the host and populate its neighbor cache
        if let Err(e) = self.probe.probe(ip, self.prime_timeout).await {
            tracing::debug!(ip, error = %e, "priming probe failed");
        }

        let mac = match self.neighbors.lookup(ip).await {
            Ok(Some(mac)) => mac,
            Ok(None) => {
                return Resolution::Failed(format!(
                    "no hardware address found for {ip} — host may be down or off-link"
                ))
            }
            Err(e) => {
                tracing::warn!(ip, error = %e, "neighbor table lookup failed");
                return Resolution::Failed(format!("hardware address lookup failed for {ip}"));
            }
        };

        if is_valid_mac(&mac) {
            tracing::info!(ip, mac = %mac, "hardware address resolved");
            Resolution::Resolved(mac)
        } else {
            Resolution::Failed(format!("neighbor table returned an unusable address for {ip}"))
        }
    }
}
