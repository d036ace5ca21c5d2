//! rouse integration test harness.
//!
//! These tests exercise cross-crate flows: registry persistence, the
//! resolver against a neighbor-table fixture, prober cycles, the HTTP
//! handlers, and magic-packet delivery over loopback. Scripted fakes stand
//! in for the ICMP socket so nothing here needs elevated privileges or a
//! live network.

mod api;
mod resolver;
mod wake;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use rouse_services::{NeighborTable, ReachabilityProbe};

// ── Harness ───────────────────────────────────────────────────────────────────

/// Probe answering from a fixed table. `Some(true)`/`Some(false)` script the
/// liveness outcome; an address missing from the table (or scripted `None`)
/// produces a probe error.
pub struct ScriptedProbe {
    outcomes: HashMap<String, Option<bool>>,
    fallback: Option<bool>,
}

impl ScriptedProbe {
    pub fn new(entries: &[(&str, Option<bool>)]) -> Self {
        Self {
            outcomes: entries
                .iter()
                .map(|(ip, out)| (ip.to_string(), *out))
                .collect(),
            fallback: None,
        }
    }

    /// Probe that reports every address with the given liveness.
    pub fn uniform(alive: bool) -> Self {
        Self {
            outcomes: HashMap::new(),
            fallback: Some(alive),
        }
    }
}

#[async_trait]
impl ReachabilityProbe for ScriptedProbe {
    async fn probe(&self, addr: &str, _timeout: Duration) -> Result<bool> {
        let outcome = match self.outcomes.get(addr) {
            Some(scripted) => *scripted,
            None => self.fallback,
        };
        match outcome {
            Some(alive) => Ok(alive),
            None => Err(anyhow!("scripted probe error for {addr}")),
        }
    }
}

/// Neighbor table answering from a fixed ip → mac map.
pub struct ScriptedTable {
    entries: HashMap<String, String>,
}

impl ScriptedTable {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(ip, mac)| (ip.to_string(), mac.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl NeighborTable for ScriptedTable {
    async fn lookup(&self, addr: &str) -> Result<Option<String>> {
        Ok(self.entries.get(addr).cloned())
    }
}

/// Fresh per-test temp directory, keyed by tag and pid.
pub fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rouse-it-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}
