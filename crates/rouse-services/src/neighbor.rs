//! Neighbor-table lookup — maps a network address to the hardware address
//! the OS has cached for it on the local link.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Read access to the OS neighbor/address-resolution cache.
#[async_trait]
pub trait NeighborTable: Send + Sync {
    /// Hardware address currently bound to `addr`, if any. `Ok(None)` when
    /// the table holds no (complete) entry for the address.
    async fn lookup(&self, addr: &str) -> Result<Option<String>>;
}

/// Neighbor table backed by `/proc/net/arp`.
///
/// The kernel only lists addresses it has actually exchanged traffic with,
/// which is why the resolver primes the cache with a probe first.
pub struct ProcNeighborTable {
    path: PathBuf,
}

impl Default for ProcNeighborTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcNeighborTable {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/proc/net/arp"),
        }
    }

    /// Read from an alternate file. Used by tests.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl NeighborTable for ProcNeighborTable {
    async fn lookup(&self, addr: &str) -> Result<Option<String>> {
        let addr = addr.trim();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        // header: IP address  HW type  Flags  HW address  Mask  Device
        for line in text.lines().skip(1) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 || fields[0] != addr {
                continue;
            }
            // flags 0x0 marks an incomplete entry with a zeroed MAC
            if fields[2] == "0x0" {
                return Ok(None);
            }
            return Ok(Some(fields[3].to_string()));
        }
        Ok(None)
    }
}
