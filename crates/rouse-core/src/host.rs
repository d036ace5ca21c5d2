//! Host entries — the unit of tracking.

use serde::{Deserialize, Serialize};

/// Display name used when the caller supplies none.
pub const DEFAULT_NAME: &str = "New Host";
/// Owner label used when the caller supplies none.
pub const DEFAULT_OWNER: &str = "Unknown";

/// The all-zero MAC some neighbor tables report for stale entries.
const ZERO_MAC: &str = "00:00:00:00:00:00";
/// Length of a colon-separated MAC, e.g. "aa:bb:cc:dd:ee:ff".
const MAC_MIN_LEN: usize = 17;

/// Reachability state of a host, written only by the status prober.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Online,
    #[default]
    Offline,
    /// The probe itself failed — bad address, permission problem, etc.
    Error,
}

/// A registered host.
///
/// `mac` is the empty string while the hardware address is unknown.
/// `status` defaults to offline at creation and is thereafter owned by
/// the prober; add/update paths never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: u64,
    pub ip: String,
    pub mac: String,
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub status: HostStatus,
}

/// Validity filter for resolver output.
///
/// A neighbor table can hand back garbage for a host it never actually
/// heard from — an empty string, or the all-zero placeholder. Such values
/// must never be stored as a known hardware address.
pub fn is_valid_mac(mac: &str) -> bool {
    !mac.is_empty() && mac != ZERO_MAC && mac.len() >= MAC_MIN_LEN
}
