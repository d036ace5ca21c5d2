//! Registry store — the single owned collection of host entries.
//!
//! Two actor classes touch it: request handlers (structural mutations and
//! identity fields) and the status prober (status field only). All access
//! goes through this type; `list()` hands out a cloned snapshot so iteration
//! never holds the lock across I/O.
//!
//! When constructed with a persist path, every structural mutation writes
//! the full registry back to disk before returning. Status writes are
//! ephemeral and never trigger persistence.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rouse_core::{Host, HostStatus, DEFAULT_NAME, DEFAULT_OWNER};

/// Fields for a new entry. Missing name/owner fall back to placeholders.
#[derive(Debug, Default, Clone)]
pub struct NewHost {
    pub ip: String,
    pub mac: String,
    pub name: Option<String>,
    pub owner: Option<String>,
}

/// Partial update — `None` leaves the field untouched.
#[derive(Debug, Default, Clone)]
pub struct HostPatch {
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
}

/// Clonable handle to the host registry.
pub struct HostRegistry {
    hosts: Arc<RwLock<Vec<Host>>>,
    persist_path: Arc<Option<PathBuf>>,
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HostRegistry {
    /// In-memory registry with no durable storage. Used by tests.
    pub fn new() -> Self {
        Self {
            hosts: Arc::new(RwLock::new(Vec::new())),
            persist_path: Arc::new(None),
        }
    }

    /// Registry persisted to the given file path. Loads the existing
    /// snapshot if the file is present, starts empty otherwise.
    pub fn with_persistence(path: PathBuf) -> Self {
        let registry = Self {
            hosts: Arc::new(RwLock::new(Vec::new())),
            persist_path: Arc::new(Some(path)),
        };
        registry.load_from_disk();
        registry
    }

    /// Snapshot of all entries, safe to iterate while mutations occur.
    pub fn list(&self) -> Vec<Host> {
        self.read().clone()
    }

    pub fn get(&self, id: u64) -> Option<Host> {
        self.read().iter().find(|h| h.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Insert a new entry. The id is one greater than the current maximum
    /// (1 when empty) — recomputed each call, so deleting the highest entry
    /// makes its id available again.
    pub fn add(&self, new: NewHost) -> Host {
        let host = {
            let mut hosts = self.write();
            let id = hosts.iter().map(|h| h.id).max().unwrap_or(0) + 1;
            let host = Host {
                id,
                ip: new.ip,
                mac: new.mac,
                name: new.name.filter(|n| !n.is_empty()).unwrap_or_else(|| DEFAULT_NAME.into()),
                owner: new.owner.filter(|o| !o.is_empty()).unwrap_or_else(|| DEFAULT_OWNER.into()),
                status: HostStatus::Offline,
            };
            hosts.push(host.clone());
            host
        };
        self.save_to_disk();
        tracing::info!(id = host.id, ip = %host.ip, "host added");
        host
    }

    /// Apply a partial update to identity fields. Returns the updated entry,
    /// or `None` when the id is unknown. Never touches `status`.
    pub fn update(&self, id: u64, patch: HostPatch) -> Option<Host> {
        let updated = {
            let mut hosts = self.write();
            let host = hosts.iter_mut().find(|h| h.id == id)?;
            if let Some(ip) = patch.ip {
                host.ip = ip;
            }
            if let Some(mac) = patch.mac {
                host.mac = mac;
            }
            if let Some(name) = patch.name {
                host.name = name;
            }
            if let Some(owner) = patch.owner {
                host.owner = owner;
            }
            host.clone()
        };
        self.save_to_disk();
        tracing::info!(id, "host updated");
        Some(updated)
    }

    /// Remove an entry. Returns `false` (and performs no storage write)
    /// when the id is unknown.
    pub fn delete(&self, id: u64) -> bool {
        let removed = {
            let mut hosts = self.write();
            let before = hosts.len();
            hosts.retain(|h| h.id != id);
            hosts.len() != before
        };
        if removed {
            self.save_to_disk();
            tracing::info!(id, "host deleted");
        }
        removed
    }

    /// Prober-only write path: set the status of one entry in place.
    /// A no-op when the entry was deleted since the prober's snapshot.
    pub fn set_status(&self, id: u64, status: HostStatus) {
        let mut hosts = self.write();
        if let Some(host) = hosts.iter_mut().find(|h| h.id == id) {
            host.status = status;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Host>> {
        self.hosts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Host>> {
        self.hosts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostRegistry {
    /// Serialize the full registry to disk as JSON. Best-effort — logs on
    /// failure. serde_json writes non-ASCII text verbatim, so localized
    /// names survive the round trip.
    fn save_to_disk(&self) {
        let path = match self.persist_path.as_ref() {
            Some(p) => p,
            None => return,
        };
        let snapshot = self.list();
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    tracing::warn!(error = %e, path = %path.display(), "failed to persist registry");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize registry");
            }
        }
    }

    /// Load the snapshot from disk. Called once during construction.
    fn load_from_disk(&self) {
        let path = match self.persist_path.as_ref() {
            Some(p) => p,
            None => return,
        };
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "failed to read registry");
                return;
            }
        };
        let loaded: Vec<Host> = match serde_json::from_str(&text) {
            Ok(hosts) => hosts,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "failed to parse registry");
                return;
            }
        };
        let count = loaded.len();
        *self.write() = loaded;
        if count > 0 {
            tracing::info!(count, path = %path.display(), "loaded persisted hosts");
        }
    }
}

impl Clone for HostRegistry {
    fn clone(&self) -> Self {
        Self {
            hosts: self.hosts.clone(),
            persist_path: self.persist_path.clone(),
        }
    }
}
