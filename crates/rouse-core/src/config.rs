//! Configuration system for rouse.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $ROUSE_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/rouse/config.toml
//!   3. ~/.config/rouse/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouseConfig {
    pub network: NetworkConfig,
    pub storage: StorageConfig,
    pub probe: ProbeConfig,
    pub wake: WakeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP port the HTTP API listens on.
    pub api_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the registry snapshot file.
    pub hosts_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Seconds between status cycles.
    pub interval_secs: u64,
    /// Per-host probe timeout in milliseconds.
    pub timeout_ms: u64,
    /// Timeout for the neighbor-cache priming probe, milliseconds.
    pub prime_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    /// Destination for magic packets. The limited broadcast address by
    /// default; a subnet-directed broadcast also works.
    pub broadcast_addr: String,
    /// UDP port magic packets are sent to. 9 is the discard port.
    pub port: u16,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for RouseConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            storage: StorageConfig::default(),
            probe: ProbeConfig::default(),
            wake: WakeConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { api_port: 5000 }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            hosts_path: data_dir().join("hosts.json"),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            timeout_ms: 500,
            prime_timeout_ms: 200,
        }
    }
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            broadcast_addr: "255.255.255.255".to_string(),
            port: 9,
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("rouse")
}

pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".local").join("share"))
        .join("rouse")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl RouseConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            RouseConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("ROUSE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&RouseConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text)
                .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply ROUSE_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ROUSE_NETWORK__API_PORT") {
            if let Ok(p) = v.parse() {
                self.network.api_port = p;
            }
        }
        if let Ok(v) = std::env::var("ROUSE_STORAGE__HOSTS_PATH") {
            self.storage.hosts_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ROUSE_PROBE__INTERVAL_SECS") {
            if let Ok(s) = v.parse() {
                self.probe.interval_secs = s;
            }
        }
        if let Ok(v) = std::env::var("ROUSE_PROBE__TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.probe.timeout_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("ROUSE_WAKE__BROADCAST_ADDR") {
            self.wake.broadcast_addr = v;
        }
        if let Ok(v) = std::env::var("ROUSE_WAKE__PORT") {
            if let Ok(p) = v.parse() {
                self.wake.port = p;
            }
        }
    }
}
