//! rouse-core — shared types and configuration.
//! All other rouse crates depend on this one.

pub mod config;
pub mod host;

pub use host::{is_valid_mac, Host, HostStatus, DEFAULT_NAME, DEFAULT_OWNER};
