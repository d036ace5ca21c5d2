//! HTTP API handlers — the request-handling boundary over the registry,
//! resolver and wake signaler.

pub mod hosts;
pub mod wake;

use std::sync::Arc;

use rouse_services::{HostRegistry, MacResolver, WakeSender};

#[derive(Clone)]
pub struct ApiState {
    pub registry: HostRegistry,
    pub resolver: Arc<MacResolver>,
    pub waker: Arc<WakeSender>,
}

// Re-export handler functions for use in router setup.
pub use hosts::{handle_add, handle_delete, handle_list, handle_update};
pub use wake::handle_wake;
