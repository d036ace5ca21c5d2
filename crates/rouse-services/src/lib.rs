//! rouse-services — the registry store, address resolver, status prober
//! and wake signaler. The HTTP layer and the daemon binary sit on top of
//! this crate and own no host state of their own.

pub mod neighbor;
pub mod probe;
pub mod prober;
pub mod registry;
pub mod resolver;
pub mod wake;

pub use neighbor::{NeighborTable, ProcNeighborTable};
pub use probe::{IcmpProbe, ReachabilityProbe};
pub use prober::StatusProber;
pub use registry::{HostPatch, HostRegistry, NewHost};
pub use resolver::{MacResolver, Resolution};
pub use wake::{WakeError, WakeSender};
