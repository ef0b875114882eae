//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the deployment core.
//! Infrastructure layer provides concrete implementations.

pub mod events;
pub mod supervisor;
pub mod transport;

pub use events::{DeployEvent, DeployEventSink, NoopEventSink, Step};
pub use supervisor::{Supervisor, SupervisorError};
pub use transport::{Transport, TransportError};
