//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports: SSH transport, systemd
//! supervisor, and the console/JSON event sinks.

pub mod events;
pub mod ssh;
pub mod systemd;

pub use events::{ConsoleEventSink, JsonEventSink};
pub use ssh::SshTransport;
pub use systemd::SystemdSupervisor;
