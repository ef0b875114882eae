//! Capstan - idempotent single-host deployment orchestrator
//!
//! Capstan converges one remote host to a desired deployed state: static
//! asset in the web root, managed data symlink repaired, service unit file
//! installed, executable replaced with self-write protection, and the
//! service restarted and enabled on boot. Every step is idempotent, so a
//! failed run is recovered by simply running the pipeline again.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod pipeline;
pub mod ports;

// Re-exports for convenience
pub use config::{Config, ConfigWarning, DeploySpec};
pub use error::{CapstanError, CapstanResult};
pub use infrastructure::{ConsoleEventSink, JsonEventSink, SshTransport, SystemdSupervisor};
pub use pipeline::plan::{ChangeKind, DeployPlan, PlannedChange};
pub use pipeline::{Deployment, RunSummary};
pub use ports::events::{DeployEvent, DeployEventSink, NoopEventSink, Step};
pub use ports::supervisor::{Supervisor, SupervisorError};
pub use ports::transport::{Transport, TransportError};
