//! Supervisor port - the process-supervision capability set
//!
//! The pipeline only ever needs six capabilities from the host's service
//! manager: query unit installation, query run state, stop, start, enable
//! on boot, and reload definitions. The concrete implementation
//! (`SystemdSupervisor`) maps these to `systemctl` over the transport.

use thiserror::Error;

use crate::ports::transport::TransportError;

/// Result type for supervisor operations
pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// Supervisor failures, split into the two kinds the pipeline must keep
/// apart
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Could not determine whether a unit is installed. Never treated as
    /// "not installed": skipping the stop on a false negative would let the
    /// pipeline overwrite a running executable.
    #[error("cannot determine state of unit '{unit}': {source}")]
    Query {
        unit: String,
        source: TransportError,
    },

    /// A stop/start/enable/reload command was rejected
    #[error("supervisor command '{action}' failed: {source}")]
    Command {
        action: String,
        source: TransportError,
    },
}

/// Abstract process supervisor on the target host
pub trait Supervisor {
    /// Whether a unit definition is installed for `unit`
    fn unit_exists(&self, unit: &str) -> SupervisorResult<bool>;

    /// Whether `unit` is currently running
    fn is_active(&self, unit: &str) -> SupervisorResult<bool>;

    /// Stop `unit`. Must succeed if the unit is installed but already
    /// stopped.
    fn stop(&self, unit: &str) -> SupervisorResult<()>;

    /// Reload unit definitions, picking up a freshly installed unit file
    fn reload_definitions(&self) -> SupervisorResult<()>;

    /// Start `unit`
    fn start(&self, unit: &str) -> SupervisorResult<()>;

    /// Configure `unit` to start automatically on host boot
    fn enable_on_boot(&self, unit: &str) -> SupervisorResult<()>;
}
