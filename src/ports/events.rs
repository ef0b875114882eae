//! Deploy Event Port
//!
//! Provides an observable interface for deployment runs. Enables progress
//! reporting, JSON event streams, and debugging without coupling the
//! pipeline to any particular output.

/// One of the convergence steps, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AssetSync,
    DataLinkRepair,
    ServiceQuiescer,
    UnitInstaller,
    BinaryDeployer,
    ServiceActivator,
}

impl Step {
    /// Human-readable step name
    pub fn name(&self) -> &'static str {
        match self {
            Step::AssetSync => "sync static asset",
            Step::DataLinkRepair => "repair data link",
            Step::ServiceQuiescer => "stop running service",
            Step::UnitInstaller => "install unit file",
            Step::BinaryDeployer => "deploy binary",
            Step::ServiceActivator => "activate service",
        }
    }

    /// Stable identifier for machine-readable output
    pub fn id(&self) -> &'static str {
        match self {
            Step::AssetSync => "asset_sync",
            Step::DataLinkRepair => "data_link_repair",
            Step::ServiceQuiescer => "service_quiescer",
            Step::UnitInstaller => "unit_installer",
            Step::BinaryDeployer => "binary_deployer",
            Step::ServiceActivator => "service_activator",
        }
    }
}

/// Event emitted during a deployment run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Run started
    RunStarted { unit: String },

    /// A convergence step started
    StepStarted { step: Step },

    /// A convergence step completed
    StepCompleted { step: Step },

    /// A convergence step was a deliberate no-op
    StepSkipped { step: Step, reason: String },

    /// Run completed; the service is installed, enabled, and running
    RunCompleted { steps_run: usize },

    /// Run aborted at `step`; earlier steps remain applied
    RunFailed { step: Step, error: String },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: silent operation
pub trait DeployEventSink {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {
        // Do nothing
    }
}
