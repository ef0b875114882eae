//! Deployment pipeline
//!
//! Runs the convergence steps strictly in order against one host:
//!
//! 1. sync the static asset
//! 2. repair the managed data link
//! 3. stop the service if its unit is installed
//! 4. install the unit file
//! 5. replace the binary (self-write-protected)
//! 6. reload definitions, start, enable on boot
//!
//! The first error aborts the remainder of the run. Nothing is rolled
//! back; every step is idempotent, so re-running the whole pipeline from
//! any intermediate state converges to the same end state.

pub mod plan;
pub mod steps;

use crate::config::DeploySpec;
use crate::error::CapstanResult;
use crate::ports::events::{DeployEvent, DeployEventSink, Step};
use crate::ports::supervisor::Supervisor;
use crate::ports::transport::Transport;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps that performed work (skipped steps not counted)
    pub steps_run: usize,
    /// Whether an already-installed unit was stopped before the binary
    /// was replaced
    pub stopped_existing_unit: bool,
}

/// One deployment run against one target host
pub struct Deployment<'a, T: Transport, S: Supervisor> {
    spec: &'a DeploySpec,
    transport: &'a T,
    supervisor: &'a S,
    events: &'a dyn DeployEventSink,
}

impl<'a, T: Transport, S: Supervisor> Deployment<'a, T, S> {
    /// Create a run over explicit collaborators; nothing is ambient, so
    /// the same pipeline can be driven across hosts by an external
    /// fan-out loop.
    pub fn new(
        spec: &'a DeploySpec,
        transport: &'a T,
        supervisor: &'a S,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            spec,
            transport,
            supervisor,
            events,
        }
    }

    /// Execute the full pipeline
    pub fn run(&self) -> CapstanResult<RunSummary> {
        self.events.on_event(DeployEvent::RunStarted {
            unit: self.spec.unit.clone(),
        });

        let mut steps_run = 0;

        self.step(Step::AssetSync, || {
            steps::sync_asset(self.spec, self.transport)
        })?;
        steps_run += 1;

        self.step(Step::DataLinkRepair, || {
            steps::repair_data_link(self.spec, self.transport)
        })?;
        steps_run += 1;

        let stopped_existing_unit = self.quiesce()?;
        if stopped_existing_unit {
            steps_run += 1;
        }

        self.step(Step::UnitInstaller, || {
            steps::install_unit(self.spec, self.transport)
        })?;
        steps_run += 1;

        self.step(Step::BinaryDeployer, || {
            steps::deploy_binary(self.spec, self.transport)
        })?;
        steps_run += 1;

        self.step(Step::ServiceActivator, || {
            steps::activate_service(self.spec, self.supervisor)
        })?;
        steps_run += 1;

        self.events
            .on_event(DeployEvent::RunCompleted { steps_run });

        Ok(RunSummary {
            steps_run,
            stopped_existing_unit,
        })
    }

    fn step<R>(&self, step: Step, f: impl FnOnce() -> CapstanResult<R>) -> CapstanResult<R> {
        self.events.on_event(DeployEvent::StepStarted { step });
        match f() {
            Ok(value) => {
                self.events.on_event(DeployEvent::StepCompleted { step });
                Ok(value)
            }
            Err(err) => {
                self.events.on_event(DeployEvent::RunFailed {
                    step,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn quiesce(&self) -> CapstanResult<bool> {
        let step = Step::ServiceQuiescer;
        self.events.on_event(DeployEvent::StepStarted { step });
        match steps::quiesce_service(self.spec, self.supervisor) {
            Ok(true) => {
                self.events.on_event(DeployEvent::StepCompleted { step });
                Ok(true)
            }
            Ok(false) => {
                self.events.on_event(DeployEvent::StepSkipped {
                    step,
                    reason: "unit not installed yet, nothing to stop".to_string(),
                });
                Ok(false)
            }
            Err(err) => {
                self.events.on_event(DeployEvent::RunFailed {
                    step,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }
}
