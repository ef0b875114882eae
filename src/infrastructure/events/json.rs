//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::ports::events::{DeployEvent, DeployEventSink};

/// Event sink that outputs NDJSON events
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::RunStarted { unit } => {
                serde_json::json!({
                    "event": "start",
                    "unit": unit,
                })
            }

            DeployEvent::StepStarted { step } => {
                serde_json::json!({
                    "event": "step_start",
                    "step": step.id(),
                })
            }

            DeployEvent::StepCompleted { step } => {
                serde_json::json!({
                    "event": "step_done",
                    "step": step.id(),
                })
            }

            DeployEvent::StepSkipped { step, reason } => {
                serde_json::json!({
                    "event": "step_skipped",
                    "step": step.id(),
                    "reason": reason,
                })
            }

            DeployEvent::RunCompleted { steps_run } => {
                serde_json::json!({
                    "event": "done",
                    "steps_run": steps_run,
                })
            }

            DeployEvent::RunFailed { step, error } => {
                serde_json::json!({
                    "event": "failed",
                    "step": step.id(),
                    "error": error,
                })
            }
        };

        self.write_event(json);
    }
}
