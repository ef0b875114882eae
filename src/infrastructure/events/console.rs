//! Console Event Sink
//!
//! Human-readable progress output. Unicode glyphs when stdout is a
//! terminal, plain ASCII otherwise (logs, pipes).

use is_terminal::IsTerminal;

use crate::ports::events::{DeployEvent, DeployEventSink};

/// Event sink printing progress to stdout
pub struct ConsoleEventSink {
    fancy: bool,
    verbose: u8,
}

impl ConsoleEventSink {
    /// Create a sink; glyph style follows terminal detection
    pub fn new(verbose: u8) -> Self {
        Self {
            fancy: std::io::stdout().is_terminal(),
            verbose,
        }
    }

    /// Create a sink with explicit glyph style (for tests)
    pub fn plain(verbose: u8) -> Self {
        Self {
            fancy: false,
            verbose,
        }
    }

    fn glyph(&self, fancy: &'static str, plain: &'static str) -> &'static str {
        if self.fancy {
            fancy
        } else {
            plain
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::RunStarted { unit } => {
                println!("Deploying {}", unit);
            }
            DeployEvent::StepStarted { step } => {
                if self.verbose > 0 {
                    println!("{} {}...", self.glyph("→", ">"), step.name());
                }
            }
            DeployEvent::StepCompleted { step } => {
                println!("{} {}", self.glyph("✓", "ok"), step.name());
            }
            DeployEvent::StepSkipped { step, reason } => {
                println!("{} {} ({})", self.glyph("○", "--"), step.name(), reason);
            }
            DeployEvent::RunCompleted { steps_run } => {
                println!(
                    "{} deployed: {} steps, service running and boot-enabled",
                    self.glyph("✓", "ok"),
                    steps_run
                );
            }
            DeployEvent::RunFailed { step, error } => {
                eprintln!("{} {} failed: {}", self.glyph("✗", "error:"), step.name(), error);
            }
        }
    }
}
