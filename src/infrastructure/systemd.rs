//! Systemd Supervisor Implementation
//!
//! Maps the Supervisor port onto `systemctl` run through the transport.
//! Unit installation is probed as a file-existence check of the unit path
//! rather than by interpreting `systemctl` errors: query-then-branch keeps
//! "unit absent" and "cannot tell" observable as different outcomes.

use std::path::PathBuf;

use crate::ports::supervisor::{Supervisor, SupervisorError, SupervisorResult};
use crate::ports::transport::{shell_quote, Transport};

/// Supervisor implementation for systemd hosts
pub struct SystemdSupervisor<'a, T: Transport> {
    transport: &'a T,
    unit_dir: PathBuf,
}

impl<'a, T: Transport> SystemdSupervisor<'a, T> {
    /// Create a supervisor over `transport`, probing unit files in
    /// `unit_dir`
    pub fn new(transport: &'a T, unit_dir: PathBuf) -> Self {
        Self {
            transport,
            unit_dir,
        }
    }

    fn command(&self, action: String) -> SupervisorResult<()> {
        self.transport
            .run(&format!("systemctl {}", action))
            .map(drop)
            .map_err(|source| SupervisorError::Command { action, source })
    }
}

impl<T: Transport> Supervisor for SystemdSupervisor<'_, T> {
    fn unit_exists(&self, unit: &str) -> SupervisorResult<bool> {
        let path = self.unit_dir.join(unit);
        self.transport
            .exists(&path)
            .map_err(|source| SupervisorError::Query {
                unit: unit.to_string(),
                source,
            })
    }

    fn is_active(&self, unit: &str) -> SupervisorResult<bool> {
        self.transport
            .probe(&format!("systemctl is-active --quiet {}", shell_quote(unit)))
            .map_err(|source| SupervisorError::Query {
                unit: unit.to_string(),
                source,
            })
    }

    fn stop(&self, unit: &str) -> SupervisorResult<()> {
        self.command(format!("stop {}", shell_quote(unit)))
    }

    fn reload_definitions(&self) -> SupervisorResult<()> {
        self.command("daemon-reload".to_string())
    }

    fn start(&self, unit: &str) -> SupervisorResult<()> {
        self.command(format!("start {}", shell_quote(unit)))
    }

    fn enable_on_boot(&self, unit: &str) -> SupervisorResult<()> {
        self.command(format!("enable {}", shell_quote(unit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::transport::{TransportError, TransportResult};
    use std::path::Path;
    use std::sync::Mutex;

    struct FakeTransport {
        commands: Mutex<Vec<String>>,
        exists_answer: TransportResult<bool>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
                exists_answer: Ok(false),
            }
        }
    }

    impl Transport for FakeTransport {
        fn run(&self, command: &str) -> TransportResult<String> {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(String::new())
        }

        fn probe(&self, command: &str) -> TransportResult<bool> {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(false)
        }

        fn upload(&self, _local: &Path, _remote: &Path) -> TransportResult<()> {
            Ok(())
        }

        fn exists(&self, _path: &Path) -> TransportResult<bool> {
            match &self.exists_answer {
                Ok(v) => Ok(*v),
                Err(_) => Err(TransportError::Connection("probe failed".to_string())),
            }
        }
    }

    #[test]
    fn stop_issues_systemctl_stop() {
        let t = FakeTransport::new();
        let s = SystemdSupervisor::new(&t, PathBuf::from("/etc/systemd/system"));
        s.stop("crawler.service").unwrap();
        assert_eq!(
            t.commands.lock().unwrap().as_slice(),
            ["systemctl stop 'crawler.service'"]
        );
    }

    #[test]
    fn activation_commands_in_systemctl_form() {
        let t = FakeTransport::new();
        let s = SystemdSupervisor::new(&t, PathBuf::from("/etc/systemd/system"));
        s.reload_definitions().unwrap();
        s.start("crawler.service").unwrap();
        s.enable_on_boot("crawler.service").unwrap();
        assert_eq!(
            t.commands.lock().unwrap().as_slice(),
            [
                "systemctl daemon-reload",
                "systemctl start 'crawler.service'",
                "systemctl enable 'crawler.service'",
            ]
        );
    }

    #[test]
    fn unit_exists_failure_is_a_query_error() {
        let mut t = FakeTransport::new();
        t.exists_answer = Err(TransportError::Connection("probe failed".to_string()));
        let s = SystemdSupervisor::new(&t, PathBuf::from("/etc/systemd/system"));
        let err = s.unit_exists("crawler.service").unwrap_err();
        assert!(matches!(err, SupervisorError::Query { .. }));
    }

    #[test]
    fn is_active_probes_quietly() {
        let t = FakeTransport::new();
        let s = SystemdSupervisor::new(&t, PathBuf::from("/etc/systemd/system"));
        assert!(!s.is_active("crawler.service").unwrap());
        assert_eq!(
            t.commands.lock().unwrap().as_slice(),
            ["systemctl is-active --quiet 'crawler.service'"]
        );
    }
}
