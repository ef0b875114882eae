//! SSH Transport Implementation
//!
//! Implements the Transport port with the OpenSSH client tools: `ssh` for
//! remote commands, `scp` for file transfer. ssh reserves exit code 255
//! for channel failures, which is how connection problems are told apart
//! from a remote command that merely failed.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::ports::transport::{Transport, TransportError, TransportResult};

/// ssh's own exit code for "could not connect / channel broke"
const SSH_CHANNEL_FAILURE: i32 = 255;

/// Command/file-transfer channel over SSH
pub struct SshTransport {
    /// SSH destination (user@host or host)
    destination: String,
}

impl SshTransport {
    /// Create a transport for the given SSH destination
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Get the SSH destination
    pub fn destination(&self) -> &str {
        &self.destination
    }

    fn ssh_output(&self, command: &str) -> TransportResult<Output> {
        let output = Command::new("ssh")
            .arg(&self.destination)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        Ok(output)
    }

    fn classify_failure(output: &Output) -> TransportError {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match output.status.code() {
            Some(SSH_CHANNEL_FAILURE) | None => TransportError::Connection(stderr),
            Some(status) => TransportError::CommandFailed { status, stderr },
        }
    }
}

impl Transport for SshTransport {
    fn run(&self, command: &str) -> TransportResult<String> {
        let output = self.ssh_output(command)?;
        if !output.status.success() {
            return Err(Self::classify_failure(&output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn probe(&self, command: &str) -> TransportResult<bool> {
        let output = self.ssh_output(command)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(SSH_CHANNEL_FAILURE) | None => Err(Self::classify_failure(&output)),
            Some(_) => Ok(false),
        }
    }

    fn upload(&self, local: &Path, remote: &Path) -> TransportResult<()> {
        let output = Command::new("scp")
            .arg("-q")
            .arg(local)
            .arg(format!("{}:{}", self.destination, remote.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            return Err(Self::classify_failure(&output));
        }
        Ok(())
    }
}
