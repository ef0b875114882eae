//! Transport port - the command/file-transfer channel to the target host
//!
//! The deployment core never talks to a host directly; it goes through this
//! trait. Implementations: `SshTransport` for real hosts, an in-memory mock
//! for tests.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport operation errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// The channel to the host could not be established or broke down
    #[error("cannot reach host: {0}")]
    Connection(String),

    /// The remote command ran but reported failure
    #[error("remote command exited with status {status}: {stderr}")]
    CommandFailed { status: i32, stderr: String },

    /// Local IO failure (spawning ssh/scp, reading a local artifact)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Quote a string for safe use in a remote shell command
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Quote a path for safe use in a remote shell command
pub fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// Abstract command/file-transfer channel to one target host
///
/// `run` and `probe` differ in how a non-zero exit is read: `run` treats it
/// as an error, `probe` treats a clean non-zero exit as a negative answer
/// and only reports an error when the channel itself fails. This keeps
/// "the unit file is absent" distinct from "cannot tell whether it exists".
///
/// The typed helpers (`chown`, `chmod`, `symlink_force`, ...) have default
/// implementations in terms of `run`/`probe`; a mock overrides them
/// directly.
pub trait Transport {
    /// Run a command on the host, returning trimmed stdout
    fn run(&self, command: &str) -> TransportResult<String>;

    /// Run a command whose exit code answers a yes/no question
    fn probe(&self, command: &str) -> TransportResult<bool>;

    /// Copy a local file to a path on the host (full overwrite)
    fn upload(&self, local: &Path, remote: &Path) -> TransportResult<()>;

    /// Check whether a path exists on the host
    ///
    /// `Ok(false)` means a clean negative probe; a channel failure is an
    /// `Err` and must never be read as "absent".
    fn exists(&self, path: &Path) -> TransportResult<bool> {
        self.probe(&format!("test -e {}", quote_path(path)))
    }

    /// Set owner and group of a remote path
    fn chown(&self, path: &Path, owner: &str, group: &str) -> TransportResult<()> {
        self.run(&format!(
            "chown {}:{} {}",
            shell_quote(owner),
            shell_quote(group),
            quote_path(path)
        ))
        .map(drop)
    }

    /// Set the mode of a remote path (octal)
    fn chmod(&self, path: &Path, mode: u32) -> TransportResult<()> {
        self.run(&format!("chmod {:o} {}", mode, quote_path(path)))
            .map(drop)
    }

    /// Create a symlink at `link` pointing at `target`, replacing whatever
    /// currently occupies `link`. A dangling `target` is not an error.
    fn symlink_force(&self, target: &Path, link: &Path) -> TransportResult<()> {
        self.run(&format!(
            "ln -sfn {} {}",
            quote_path(target),
            quote_path(link)
        ))
        .map(drop)
    }

    /// Read the target of a symlink, `None` if no link exists at `path`
    fn read_link(&self, path: &Path) -> TransportResult<Option<PathBuf>> {
        if !self.probe(&format!("test -L {}", quote_path(path)))? {
            return Ok(None);
        }
        let out = self.run(&format!("readlink {}", quote_path(path)))?;
        Ok(Some(PathBuf::from(out.trim())))
    }

    /// SHA-256 of a remote file as `sha256:<hex>`, `None` if the file is
    /// absent
    fn sha256(&self, path: &Path) -> TransportResult<Option<String>> {
        if !self.exists(path)? {
            return Ok(None);
        }
        let out = self.run(&format!("sha256sum {}", quote_path(path)))?;
        let hex = out.split_whitespace().next().unwrap_or("");
        Ok(Some(format!("sha256:{}", hex)))
    }
}
