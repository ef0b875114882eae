//! Error types for Capstan
//!
//! Uses `thiserror` for library errors. Every failure is fatal to the
//! current run: there is no retry and no rollback, re-running the pipeline
//! is the recovery mechanism.

use std::path::PathBuf;
use thiserror::Error;

use crate::ports::supervisor::SupervisorError;
use crate::ports::transport::TransportError;

/// Result type alias for Capstan operations
pub type CapstanResult<T> = Result<T, CapstanError>;

/// Main error type for Capstan operations
#[derive(Error, Debug)]
pub enum CapstanError {
    /// Copying an asset, unit file, or binary to the host failed
    #[error("transfer to {path} failed: {source}")]
    Transfer {
        path: PathBuf,
        source: TransportError,
    },

    /// The managed symlink could not be created or replaced
    #[error("cannot link {link} -> {target}: {source}")]
    Link {
        link: PathBuf,
        target: PathBuf,
        source: TransportError,
    },

    /// Supervisor query or command failure (two distinct kinds, see
    /// [`SupervisorError`])
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    /// Invalid or incomplete configuration
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Local IO error (reading artifacts, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
