//! Dry-run planning - what a deployment run would change
//!
//! Probes the host read-only: artifact content hashes are compared against
//! the local sources (same `sha256:<hex>` format on both sides), the
//! managed link is resolved, and the quiescer branch is predicted. No
//! supervisor command and no write is issued.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::DeploySpec;
use crate::error::{CapstanError, CapstanResult};
use crate::ports::supervisor::Supervisor;
use crate::ports::transport::Transport;

/// How one artifact destination would change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Destination does not exist yet
    Created,
    /// Destination exists with different content
    Changed,
    /// Destination already matches the source
    Unchanged,
}

impl ChangeKind {
    /// Stable identifier for machine-readable output
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Changed => "changed",
            ChangeKind::Unchanged => "unchanged",
        }
    }
}

/// Planned write to one artifact destination
#[derive(Debug, Clone)]
pub struct PlannedChange {
    /// What the artifact is ("asset", "unit file", "binary")
    pub label: &'static str,
    pub dest: PathBuf,
    pub kind: ChangeKind,
}

/// Read-only preview of a deployment run
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub changes: Vec<PlannedChange>,
    /// Whether the quiescer would issue a stop (unit installed)
    pub will_stop_service: bool,
    /// Whether the managed link already resolves to the configured target
    pub link_current: bool,
}

/// Hash a local file as `sha256:<hex>`
pub fn hash_local(path: &Path) -> CapstanResult<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("sha256:{:x}", hasher.finalize()))
}

/// Compute the plan for one host
pub fn plan<T: Transport, S: Supervisor>(
    spec: &DeploySpec,
    transport: &T,
    supervisor: &S,
) -> CapstanResult<DeployPlan> {
    let artifacts: [(&'static str, &Path, &Path); 3] = [
        ("asset", &spec.asset_source, &spec.asset_dest),
        ("unit file", &spec.unit_source, &spec.unit_dest),
        ("binary", &spec.binary_source, &spec.binary_dest),
    ];

    let mut changes = Vec::with_capacity(artifacts.len());
    for (label, source, dest) in artifacts {
        let local = hash_local(source)?;
        let remote = transport
            .sha256(dest)
            .map_err(|err| CapstanError::Transfer {
                path: dest.to_path_buf(),
                source: err,
            })?;
        let kind = match remote {
            None => ChangeKind::Created,
            Some(ref hash) if *hash == local => ChangeKind::Unchanged,
            Some(_) => ChangeKind::Changed,
        };
        changes.push(PlannedChange {
            label,
            dest: dest.to_path_buf(),
            kind,
        });
    }

    let will_stop_service = supervisor.unit_exists(&spec.unit)?;

    let link_current = transport
        .read_link(&spec.link_path)
        .map_err(|source| CapstanError::Link {
            link: spec.link_path.clone(),
            target: spec.link_target.clone(),
            source,
        })?
        .is_some_and(|target| target == spec.link_target);

    Ok(DeployPlan {
        changes,
        will_stop_service,
        link_current,
    })
}
