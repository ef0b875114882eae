//! The convergence steps
//!
//! Each function brings one piece of host state to its desired value
//! regardless of the starting state, and is safe to re-run. Ordering is
//! enforced by the pipeline, not here.

use crate::config::DeploySpec;
use crate::error::{CapstanError, CapstanResult};
use crate::ports::supervisor::Supervisor;
use crate::ports::transport::{Transport, TransportError};

/// Static asset: owner read/write, world readable
pub const ASSET_MODE: u32 = 0o644;

/// Unit file: owner read/write, world readable
pub const UNIT_MODE: u32 = 0o644;

/// Executable: owner read+execute only. No write bit for anyone, so the
/// running service cannot replace its own binary.
pub const BINARY_MODE: u32 = 0o500;

fn transfer_err(path: &std::path::Path) -> impl FnOnce(TransportError) -> CapstanError + '_ {
    move |source| CapstanError::Transfer {
        path: path.to_path_buf(),
        source,
    }
}

/// Copy the static asset into the web root with fixed ownership and mode.
/// Always a full overwrite.
pub fn sync_asset<T: Transport>(spec: &DeploySpec, transport: &T) -> CapstanResult<()> {
    transport
        .upload(&spec.asset_source, &spec.asset_dest)
        .map_err(transfer_err(&spec.asset_dest))?;
    transport
        .chown(&spec.asset_dest, &spec.runtime_user, &spec.runtime_group)
        .map_err(transfer_err(&spec.asset_dest))?;
    transport
        .chmod(&spec.asset_dest, ASSET_MODE)
        .map_err(transfer_err(&spec.asset_dest))?;
    Ok(())
}

/// Force-create the managed link inside the web root. The target is
/// populated by the running service and may not exist yet; the link is
/// created anyway.
pub fn repair_data_link<T: Transport>(spec: &DeploySpec, transport: &T) -> CapstanResult<()> {
    transport
        .symlink_force(&spec.link_target, &spec.link_path)
        .map_err(|source| CapstanError::Link {
            link: spec.link_path.clone(),
            target: spec.link_target.clone(),
            source,
        })
}

/// Stop the service if (and only if) its unit is installed.
///
/// Returns whether a stop was issued. On a first deployment there is
/// nothing to stop and the step is a no-op; when the unit exists the stop
/// is issued even if the service is already stopped. A failed installation
/// query aborts the run: guessing "not installed" could overwrite a
/// running executable.
pub fn quiesce_service<S: Supervisor>(spec: &DeploySpec, supervisor: &S) -> CapstanResult<bool> {
    if supervisor.unit_exists(&spec.unit)? {
        supervisor.stop(&spec.unit)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Copy the unit-definition file into the supervisor's unit directory.
/// Always copies, never diffs-and-skips.
pub fn install_unit<T: Transport>(spec: &DeploySpec, transport: &T) -> CapstanResult<()> {
    transport
        .upload(&spec.unit_source, &spec.unit_dest)
        .map_err(transfer_err(&spec.unit_dest))?;
    transport
        .chmod(&spec.unit_dest, UNIT_MODE)
        .map_err(transfer_err(&spec.unit_dest))?;
    Ok(())
}

/// Replace the executable. Owned by the runtime identity but not writable
/// by it; mode is exactly owner read+execute.
pub fn deploy_binary<T: Transport>(spec: &DeploySpec, transport: &T) -> CapstanResult<()> {
    transport
        .upload(&spec.binary_source, &spec.binary_dest)
        .map_err(transfer_err(&spec.binary_dest))?;
    transport
        .chown(&spec.binary_dest, &spec.runtime_user, &spec.runtime_group)
        .map_err(transfer_err(&spec.binary_dest))?;
    transport
        .chmod(&spec.binary_dest, BINARY_MODE)
        .map_err(transfer_err(&spec.binary_dest))?;
    Ok(())
}

/// Reload unit definitions, start the service, enable it on boot.
/// Unconditional: the end state after any successful run is "installed,
/// enabled, running".
pub fn activate_service<S: Supervisor>(spec: &DeploySpec, supervisor: &S) -> CapstanResult<()> {
    supervisor.reload_definitions()?;
    supervisor.start(&spec.unit)?;
    supervisor.enable_on_boot(&spec.unit)?;
    Ok(())
}
