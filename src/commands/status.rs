//! `capstan status` - read-only report of the host's deployed state

use std::path::Path;

use anyhow::Result;

use capstan::pipeline::plan::hash_local;
use capstan::{CapstanError, SshTransport, Supervisor, Transport};

struct StatusReport {
    unit_installed: bool,
    active: bool,
    binary_current: Option<bool>,
    asset_current: Option<bool>,
    link_current: bool,
}

pub fn run(host: Option<String>, config_path: &Path, json: bool) -> Result<()> {
    let (config, spec, host, warnings) = super::load(host, config_path)?;
    super::print_warnings(&warnings, json);

    let transport = SshTransport::new(host.as_str());
    let supervisor = super::supervisor_for(&config, &transport);

    let unit_installed = supervisor.unit_exists(&spec.unit)?;
    let active = supervisor.is_active(&spec.unit)?;

    let binary_current = artifact_current(&transport, &spec.binary_source, &spec.binary_dest)?;
    let asset_current = artifact_current(&transport, &spec.asset_source, &spec.asset_dest)?;

    let link_current = transport
        .read_link(&spec.link_path)
        .map_err(|err| CapstanError::Link {
            link: spec.link_path.clone(),
            target: spec.link_target.clone(),
            source: err,
        })?
        .is_some_and(|target| target == spec.link_target);

    let report = StatusReport {
        unit_installed,
        active,
        binary_current,
        asset_current,
        link_current,
    };

    render(&report, &host, &spec.unit, json);
    Ok(())
}

/// `None` when the destination is absent, otherwise whether it matches the
/// local artifact
fn artifact_current(
    transport: &SshTransport,
    source: &Path,
    dest: &Path,
) -> Result<Option<bool>> {
    let remote = transport
        .sha256(dest)
        .map_err(|err| CapstanError::Transfer {
            path: dest.to_path_buf(),
            source: err,
        })?;
    match remote {
        None => Ok(None),
        Some(hash) => Ok(Some(hash == hash_local(source)?)),
    }
}

fn render(report: &StatusReport, host: &str, unit: &str, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "status",
                "host": host,
                "unit": unit,
                "unit_installed": report.unit_installed,
                "active": report.active,
                "binary": presence(report.binary_current),
                "asset": presence(report.asset_current),
                "link_current": report.link_current,
            })
        );
        return;
    }

    println!("Status of {} on {}:", unit, host);
    println!(
        "  unit file: {}",
        if report.unit_installed {
            "installed"
        } else {
            "absent"
        }
    );
    println!(
        "  service:   {}",
        if report.active { "running" } else { "stopped" }
    );
    println!("  binary:    {}", presence(report.binary_current));
    println!("  asset:     {}", presence(report.asset_current));
    println!(
        "  data link: {}",
        if report.link_current {
            "pointing at the live data file"
        } else {
            "missing or wrong target"
        }
    );
}

fn presence(state: Option<bool>) -> &'static str {
    match state {
        None => "absent",
        Some(true) => "current",
        Some(false) => "stale",
    }
}
