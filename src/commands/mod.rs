pub mod deploy;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};

use capstan::{Config, ConfigWarning, DeploySpec, SshTransport, SystemdSupervisor};

/// Load config, apply the host override, and resolve the deploy spec
pub(crate) fn load(
    host_flag: Option<String>,
    config_path: &Path,
) -> Result<(Config, DeploySpec, String, Vec<ConfigWarning>)> {
    let (config, warnings) =
        Config::load_or_default(config_path).context("loading configuration")?;

    let host = host_flag
        .or_else(|| config.host.clone())
        .context("no target host: pass --host or set `host` in capstan.toml")?;

    let spec = config.deploy_spec()?;
    Ok((config, spec, host, warnings))
}

pub(crate) fn print_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "config_warning",
                    "key": warning.key,
                    "file": warning.file.display().to_string(),
                })
            );
        } else {
            eprintln!(
                "warning: unknown key `{}` in {}",
                warning.key,
                warning.file.display()
            );
        }
    }
}

pub(crate) fn supervisor_for<'a>(
    config: &Config,
    transport: &'a SshTransport,
) -> SystemdSupervisor<'a, SshTransport> {
    SystemdSupervisor::new(transport, config.layout.unit_dir.clone())
}
