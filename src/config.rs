//! Configuration module for Capstan
//!
//! Deployment parameters come from `capstan.toml` next to the project,
//! with CLI flags overriding the host. The remote layout defaults match
//! the de facto contract between the crawler service and its web root, so
//! a minimal config only needs a `host`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CapstanError, CapstanResult};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// SSH destination (user@host or host)
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Identity of the deployed service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Supervisor unit name
    #[serde(default = "default_unit")]
    pub unit: String,

    /// User the service runs as; owns the web root and the binary
    #[serde(default = "default_runtime_user")]
    pub runtime_user: String,

    /// Group for deployed files, defaults to the runtime user's group
    #[serde(default = "default_runtime_user")]
    pub runtime_group: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            runtime_user: default_runtime_user(),
            runtime_group: default_runtime_user(),
        }
    }
}

/// Local paths of the built artifacts to ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Built service executable
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Unit-definition file to install
    #[serde(default = "default_unit_file")]
    pub unit_file: PathBuf,

    /// Static asset served from the web root
    #[serde(default = "default_asset")]
    pub asset: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            unit_file: default_unit_file(),
            asset: default_asset(),
        }
    }
}

/// Filesystem layout on the target host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Web root the asset and the managed link live in
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,

    /// Name of the managed link inside the web root
    #[serde(default = "default_link_name")]
    pub link_name: String,

    /// Live data file the link points at; populated by the running
    /// service, may not exist yet at deploy time
    #[serde(default = "default_link_target")]
    pub link_target: PathBuf,

    /// Directory the executable is installed into
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,

    /// Supervisor's system-wide unit directory
    #[serde(default = "default_unit_dir")]
    pub unit_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            web_root: default_web_root(),
            link_name: default_link_name(),
            link_target: default_link_target(),
            install_dir: default_install_dir(),
            unit_dir: default_unit_dir(),
        }
    }
}

fn default_unit() -> String {
    "fediverse-crawler.service".to_string()
}

fn default_runtime_user() -> String {
    "fediverse-crawler".to_string()
}

fn default_binary() -> PathBuf {
    PathBuf::from("target/release/fediverse-crawler")
}

fn default_unit_file() -> PathBuf {
    PathBuf::from("deploy/fediverse-crawler.service")
}

fn default_asset() -> PathBuf {
    PathBuf::from("assets/index.html")
}

fn default_web_root() -> PathBuf {
    PathBuf::from("/var/www/fediverse-crawler")
}

fn default_link_name() -> String {
    "instances.json".to_string()
}

fn default_link_target() -> PathBuf {
    PathBuf::from("/home/fediverse-crawler/instances.json")
}

fn default_install_dir() -> PathBuf {
    PathBuf::from("/home/fediverse-crawler")
}

fn default_unit_dir() -> PathBuf {
    PathBuf::from("/etc/systemd/system")
}

/// Non-fatal warning produced while loading configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Unknown key encountered in the file
    pub key: String,
    /// File the key was found in
    pub file: PathBuf,
}

/// Fully resolved deployment parameters
///
/// Everything the pipeline needs, with remote destinations already joined.
/// Derived from [`Config`] via [`Config::deploy_spec`]; tests build it
/// directly.
#[derive(Debug, Clone)]
pub struct DeploySpec {
    pub unit: String,
    pub runtime_user: String,
    pub runtime_group: String,
    pub asset_source: PathBuf,
    pub asset_dest: PathBuf,
    pub link_path: PathBuf,
    pub link_target: PathBuf,
    pub unit_source: PathBuf,
    pub unit_dest: PathBuf,
    pub binary_source: PathBuf,
    pub binary_dest: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> CapstanResult<Self> {
        let (config, _warnings) = Self::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys)
    pub fn load_with_warnings(path: &Path) -> CapstanResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown_paths.push(path.to_string());
        })
        .map_err(|e| CapstanError::Config {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| ConfigWarning {
                key: path_str,
                file: path.to_path_buf(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> CapstanResult<(Self, Vec<ConfigWarning>)> {
        if path.exists() {
            Self::load_with_warnings(path)
        } else {
            Ok((Self::default(), Vec::new()))
        }
    }

    /// Resolve this configuration into concrete deployment parameters
    pub fn deploy_spec(&self) -> CapstanResult<DeploySpec> {
        let asset_name = file_name(&self.artifacts.asset, "artifacts.asset")?;
        let binary_name = file_name(&self.artifacts.binary, "artifacts.binary")?;

        Ok(DeploySpec {
            unit: self.service.unit.clone(),
            runtime_user: self.service.runtime_user.clone(),
            runtime_group: self.service.runtime_group.clone(),
            asset_source: self.artifacts.asset.clone(),
            asset_dest: self.layout.web_root.join(asset_name),
            link_path: self.layout.web_root.join(&self.layout.link_name),
            link_target: self.layout.link_target.clone(),
            unit_source: self.artifacts.unit_file.clone(),
            unit_dest: self.layout.unit_dir.join(&self.service.unit),
            binary_source: self.artifacts.binary.clone(),
            binary_dest: self.layout.install_dir.join(binary_name),
        })
    }
}

fn file_name<'a>(path: &'a Path, key: &str) -> CapstanResult<&'a std::ffi::OsStr> {
    path.file_name().ok_or_else(|| CapstanError::Config {
        file: path.to_path_buf(),
        message: format!("`{}` has no file name component", key),
    })
}
