//! Shared test environment: an in-memory target host
//!
//! `MockTransport` implements the Transport port over a hash-map host
//! state (files with mode/owner, symlinks, systemd unit registry) and
//! keeps an ordered log of every mutating operation, so tests can assert
//! causal ordering (e.g. "stop happened before the binary upload").
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use tempfile::TempDir;

use capstan::ports::transport::{Transport, TransportError, TransportResult};
use capstan::DeploySpec;

/// One deployed file on the mock host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub hash: String,
    pub mode: Option<u32>,
    pub owner: Option<(String, String)>,
}

/// Everything observable on the mock host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostState {
    pub files: BTreeMap<PathBuf, FileEntry>,
    pub links: BTreeMap<PathBuf, PathBuf>,
    pub active_units: BTreeSet<String>,
    pub enabled_units: BTreeSet<String>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<HostState>>,
    log: Arc<Mutex<Vec<String>>>,
    fail_patterns: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make any operation whose log line contains `pattern` fail
    pub fn fail_when(&self, pattern: &str) {
        self.fail_patterns.lock().unwrap().push(pattern.to_string());
    }

    /// Drop all injected failures
    pub fn clear_failures(&self) {
        self.fail_patterns.lock().unwrap().clear();
    }

    /// Snapshot of the host state (log excluded)
    pub fn snapshot(&self) -> HostState {
        self.state.lock().unwrap().clone()
    }

    /// Ordered log of mutating operations
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Index of the first log entry containing `pattern`
    pub fn log_index(&self, pattern: &str) -> Option<usize> {
        self.log().iter().position(|line| line.contains(pattern))
    }

    pub fn mode_of(&self, path: &Path) -> Option<u32> {
        self.state.lock().unwrap().files.get(path)?.mode
    }

    pub fn owner_of(&self, path: &Path) -> Option<(String, String)> {
        self.state.lock().unwrap().files.get(path)?.owner.clone()
    }

    pub fn link_target_of(&self, link: &Path) -> Option<PathBuf> {
        self.state.lock().unwrap().links.get(link).cloned()
    }

    pub fn is_active(&self, unit: &str) -> bool {
        self.state.lock().unwrap().active_units.contains(unit)
    }

    pub fn is_enabled(&self, unit: &str) -> bool {
        self.state.lock().unwrap().enabled_units.contains(unit)
    }

    /// Seed a host that already runs the service described by `spec`
    pub fn with_installed_service(&self, spec: &DeploySpec) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(
            spec.unit_dest.clone(),
            FileEntry {
                hash: "sha256:previous-unit".to_string(),
                mode: Some(0o644),
                owner: None,
            },
        );
        state.files.insert(
            spec.binary_dest.clone(),
            FileEntry {
                hash: "sha256:previous-binary".to_string(),
                mode: Some(0o500),
                owner: Some((spec.runtime_user.clone(), spec.runtime_group.clone())),
            },
        );
        state.active_units.insert(spec.unit.clone());
        state.enabled_units.insert(spec.unit.clone());
    }

    fn check_fail(&self, op: &str) -> TransportResult<()> {
        let patterns = self.fail_patterns.lock().unwrap();
        if patterns.iter().any(|p| op.contains(p.as_str())) {
            return Err(TransportError::CommandFailed {
                status: 1,
                stderr: format!("injected failure for `{}`", op),
            });
        }
        Ok(())
    }

    fn record(&self, op: String) -> TransportResult<()> {
        self.check_fail(&op)?;
        self.log.lock().unwrap().push(op);
        Ok(())
    }
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

impl Transport for MockTransport {
    fn run(&self, command: &str) -> TransportResult<String> {
        self.record(format!("run {}", command))?;

        let mut state = self.state.lock().unwrap();
        if let Some(rest) = command.strip_prefix("systemctl ") {
            let unit = |arg: &str| arg.trim_matches('\'').to_string();
            let mut parts = rest.splitn(2, ' ');
            match (parts.next(), parts.next()) {
                (Some("stop"), Some(u)) => {
                    state.active_units.remove(&unit(u));
                }
                (Some("start"), Some(u)) => {
                    state.active_units.insert(unit(u));
                }
                (Some("enable"), Some(u)) => {
                    state.enabled_units.insert(unit(u));
                }
                (Some("daemon-reload"), None) => {}
                _ => {}
            }
        }
        Ok(String::new())
    }

    fn probe(&self, command: &str) -> TransportResult<bool> {
        self.check_fail(&format!("probe {}", command))?;
        let state = self.state.lock().unwrap();
        if let Some(rest) = command.strip_prefix("systemctl is-active --quiet ") {
            return Ok(state.active_units.contains(rest.trim_matches('\'')));
        }
        if let Some(rest) = command.strip_prefix("test -L ") {
            let path = PathBuf::from(rest.trim_matches('\''));
            return Ok(state.links.contains_key(&path));
        }
        Ok(false)
    }

    fn upload(&self, local: &Path, remote: &Path) -> TransportResult<()> {
        self.record(format!("upload {}", remote.display()))?;
        let bytes = std::fs::read(local)?;
        let mut state = self.state.lock().unwrap();
        // full overwrite: previous mode/owner do not survive the copy
        state.files.insert(
            remote.to_path_buf(),
            FileEntry {
                hash: hash_bytes(&bytes),
                mode: None,
                owner: None,
            },
        );
        Ok(())
    }

    fn exists(&self, path: &Path) -> TransportResult<bool> {
        self.check_fail(&format!("exists {}", path.display()))?;
        let state = self.state.lock().unwrap();
        Ok(state.files.contains_key(path) || state.links.contains_key(path))
    }

    fn chown(&self, path: &Path, owner: &str, group: &str) -> TransportResult<()> {
        self.record(format!("chown {}:{} {}", owner, group, path.display()))?;
        let mut state = self.state.lock().unwrap();
        match state.files.get_mut(path) {
            Some(entry) => {
                entry.owner = Some((owner.to_string(), group.to_string()));
                Ok(())
            }
            None => Err(TransportError::CommandFailed {
                status: 1,
                stderr: format!("chown: {}: no such file", path.display()),
            }),
        }
    }

    fn chmod(&self, path: &Path, mode: u32) -> TransportResult<()> {
        self.record(format!("chmod {:o} {}", mode, path.display()))?;
        let mut state = self.state.lock().unwrap();
        match state.files.get_mut(path) {
            Some(entry) => {
                entry.mode = Some(mode);
                Ok(())
            }
            None => Err(TransportError::CommandFailed {
                status: 1,
                stderr: format!("chmod: {}: no such file", path.display()),
            }),
        }
    }

    fn symlink_force(&self, target: &Path, link: &Path) -> TransportResult<()> {
        self.record(format!("link {} -> {}", link.display(), target.display()))?;
        let mut state = self.state.lock().unwrap();
        // ln -sfn replaces whatever occupies the link path
        state.files.remove(link);
        state.links.insert(link.to_path_buf(), target.to_path_buf());
        Ok(())
    }

    fn read_link(&self, path: &Path) -> TransportResult<Option<PathBuf>> {
        self.check_fail(&format!("readlink {}", path.display()))?;
        Ok(self.state.lock().unwrap().links.get(path).cloned())
    }

    fn sha256(&self, path: &Path) -> TransportResult<Option<String>> {
        self.check_fail(&format!("sha256 {}", path.display()))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|entry| entry.hash.clone()))
    }
}

/// Local artifact fixtures plus the resolved spec pointing at them
pub struct Fixture {
    pub dir: TempDir,
    pub spec: DeploySpec,
}

/// Write binary/unit/asset fixture files and build a spec for the standard
/// crawler layout
pub fn fixture() -> Fixture {
    fixture_with_binary(b"\x7fELF crawler build 1")
}

pub fn fixture_with_binary(binary_bytes: &[u8]) -> Fixture {
    let dir = TempDir::new().unwrap();
    let binary_source = dir.path().join("fediverse-crawler");
    let unit_source = dir.path().join("fediverse-crawler.service");
    let asset_source = dir.path().join("index.html");

    std::fs::write(&binary_source, binary_bytes).unwrap();
    std::fs::write(&unit_source, "[Unit]\nDescription=Fediverse crawler\n").unwrap();
    std::fs::write(&asset_source, "<html><body>crawler</body></html>\n").unwrap();

    let spec = DeploySpec {
        unit: "fediverse-crawler.service".to_string(),
        runtime_user: "fediverse-crawler".to_string(),
        runtime_group: "fediverse-crawler".to_string(),
        asset_source,
        asset_dest: PathBuf::from("/var/www/fediverse-crawler/index.html"),
        link_path: PathBuf::from("/var/www/fediverse-crawler/instances.json"),
        link_target: PathBuf::from("/home/fediverse-crawler/instances.json"),
        unit_source,
        unit_dest: PathBuf::from("/etc/systemd/system/fediverse-crawler.service"),
        binary_source,
        binary_dest: PathBuf::from("/home/fediverse-crawler/fediverse-crawler"),
    };

    Fixture { dir, spec }
}
