//! `mccpu.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "mccpu.toml";

/// Memory size used when neither the command line nor the manifest sets one.
pub const DEFAULT_MEMORY_SIZE: u64 = 256;
/// Stack size used when neither the command line nor the manifest sets one.
pub const DEFAULT_STACK_SIZE: u64 = 64;
/// Register count used when neither the command line nor the manifest sets one.
pub const DEFAULT_REGISTER_COUNT: u64 = 8;
/// Target used when neither the command line nor the manifest names one.
pub const DEFAULT_TARGET: &str = "c";

/// The top-level manifest structure for an MCCPU project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McCpuManifest {
    /// Abstract machine sizing.
    #[serde(default)]
    pub machine: MachineConfig,
    /// Target selection.
    #[serde(default)]
    pub targets: TargetsConfig,
}

/// Abstract machine section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MachineConfig {
    #[serde(default)]
    pub memory_size: Option<u64>,
    #[serde(default)]
    pub stack_size: Option<u64>,
    #[serde(default)]
    pub register_count: Option<u64>,
}

/// Targets configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Default target identifier.
    #[serde(default)]
    pub default: Option<String>,
    /// Directory of extra `.target.toml` descriptors, relative to the manifest.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl McCpuManifest {
    /// Search upward from `start_dir` for an `mccpu.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: McCpuManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                log::debug!("using manifest {}", candidate.display());
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing mccpu.toml")
    }

    /// Resolve the default target name, falling back to [`DEFAULT_TARGET`].
    pub fn default_target(&self) -> &str {
        self.targets.default.as_deref().unwrap_or(DEFAULT_TARGET)
    }

    /// Directory holding custom targets, resolved against `project_dir`.
    pub fn targets_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(self.targets.dir.as_deref().unwrap_or(Path::new("targets")))
    }

    pub fn memory_size(&self) -> u64 {
        self.machine.memory_size.unwrap_or(DEFAULT_MEMORY_SIZE)
    }

    pub fn stack_size(&self) -> u64 {
        self.machine.stack_size.unwrap_or(DEFAULT_STACK_SIZE)
    }

    pub fn register_count(&self) -> u64 {
        self.machine.register_count.unwrap_or(DEFAULT_REGISTER_COUNT)
    }

    /// Generate the default manifest for `mccpu init`.
    pub fn template(target: &str) -> String {
        format!(
            r#"[machine]
memory-size = {DEFAULT_MEMORY_SIZE}
stack-size = {DEFAULT_STACK_SIZE}
register-count = {DEFAULT_REGISTER_COUNT}

[targets]
default = "{target}"
dir = "targets"
"#
        )
    }
}
