//! CLI command implementations.

pub mod init;
pub mod render;
pub mod target;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mccpu_targets::TargetRegistry;

use crate::manifest::McCpuManifest;

/// Where the command is running: the manifest (if any) and the project root.
#[derive(Debug, Clone)]
pub struct Project {
    pub manifest: McCpuManifest,
    pub dir: PathBuf,
    /// Whether `manifest` was read from disk rather than defaulted.
    pub has_manifest: bool,
}

impl Project {
    /// Locate the project containing `cwd`, or fall back to defaults rooted at `cwd`.
    pub fn discover(cwd: &Path) -> Result<Self> {
        Ok(match McCpuManifest::find_and_load(cwd)? {
            Some((manifest, dir)) => Self {
                manifest,
                dir,
                has_manifest: true,
            },
            None => Self {
                manifest: McCpuManifest::default(),
                dir: cwd.to_path_buf(),
                has_manifest: false,
            },
        })
    }

    /// Build the target registry: built-ins, then the custom targets directory.
    ///
    /// `override_dir` replaces the manifest's directory when given.
    pub fn registry(&self, override_dir: Option<&Path>) -> Result<TargetRegistry> {
        let dir = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => self.manifest.targets_dir(&self.dir),
        };
        let registry = TargetRegistry::with_builtins_and_dir(&dir)
            .with_context(|| format!("loading targets from {}", dir.display()))?;
        log::info!("{} target(s) available", registry.len());
        Ok(registry)
    }
}
