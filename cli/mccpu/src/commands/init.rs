//! `mccpu init` — project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mccpu_targets::TargetRegistry;

use crate::manifest::{McCpuManifest, MANIFEST_FILE};

/// Create a new MCCPU project directory `name` relative to cwd.
pub fn run(name: &str, target: &str) -> Result<()> {
    create_project(Path::new(name), name, target)
}

pub(crate) fn create_project(project_dir: &Path, name: &str, target: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }
    // Refuse to write a manifest whose default target cannot be resolved.
    let target = TargetRegistry::with_builtins()?.get(target)?.name().to_string();

    fs::create_dir_all(project_dir.join("targets")).context("creating targets/ directory")?;
    fs::create_dir_all(project_dir.join("out")).context("creating out/ directory")?;

    fs::write(
        project_dir.join(MANIFEST_FILE),
        McCpuManifest::template(&target),
    )
    .with_context(|| format!("writing {MANIFEST_FILE}"))?;
    fs::write(project_dir.join(".gitignore"), "out/\n").context("writing .gitignore")?;

    println!("Created project '{name}' (default target: {target})");
    println!("  {name}/{MANIFEST_FILE}");
    println!("  {name}/targets/");
    println!("  {name}/out/");
    println!("  {name}/.gitignore");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_project_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("demo");

        create_project(&project_path, "demo", "c").unwrap();

        assert!(project_path.join(MANIFEST_FILE).is_file());
        assert!(project_path.join("targets").is_dir());
        assert!(project_path.join("out").is_dir());
        assert!(project_path.join(".gitignore").is_file());
    }

    #[test]
    fn init_resolves_alias_in_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("sharp");

        create_project(&project_path, "sharp", "C#").unwrap();

        let (manifest, _) = McCpuManifest::find_and_load(&project_path).unwrap().unwrap();
        assert_eq!(manifest.default_target(), "csharp");
    }

    #[test]
    fn init_rejects_unknown_target() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("nope");
        assert!(create_project(&project_path, "nope", "cobol").is_err());
        assert!(!project_path.exists());
    }

    #[test]
    fn init_fails_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("existing");
        fs::create_dir_all(&project_path).unwrap();

        assert!(create_project(&project_path, "existing", "c").is_err());
    }
}
