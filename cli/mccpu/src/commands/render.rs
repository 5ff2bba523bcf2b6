//! `mccpu render` — bind machine sizes and lowered code into a target program.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use mccpu_targets::{lint_code, RenderError, ResourceParams, Slot, TargetRegistry};

use crate::commands::Project;

/// Output file stem used when `--out` names a directory.
const OUTPUT_STEM: &str = "program";

#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// Target language (e.g., c, csharp, rust, python)
    #[arg(long)]
    pub target: Option<String>,
    /// Memory size in bytes
    #[arg(long, allow_negative_numbers = true)]
    pub memory_size: Option<i64>,
    /// Stack size in bytes
    #[arg(long, allow_negative_numbers = true)]
    pub stack_size: Option<i64>,
    /// Number of registers
    #[arg(long, allow_negative_numbers = true)]
    pub register_count: Option<i64>,
    /// File with lowered instruction text ("-" for stdin; empty program if omitted)
    #[arg(long)]
    pub code: Option<PathBuf>,
    /// Output file or directory (stdout if omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Directory of extra .target.toml descriptors
    #[arg(long)]
    pub targets_dir: Option<PathBuf>,
}

/// Run `mccpu render`.
pub fn run(project: &Project, args: &RenderArgs) -> Result<()> {
    let registry = project.registry(args.targets_dir.as_deref())?;
    let code = read_code(args.code.as_deref())?;
    let (program, file_name) = render_program(project, &registry, args, code)?;

    match &args.out {
        Some(out) => {
            let path = output_path(out, &file_name);
            fs::write(&path, &program).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {} ({} bytes)", path.display(), program.len());
        }
        None => print!("{program}"),
    }
    Ok(())
}

/// Resolve parameters and render. Returns the program and its default file name.
pub(crate) fn render_program(
    project: &Project,
    registry: &TargetRegistry,
    args: &RenderArgs,
    code: String,
) -> Result<(String, String)> {
    let manifest = &project.manifest;
    let target_name = args
        .target
        .as_deref()
        .unwrap_or_else(|| manifest.default_target());
    let target = registry.get(target_name)?;

    for warning in lint_code(&code) {
        log::warn!("{warning}");
    }

    let params = ResourceParams::try_from_signed(
        pick(args.memory_size, manifest.memory_size(), Slot::MemorySize)?,
        pick(args.stack_size, manifest.stack_size(), Slot::StackSize)?,
        pick(args.register_count, manifest.register_count(), Slot::RegisterCount)?,
        code,
    )
    .with_context(|| format!("target '{}'", target.name()))?;

    log::info!(
        "rendering for '{}': memory={} stack={} registers={}",
        target.name(),
        params.memory_size,
        params.stack_size,
        params.register_count
    );
    let program = target.render(&params)?;
    Ok((program, target.descriptor().output_file_name(OUTPUT_STEM)))
}

/// Command-line value if given, otherwise the manifest's.
///
/// A manifest value beyond `i64::MAX` is rejected rather than clamped.
fn pick(flag: Option<i64>, configured: u64, slot: Slot) -> Result<i64, RenderError> {
    match flag {
        Some(value) => Ok(value),
        None => i64::try_from(configured).map_err(|_| RenderError::InvalidParameter {
            slot,
            value: configured.into(),
            reason: "exceeds the largest supported value".into(),
        }),
    }
}

fn read_code(path: Option<&Path>) -> Result<String> {
    match path {
        None => Ok(String::new()),
        Some(p) if p == Path::new("-") => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("reading instruction text from stdin")?;
            Ok(code)
        }
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
    }
}

fn output_path(out: &Path, file_name: &str) -> PathBuf {
    if out.is_dir() {
        out.join(file_name)
    } else {
        out.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::McCpuManifest;

    fn project(manifest: &str) -> Project {
        Project {
            manifest: toml::from_str(manifest).unwrap(),
            dir: PathBuf::from("/nonexistent"),
            has_manifest: true,
        }
    }

    fn registry() -> TargetRegistry {
        TargetRegistry::with_builtins().unwrap()
    }

    #[test]
    fn defaults_come_from_manifest() {
        let project = project("[machine]\nmemory-size = 512\n[targets]\ndefault = \"rust\"\n");
        let (program, file_name) =
            render_program(&project, &registry(), &RenderArgs::default(), String::new()).unwrap();
        assert_eq!(file_name, "program.rs");
        assert!(program.contains("const MEMORY_SIZE: usize = 512;"));
        assert!(program.contains("const STACK_SIZE: usize = 64;"));
    }

    #[test]
    fn flags_override_manifest() {
        let project = project("[machine]\nmemory-size = 512\n");
        let args = RenderArgs {
            target: Some("c".into()),
            memory_size: Some(2048),
            register_count: Some(0),
            ..Default::default()
        };
        let (program, file_name) =
            render_program(&project, &registry(), &args, "halt();".into()).unwrap();
        assert_eq!(file_name, "program.c");
        assert!(program.contains("#define MEMORY_SIZE 2048\n"));
        assert!(program.contains("#define REGISTER_COUNT 0\n"));
        assert!(program.contains("halt();"));
    }

    #[test]
    fn negative_flag_is_rejected() {
        let project = Project {
            manifest: McCpuManifest::default(),
            dir: PathBuf::from("."),
            has_manifest: false,
        };
        let args = RenderArgs {
            stack_size: Some(-1),
            ..Default::default()
        };
        let err = render_program(&project, &registry(), &args, String::new()).unwrap_err();
        assert!(format!("{err:#}").contains("must not be negative"));
    }

    #[test]
    fn oversized_manifest_value_is_rejected() {
        let err = pick(None, u64::MAX, Slot::MemorySize).unwrap_err();
        assert_eq!(
            err,
            RenderError::InvalidParameter {
                slot: Slot::MemorySize,
                value: u64::MAX.into(),
                reason: "exceeds the largest supported value".into(),
            }
        );
        assert_eq!(pick(None, i64::MAX as u64, Slot::StackSize), Ok(i64::MAX));
        assert_eq!(pick(Some(5), u64::MAX, Slot::RegisterCount), Ok(5));
    }

    #[test]
    fn unknown_target_is_an_error() {
        let args = RenderArgs {
            target: Some("fortran".into()),
            ..Default::default()
        };
        let err = render_program(&project(""), &registry(), &args, String::new()).unwrap_err();
        assert!(err.to_string().contains("unknown target 'fortran'"));
    }

    #[test]
    fn output_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(output_path(dir.path(), "program.cs"), dir.path().join("program.cs"));
        let file = dir.path().join("main.c");
        assert_eq!(output_path(&file, "program.c"), file);
    }

    #[test]
    fn read_code_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.txt");
        fs::write(&path, "PUSH 1\n").unwrap();
        assert_eq!(read_code(Some(path.as_path())).unwrap(), "PUSH 1\n");
        assert_eq!(read_code(None).unwrap(), "");
        assert!(read_code(Some(dir.path().join("missing").as_path())).is_err());
    }
}
