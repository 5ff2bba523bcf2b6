//! Target descriptors: metadata for one host language and the location of its template.
//!
//! Descriptors are stored as `<name>.target.toml` files next to their
//! template. This module provides functions to load, serialize and discover
//! these files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};
use crate::target::Target;
use crate::template::Template;

/// File suffix that marks a target descriptor.
pub const DESCRIPTOR_SUFFIX: &str = ".target.toml";

/// How a host language obtains and releases the memory region.
///
/// Informational only: the renderer never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryModel {
    /// Explicit allocation and release (e.g. `malloc`/`free`).
    #[default]
    Manual,
    /// Released by a garbage collector at some later point.
    GarbageCollected,
    /// Fixed-size storage with automatic lifetime.
    Stack,
}

/// Metadata describing one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDescriptor {
    /// Registry identifier (e.g., "c", "csharp").
    pub name: String,
    /// Human-readable host language name.
    pub language: String,
    /// Short description shown in listings.
    #[serde(default)]
    pub description: String,
    /// Alternative identifiers accepted by the registry.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// File extension of rendered programs, without the dot.
    pub extension: String,
    /// Memory management strategy of the template.
    #[serde(default)]
    pub memory_model: MemoryModel,
    /// Largest value the template can declare for any numeric slot.
    #[serde(default = "default_max_size")]
    pub max_size: u64,
    /// Template path, relative to the descriptor file.
    pub template: PathBuf,
}

/// Largest integer a TOML file can hold.
fn default_max_size() -> u64 {
    i64::MAX as u64
}

impl TargetDescriptor {
    /// Every identifier this descriptor answers to, name first.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// File name for a program rendered for this target.
    pub fn output_file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension)
    }
}

/// Parse a descriptor from a TOML string.
pub fn parse_descriptor_toml(toml_str: &str) -> Result<TargetDescriptor> {
    let descriptor: TargetDescriptor = toml::from_str(toml_str)?;
    if descriptor.name.trim().is_empty() {
        return Err(TargetError::Validation {
            detail: "descriptor name is empty".into(),
        });
    }
    Ok(descriptor)
}

/// Serialize a descriptor to pretty TOML.
pub fn descriptor_to_toml(descriptor: &TargetDescriptor) -> Result<String> {
    let toml_str = toml::to_string_pretty(descriptor)?;
    Ok(toml_str)
}

/// Load a target from a `.target.toml` file and the template it points to.
pub fn load_target(path: &Path) -> Result<Target> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let descriptor = parse_descriptor_toml(&content)?;

    let template_path = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&descriptor.template);
    if !template_path.exists() {
        return Err(TargetError::NotFound {
            path: template_path,
        });
    }
    let source = std::fs::read_to_string(&template_path)?;
    let template = Template::parse(source).map_err(|source| TargetError::Render {
        target: descriptor.name.clone(),
        source,
    })?;

    log::debug!(
        "loaded target '{}' from {} (template {})",
        descriptor.name,
        path.display(),
        template_path.display()
    );
    Ok(Target::new(descriptor, template))
}

/// Discover all `.target.toml` files in a directory.
///
/// Returns a list of (target_name, file_path) pairs sorted by name. A
/// missing directory yields an empty list. Entries that are not regular
/// files are skipped even when their name ends in the descriptor suffix.
pub fn discover_targets(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut targets = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            log::debug!("skipping non-file entry {}", path.display());
            continue;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(DESCRIPTOR_SUFFIX))
            .map(str::to_string);
        if let Some(name) = name {
            targets.push((name, path));
        }
    }
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    log::debug!("discovered {} target(s) in {}", targets.len(), dir.display());
    Ok(targets)
}

/// Generate a starter descriptor and template pair for a new target.
///
/// Returns `(descriptor_toml, template_text)`. The template is a plain-text
/// skeleton that satisfies the placeholder contract.
pub fn generate_starter(name: &str) -> Result<(String, String)> {
    let descriptor = TargetDescriptor {
        name: name.into(),
        language: name.into(),
        description: format!("{name} target"),
        aliases: Vec::new(),
        extension: "txt".into(),
        memory_model: MemoryModel::Manual,
        max_size: u32::MAX.into(),
        template: PathBuf::from(format!("{name}.tmpl")),
    };
    let template = "\
memory: %memory_size bytes
stack: %stack_size bytes
registers: %register_count

begin
%code
end
"
    .to_string();
    Ok((descriptor_to_toml(&descriptor)?, template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::slot::Slot;

    const MINIMAL: &str = r#"
name = "lua"
language = "Lua"
extension = "lua"
template = "lua.tmpl"
"#;

    fn write_target(dir: &Path, name: &str) {
        let (toml_str, template) = generate_starter(name).unwrap();
        std::fs::write(dir.join(format!("{name}.target.toml")), toml_str).unwrap();
        std::fs::write(dir.join(format!("{name}.tmpl")), template).unwrap();
    }

    #[test]
    fn parse_minimal_toml() {
        let d = parse_descriptor_toml(MINIMAL).unwrap();
        assert_eq!(d.name, "lua");
        assert_eq!(d.memory_model, MemoryModel::Manual);
        assert_eq!(d.max_size, i64::MAX as u64);
        assert!(d.aliases.is_empty());
        assert_eq!(d.output_file_name("program"), "program.lua");
    }

    #[test]
    fn parse_full_toml() {
        let d = parse_descriptor_toml(
            r#"
name = "java"
language = "Java"
description = "JVM with a byte[] heap"
aliases = ["jvm"]
extension = "java"
memory-model = "garbage-collected"
max-size = 2147483647
template = "templates/java.tmpl"
"#,
        )
        .unwrap();
        assert_eq!(d.memory_model, MemoryModel::GarbageCollected);
        assert_eq!(d.max_size, 2_147_483_647);
        assert_eq!(d.identifiers().collect::<Vec<_>>(), vec!["java", "jvm"]);
    }

    #[test]
    fn round_trip() {
        let original = parse_descriptor_toml(MINIMAL).unwrap();
        let parsed = parse_descriptor_toml(&descriptor_to_toml(&original).unwrap()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(parse_descriptor_toml("this is not valid toml [[[").is_err());
        assert!(parse_descriptor_toml("name = \"x\"").is_err());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = parse_descriptor_toml(&MINIMAL.replace("\"lua\"\nlanguage", "\" \"\nlanguage"))
            .unwrap_err();
        assert!(matches!(err, TargetError::Validation { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        write_target(dir.path(), "plain");
        let target = load_target(&dir.path().join("plain.target.toml")).unwrap();
        assert_eq!(target.name(), "plain");
        assert_eq!(target.template().slot_line(Slot::Code), 6);
    }

    #[test]
    fn load_not_found() {
        let result = load_target(Path::new("/nonexistent/path.target.toml"));
        assert!(matches!(result.unwrap_err(), TargetError::NotFound { .. }));
    }

    #[test]
    fn load_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lua.target.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let err = load_target(&path).unwrap_err();
        match err {
            TargetError::NotFound { path } => assert!(path.ends_with("lua.tmpl")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_broken_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lua.target.toml"), MINIMAL).unwrap();
        std::fs::write(dir.path().join("lua.tmpl"), "%memory_size %stack_size %code").unwrap();
        let err = load_target(&dir.path().join("lua.target.toml")).unwrap_err();
        assert_eq!(
            err.render_error(),
            Some(&RenderError::MissingPlaceholder {
                slot: Slot::RegisterCount
            })
        );
    }

    #[test]
    fn discover_finds_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        write_target(dir.path(), "zeta");
        write_target(dir.path(), "alpha");
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let found = discover_targets(dir.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn discover_skips_directories_with_descriptor_suffix() {
        let dir = tempfile::tempdir().unwrap();
        write_target(dir.path(), "alpha");
        std::fs::create_dir(dir.path().join("backup.target.toml")).unwrap();

        let found = discover_targets(dir.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["alpha"]);

        let registry = crate::TargetRegistry::with_builtins_and_dir(dir.path()).unwrap();
        assert!(registry.contains("alpha"));
        assert!(!registry.contains("backup"));
    }

    #[test]
    fn discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_targets(&dir.path().join("nope")).unwrap().is_empty());
    }
}
