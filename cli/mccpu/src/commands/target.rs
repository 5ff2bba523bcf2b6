//! `mccpu target` — target listing, description, validation and scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mccpu_targets::contract::has_errors;
use mccpu_targets::descriptor::{descriptor_to_toml, generate_starter, load_target};
use mccpu_targets::{check_contract, Slot, Target, TargetRegistry};
use serde::Serialize;

/// List all registered targets.
pub fn list(registry: &TargetRegistry) -> Result<()> {
    print!("{}", list_text(registry));
    Ok(())
}

fn list_text(registry: &TargetRegistry) -> String {
    let mut out = String::from("Available targets:\n\n");
    for target in registry.iter() {
        let d = target.descriptor();
        let aliases = if d.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", d.aliases.join(", "))
        };
        out.push_str(&format!("  {:<10} {}{aliases}\n", d.name, d.description));
    }
    out.push_str("\nUse 'mccpu target describe <name>' for details.\n");
    out
}

/// Machine-readable summary of a target for `describe --format json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct TargetSummary<'a> {
    name: &'a str,
    language: &'a str,
    description: &'a str,
    aliases: &'a [String],
    extension: &'a str,
    memory_model: mccpu_targets::MemoryModel,
    max_size: u64,
    fingerprint: String,
    slot_lines: Vec<(Slot, usize)>,
}

impl<'a> TargetSummary<'a> {
    fn new(target: &'a Target) -> Self {
        let d = target.descriptor();
        Self {
            name: &d.name,
            language: &d.language,
            description: &d.description,
            aliases: &d.aliases,
            extension: &d.extension,
            memory_model: d.memory_model,
            max_size: d.max_size,
            fingerprint: target.template().fingerprint(),
            slot_lines: Slot::ALL
                .into_iter()
                .map(|s| (s, target.template().slot_line(s)))
                .collect(),
        }
    }
}

/// Describe a specific target in detail.
pub fn describe(registry: &TargetRegistry, name: &str, format: Option<&str>) -> Result<()> {
    let target = registry.get(name)?;
    print!("{}", describe_text(target, format)?);
    Ok(())
}

fn describe_text(target: &Target, format: Option<&str>) -> Result<String> {
    match format {
        Some("toml") => Ok(descriptor_to_toml(target.descriptor())?),
        Some("json") => {
            let mut json = serde_json::to_string_pretty(&TargetSummary::new(target))?;
            json.push('\n');
            Ok(json)
        }
        Some(other) => bail!("unknown format '{other}' (expected toml or json)"),
        None => {
            let d = target.descriptor();
            let template = target.template();
            let mut out = format!("=== Target: {} ===\n", d.name);
            out.push_str(&format!("Language:     {}\n", d.language));
            if !d.description.is_empty() {
                out.push_str(&format!("Description:  {}\n", d.description));
            }
            if !d.aliases.is_empty() {
                out.push_str(&format!("Aliases:      {}\n", d.aliases.join(", ")));
            }
            out.push_str(&format!("Extension:    .{}\n", d.extension));
            out.push_str(&format!("Memory model: {:?}\n", d.memory_model));
            out.push_str(&format!("Max size:     {}\n", d.max_size));
            out.push_str(&format!("Fingerprint:  {}\n", template.fingerprint()));
            out.push_str("\n--- Slots ---\n");
            for slot in Slot::ALL {
                out.push_str(&format!(
                    "  {:<16} line {}\n",
                    slot.marker(),
                    template.slot_line(slot)
                ));
            }
            Ok(out)
        }
    }
}

/// Validate a descriptor file and its template against the placeholder contract.
pub fn validate(path: &Path) -> Result<()> {
    let target = load_target(path).with_context(|| format!("loading {}", path.display()))?;
    let issues = check_contract(&target);
    for issue in &issues {
        eprintln!("{}: {}", issue.severity, issue.message);
    }
    if has_errors(&issues) {
        bail!("target '{}' does not satisfy the placeholder contract", target.name());
    }
    println!(
        "Target '{}' is valid ({} warning(s))",
        target.name(),
        issues.len()
    );
    Ok(())
}

/// Write a starter descriptor and template for a new target into `dir`.
pub fn new(name: &str, dir: &Path) -> Result<()> {
    let descriptor_path = dir.join(format!("{name}.target.toml"));
    let template_path = dir.join(format!("{name}.tmpl"));
    if descriptor_path.exists() || template_path.exists() {
        bail!("target '{name}' already exists in {}", dir.display());
    }

    let (descriptor, template) = generate_starter(name)?;
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&descriptor_path, descriptor)
        .with_context(|| format!("writing {}", descriptor_path.display()))?;
    fs::write(&template_path, template)
        .with_context(|| format!("writing {}", template_path.display()))?;

    println!("Created target '{name}'");
    println!("  {}", descriptor_path.display());
    println!("  {}", template_path.display());
    Ok(())
}
