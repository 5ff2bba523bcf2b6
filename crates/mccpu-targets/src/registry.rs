//! Registry mapping target identifiers to targets.
//!
//! The registry is filled once (built-ins, then any user directory) and
//! only read afterwards, so it can be shared between threads by reference.

use std::collections::HashMap;
use std::path::Path;

use crate::builtin::builtin_targets;
use crate::descriptor::{discover_targets, load_target};
use crate::error::{Result, TargetError};
use crate::params::ResourceParams;
use crate::target::Target;

/// Read-only lookup of targets by name or alias.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    /// Lowercased identifier -> index into `targets`.
    index: HashMap<String, usize>,
}

fn normalize(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

impl TargetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in target.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for target in builtin_targets()? {
            registry.insert(target)?;
        }
        Ok(registry)
    }

    /// Built-ins plus every descriptor found in `dir`.
    pub fn with_builtins_and_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::with_builtins()?;
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Register a target.
    ///
    /// A target whose name is already registered replaces the previous one,
    /// aliases included: identifiers only the old definition declared stop
    /// resolving. An alias that already belongs to a different target is an
    /// error.
    pub fn insert(&mut self, target: Target) -> Result<()> {
        let name = normalize(target.name());
        let slot = match self.index.get(&name) {
            Some(&existing) if normalize(self.targets[existing].name()) == name => {
                log::info!("target '{}' overrides an earlier definition", target.name());
                existing
            }
            Some(&existing) => {
                return Err(TargetError::Validation {
                    detail: format!(
                        "target name '{}' is already an alias of '{}'",
                        target.name(),
                        self.targets[existing].name()
                    ),
                });
            }
            None => self.targets.len(),
        };

        for id in target.descriptor().identifiers().skip(1) {
            let id = normalize(id);
            if let Some(&other) = self.index.get(&id) {
                if other != slot {
                    return Err(TargetError::Validation {
                        detail: format!(
                            "alias '{id}' of '{}' is already used by '{}'",
                            target.name(),
                            self.targets[other].name()
                        ),
                    });
                }
            }
        }

        let ids: Vec<String> = target.descriptor().identifiers().map(normalize).collect();
        if slot == self.targets.len() {
            self.targets.push(target);
        } else {
            self.index.retain(|_, i| *i != slot);
            self.targets[slot] = target;
        }
        for id in ids {
            self.index.insert(id, slot);
        }
        log::debug!("registered target '{}'", self.targets[slot].name());
        Ok(())
    }

    /// Load and register every `.target.toml` in `dir`.
    ///
    /// Targets overriding an existing name are registered first, so aliases
    /// they drop are free for the directory's new targets.
    ///
    /// Returns the number of targets loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = discover_targets(dir)?
            .iter()
            .map(|(_, path)| load_target(path))
            .collect::<Result<Vec<_>>>()?;
        loaded.sort_by_key(|t| {
            let name = normalize(t.name());
            !self.targets.iter().any(|o| normalize(o.name()) == name)
        });
        let count = loaded.len();
        for target in loaded {
            self.insert(target)?;
        }
        Ok(count)
    }

    /// Look up a target by name or alias, ignoring ASCII case.
    pub fn get(&self, id: &str) -> Result<&Target> {
        self.index
            .get(&normalize(id))
            .map(|&i| &self.targets[i])
            .ok_or_else(|| TargetError::UnknownTarget { name: id.into() })
    }

    /// Whether `id` resolves to a target.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(&normalize(id))
    }

    /// All targets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Look up `id` and render `params` with its template.
    pub fn render(&self, id: &str, params: &ResourceParams) -> Result<String> {
        self.get(id)?.render(params)
    }
}
