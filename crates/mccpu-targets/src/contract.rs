//! Checks of the placeholder contract every target must honour.
//!
//! A conforming template declares memory, stack and registers sized by the
//! three numeric slots, and runs the `%code` body after all of them are set
//! up and before any is released. Exactly-once occurrence is already
//! guaranteed by [`Template::parse`](crate::template::Template::parse); the
//! checks here cover ordering and descriptor sanity.

use std::fmt;

use crate::slot::Slot;
use crate::target::Target;

/// How serious a contract issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A problem found while checking a target against the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractIssue {
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ContractIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Check a target for contract violations.
///
/// Returns every issue found; an empty list means the target conforms.
pub fn check_contract(target: &Target) -> Vec<ContractIssue> {
    let mut issues = Vec::new();
    let template = target.template();
    let descriptor = target.descriptor();

    // 1. The body comes after every resource size is known
    let code_offset = template.slot_offset(Slot::Code);
    for slot in Slot::NUMERIC {
        if template.slot_offset(slot) > code_offset {
            issues.push(ContractIssue {
                severity: Severity::Error,
                message: format!(
                    "{} (line {}) appears after {} (line {})",
                    slot.marker(),
                    template.slot_line(slot),
                    Slot::Code.marker(),
                    template.slot_line(Slot::Code)
                ),
            });
        }
    }

    // 2. Code is not re-indented, so it should start its own line
    let prefix = template.slot_line_prefix(Slot::Code);
    if !prefix.chars().all(char::is_whitespace) {
        issues.push(ContractIssue {
            severity: Severity::Warning,
            message: format!(
                "{} on line {} shares its line with other text",
                Slot::Code.marker(),
                template.slot_line(Slot::Code)
            ),
        });
    }

    // 3. Rendered programs need a file extension
    if descriptor.extension.trim().is_empty() {
        issues.push(ContractIssue {
            severity: Severity::Error,
            message: "descriptor has an empty extension".into(),
        });
    }

    // 4. A zero limit leaves no room for any memory
    if descriptor.max_size == 0 {
        issues.push(ContractIssue {
            severity: Severity::Error,
            message: "descriptor max-size is 0".into(),
        });
    }

    issues
}

/// Whether any issue is an error.
pub fn has_errors(issues: &[ContractIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{MemoryModel, TargetDescriptor};
    use crate::template::Template;

    fn target(source: &str) -> Target {
        let descriptor = TargetDescriptor {
            name: "test".into(),
            language: "Test".into(),
            description: String::new(),
            aliases: Vec::new(),
            extension: "txt".into(),
            memory_model: MemoryModel::Stack,
            max_size: 1024,
            template: "test.tmpl".into(),
        };
        Target::new(descriptor, Template::parse(source).unwrap())
    }

    #[test]
    fn conforming_template() {
        let t = target("%memory_size %stack_size %register_count\n  %code\n");
        assert!(check_contract(&t).is_empty());
    }

    #[test]
    fn code_before_declaration() {
        let t = target("%memory_size %stack_size\n%code\n%register_count");
        let issues = check_contract(&t);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("%register_count (line 3)"));
        assert!(has_errors(&issues));
    }

    #[test]
    fn inline_code_is_a_warning() {
        let t = target("%memory_size %stack_size %register_count { %code }");
        let issues = check_contract(&t);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!has_errors(&issues));
        assert!(issues[0].to_string().starts_with("[warning]"));
    }

    #[test]
    fn bad_descriptor_fields() {
        let mut t = target("%memory_size %stack_size %register_count\n%code");
        let mut d = t.descriptor().clone();
        d.extension = " ".into();
        d.max_size = 0;
        t = Target::new(d, t.template().clone());
        let issues = check_contract(&t);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.message.contains("extension")));
        assert!(issues.iter().any(|i| i.message.contains("max-size")));
    }
}
