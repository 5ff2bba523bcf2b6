//! Targets compiled into the library.

use crate::descriptor::parse_descriptor_toml;
use crate::error::{Result, TargetError};
use crate::target::Target;
use crate::template::Template;

/// (descriptor TOML, template text) for each built-in target.
const BUILTIN_SOURCES: [(&str, &str); 4] = [
    (
        include_str!("../targets/c.target.toml"),
        include_str!("../targets/c.tmpl"),
    ),
    (
        include_str!("../targets/csharp.target.toml"),
        include_str!("../targets/csharp.tmpl"),
    ),
    (
        include_str!("../targets/rust.target.toml"),
        include_str!("../targets/rust.tmpl"),
    ),
    (
        include_str!("../targets/python.target.toml"),
        include_str!("../targets/python.tmpl"),
    ),
];

/// Parse every built-in target.
pub fn builtin_targets() -> Result<Vec<Target>> {
    BUILTIN_SOURCES
        .iter()
        .map(|(descriptor, template)| {
            let descriptor = parse_descriptor_toml(descriptor)?;
            let template = Template::parse(*template).map_err(|source| TargetError::Render {
                target: descriptor.name.clone(),
                source,
            })?;
            Ok(Target::new(descriptor, template))
        })
        .collect()
}
