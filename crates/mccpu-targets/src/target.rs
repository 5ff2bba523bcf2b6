//! A target: descriptor plus its parsed template.

use crate::descriptor::TargetDescriptor;
use crate::error::{Result, TargetError};
use crate::params::ResourceParams;
use crate::template::Template;

/// A host language the abstract machine can be rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    descriptor: TargetDescriptor,
    template: Template,
}

impl Target {
    /// Pair a descriptor with its template. The template inherits the
    /// descriptor's `max-size`.
    pub fn new(descriptor: TargetDescriptor, template: Template) -> Self {
        let template = template.with_max_size(descriptor.max_size);
        Self {
            descriptor,
            template,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &TargetDescriptor {
        &self.descriptor
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Render a program for this target.
    pub fn render(&self, params: &ResourceParams) -> Result<String> {
        self.template
            .render(params)
            .map_err(|source| TargetError::Render {
                target: self.descriptor.name.clone(),
                source,
            })
    }
}
