//! Target templates and placeholder rendering for the MCCPU compiler.
//!
//! The lowering pass produces target-specific instruction text and the
//! abstract machine's sizes. This crate binds them into a complete program
//! for a host language:
//!
//! - **Slots:** the four `%name` placeholders every template carries
//! - **Template:** parsed scaffolding, rendered in a single pass
//! - **Contract:** ordering and descriptor checks every target must pass
//! - **Registry:** target identifiers mapped to descriptors and templates

pub mod builtin;
pub mod contract;
pub mod descriptor;
pub mod error;
pub mod params;
pub mod registry;
pub mod slot;
pub mod target;
pub mod template;

pub use contract::{check_contract, ContractIssue, Severity};
pub use descriptor::{MemoryModel, TargetDescriptor};
pub use error::{RenderError, Result, TargetError};
pub use params::ResourceParams;
pub use registry::TargetRegistry;
pub use slot::Slot;
pub use target::Target;
pub use template::{lint_code, render, Segment, Template};
