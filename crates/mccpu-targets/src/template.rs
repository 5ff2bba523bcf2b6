//! Parsed target templates and single-pass rendering.
//!
//! A template is parsed once into an ordered list of [`Segment`]s. Parsing
//! enforces that every [`Slot`] occurs exactly once, so rendering a parsed
//! template can only fail on parameter values, never on structure.

use sha2::{Digest, Sha256};

use crate::error::RenderError;
use crate::params::ResourceParams;
use crate::slot::{scan_markers, Slot};

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Scaffolding copied to the output unchanged.
    Literal(String),
    /// Insertion point for a parameter.
    Slot(Slot),
}

/// An immutable, validated target template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    /// Byte offset of each slot marker in `source`, indexed like [`Slot::ALL`].
    offsets: [usize; 4],
    max_size: u64,
}

fn slot_index(slot: Slot) -> usize {
    match slot {
        Slot::MemorySize => 0,
        Slot::StackSize => 1,
        Slot::RegisterCount => 2,
        Slot::Code => 3,
    }
}

impl Template {
    /// Parse template text, checking that each slot occurs exactly once.
    ///
    /// Missing slots are reported before duplicated ones, each in
    /// [`Slot::ALL`] order, so the error for a given text is deterministic.
    pub fn parse(source: impl Into<String>) -> Result<Self, RenderError> {
        let source = source.into();
        let hits = scan_markers(&source);

        let mut counts = [0usize; 4];
        for hit in &hits {
            counts[slot_index(hit.slot)] += 1;
        }
        for slot in Slot::ALL {
            if counts[slot_index(slot)] == 0 {
                return Err(RenderError::MissingPlaceholder { slot });
            }
        }
        for slot in Slot::ALL {
            let count = counts[slot_index(slot)];
            if count > 1 {
                return Err(RenderError::DuplicatePlaceholder { slot, count });
            }
        }

        let mut segments = Vec::with_capacity(hits.len() * 2 + 1);
        let mut offsets = [0usize; 4];
        let mut cursor = 0;
        for hit in &hits {
            if hit.start > cursor {
                segments.push(Segment::Literal(source[cursor..hit.start].to_string()));
            }
            segments.push(Segment::Slot(hit.slot));
            offsets[slot_index(hit.slot)] = hit.start;
            cursor = hit.end;
        }
        if cursor < source.len() {
            segments.push(Segment::Literal(source[cursor..].to_string()));
        }

        log::trace!(
            "parsed template: {} bytes, {} segments",
            source.len(),
            segments.len()
        );

        Ok(Self {
            source,
            segments,
            offsets,
            max_size: u64::MAX,
        })
    }

    /// Cap numeric parameters at the largest size the host can declare.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Largest accepted value for a numeric slot.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Byte offset of a slot's marker in the source.
    pub fn slot_offset(&self, slot: Slot) -> usize {
        self.offsets[slot_index(slot)]
    }

    /// 1-based line number of a slot's marker in the source.
    pub fn slot_line(&self, slot: Slot) -> usize {
        let offset = self.slot_offset(slot);
        self.source[..offset].matches('\n').count() + 1
    }

    /// Text between the start of the slot's line and its marker.
    pub fn slot_line_prefix(&self, slot: Slot) -> &str {
        let offset = self.slot_offset(slot);
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        &self.source[line_start..offset]
    }

    /// SHA-256 of the template source, as lowercase hex.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.source.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Substitute `params` into the template.
    ///
    /// Numbers are written in plain decimal and the code is inserted
    /// verbatim. Replacement text is never scanned for markers, so a
    /// `%code` inside the instruction text stays as is.
    pub fn render(&self, params: &ResourceParams) -> Result<String, RenderError> {
        params.check_limit(self.max_size)?;

        let literal_len: usize = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Slot(_) => 0,
            })
            .sum();
        let mut out = String::with_capacity(literal_len + params.code.len() + 3 * 20);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Code) => out.push_str(&params.code),
                Segment::Slot(slot) => {
                    let value = params.count(*slot).unwrap_or_default();
                    out.push_str(&value.to_string());
                }
            }
        }

        log::debug!(
            "rendered template: memory={} stack={} registers={} code={}B -> {}B",
            params.memory_size,
            params.stack_size,
            params.register_count,
            params.code.len(),
            out.len()
        );
        Ok(out)
    }
}

/// Parse `source` and render it with `params` in one step.
pub fn render(source: &str, params: &ResourceParams) -> Result<String, RenderError> {
    Template::parse(source)?.render(params)
}

/// Report slot markers occurring inside lowered instruction text.
///
/// These are emitted verbatim by [`Template::render`]; a driver may want to
/// warn about them since they usually indicate a lowering bug.
pub fn lint_code(code: &str) -> Vec<String> {
    scan_markers(code)
        .into_iter()
        .map(|hit| {
            let line = code[..hit.start].matches('\n').count() + 1;
            format!(
                "instruction text line {line} contains placeholder {} (emitted verbatim)",
                hit.slot.marker()
            )
        })
        .collect()
}
