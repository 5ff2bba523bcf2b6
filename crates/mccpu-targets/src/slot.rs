//! Placeholder slots and the `%name` marker syntax.
//!
//! A marker is the sigil `%` immediately followed by an identifier. Only
//! identifiers that name one of the four slots are markers; every other `%`
//! (format strings, modulo operators, `%%`) is ordinary template text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sigil that introduces a placeholder marker.
pub const SIGIL: char = '%';

/// A named insertion point in a target template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Size of the flat memory region, in byte units.
    MemorySize,
    /// Size of the stack region, in byte units.
    StackSize,
    /// Number of byte-sized registers.
    RegisterCount,
    /// Lowered instruction text.
    Code,
}

impl Slot {
    /// Every slot a template must contain, in declaration order.
    pub const ALL: [Slot; 4] = [
        Slot::MemorySize,
        Slot::StackSize,
        Slot::RegisterCount,
        Slot::Code,
    ];

    /// The numeric slots, i.e. everything except [`Slot::Code`].
    pub const NUMERIC: [Slot; 3] = [Slot::MemorySize, Slot::StackSize, Slot::RegisterCount];

    /// Identifier used after the sigil.
    pub fn name(self) -> &'static str {
        match self {
            Slot::MemorySize => "memory_size",
            Slot::StackSize => "stack_size",
            Slot::RegisterCount => "register_count",
            Slot::Code => "code",
        }
    }

    /// Full marker text as it appears in a template, e.g. `%code`.
    pub fn marker(self) -> String {
        format!("{SIGIL}{}", self.name())
    }

    /// Look up a slot by its identifier.
    pub fn from_name(name: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Whether the slot takes an integer value.
    pub fn is_numeric(self) -> bool {
        self != Slot::Code
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A marker found in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerHit {
    /// The slot the marker names.
    pub slot: Slot,
    /// Byte offset of the sigil.
    pub start: usize,
    /// Byte offset one past the end of the identifier.
    pub end: usize,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find every slot marker in `text`, in order of appearance.
///
/// Identifiers are matched greedily, so `%codex` is not a marker for `code`.
pub fn scan_markers(text: &str) -> Vec<MarkerHit> {
    let bytes = text.as_bytes();
    let mut hits = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != SIGIL as u8 {
            i += 1;
            continue;
        }
        let ident_start = i + 1;
        let mut j = ident_start;
        while j < bytes.len() && is_ident_byte(bytes[j]) {
            j += 1;
        }
        // Identifier bytes are ASCII, so both offsets fall on char boundaries.
        if let Some(slot) = Slot::from_name(&text[ident_start..j]) {
            hits.push(MarkerHit { slot, start: i, end: j });
        }
        i = j.max(i + 1);
    }
    hits
}
