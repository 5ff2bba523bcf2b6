//! The resource parameter set handed over by the lowering pass.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::slot::Slot;

/// Sizing of the abstract machine plus the lowered instruction text.
///
/// Built once per compilation and consumed by a single render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceParams {
    /// Byte units of flat memory.
    pub memory_size: u64,
    /// Byte units of stack.
    pub stack_size: u64,
    /// Number of byte-sized registers.
    pub register_count: u64,
    /// Target-specific instruction text, inserted verbatim.
    #[serde(default)]
    pub code: String,
}

impl ResourceParams {
    pub fn new(memory_size: u64, stack_size: u64, register_count: u64, code: impl Into<String>) -> Self {
        Self {
            memory_size,
            stack_size,
            register_count,
            code: code.into(),
        }
    }

    /// Build from signed counts, rejecting negative values.
    pub fn try_from_signed(
        memory_size: i64,
        stack_size: i64,
        register_count: i64,
        code: impl Into<String>,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            memory_size: non_negative(Slot::MemorySize, memory_size)?,
            stack_size: non_negative(Slot::StackSize, stack_size)?,
            register_count: non_negative(Slot::RegisterCount, register_count)?,
            code: code.into(),
        })
    }

    /// The value bound to a numeric slot. `None` for [`Slot::Code`].
    pub fn count(&self, slot: Slot) -> Option<u64> {
        match slot {
            Slot::MemorySize => Some(self.memory_size),
            Slot::StackSize => Some(self.stack_size),
            Slot::RegisterCount => Some(self.register_count),
            Slot::Code => None,
        }
    }

    /// Check every numeric parameter against a target's largest declarable size.
    pub fn check_limit(&self, max_size: u64) -> Result<(), RenderError> {
        for slot in Slot::NUMERIC {
            let value = self.count(slot).unwrap_or_default();
            if value > max_size {
                return Err(RenderError::InvalidParameter {
                    slot,
                    value: value.into(),
                    reason: format!("exceeds the target maximum of {max_size}"),
                });
            }
        }
        Ok(())
    }
}

fn non_negative(slot: Slot, value: i64) -> Result<u64, RenderError> {
    u64::try_from(value).map_err(|_| RenderError::InvalidParameter {
        slot,
        value: value.into(),
        reason: "must not be negative".into(),
    })
}
