// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-way trigger latch.

/// Boolean latch that can only ever go from unset to set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerLatch {
    set: bool,
}

impl TriggerLatch {
    /// Create an unset latch
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the latch has been set
    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Set the latch. Setting an already set latch has no effect.
    pub fn set(&mut self) {
        self.set = true;
    }
}
