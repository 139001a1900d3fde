// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress arithmetic

use crate::stage::Stage;

/// Progress after the module at `index` (zero-based) of `total` has finished,
/// rounded to the nearest percent. Three modules report 0, 33, 67.
pub fn fraction(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let index = index.min(total);
    let percent = (index * 200 + total) / (total * 2);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

/// Map a stage-local percentage onto a single bar spanning every stage
pub fn overall(stage: Stage, percent: u8) -> u8 {
    let stages = Stage::ALL.len() as u32;
    let completed = u32::from(stage.ordinal() - 1) * 100;
    let value = (completed + u32::from(percent.min(100))) / stages;
    u8::try_from(value).unwrap_or(100)
}

/// Keeps the progress reported for one stage non-decreasing and bounded
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressTracker {
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value to report, never lower than a previous one
    pub fn observe(&mut self, percent: u8) -> u8 {
        let value = percent.min(100).max(self.last.unwrap_or(0));
        self.last = Some(value);
        value
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
