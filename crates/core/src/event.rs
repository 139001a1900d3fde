// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress events emitted while a stage runs

use crate::error::StageError;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle marker for a single stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Start,
    /// Stage-local completion, 0..=100
    Progress { percent: u8 },
    Done,
    Error { cause: StageError },
}

impl Phase {
    /// `Done` and `Error` end a stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Error { .. })
    }
}

/// Immutable notification delivered to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: Stage,
    #[serde(flatten)]
    pub phase: Phase,
}

impl StageEvent {
    pub fn start(stage: Stage) -> Self {
        Self {
            stage,
            phase: Phase::Start,
        }
    }

    /// Progress is clamped to 100
    pub fn progress(stage: Stage, percent: u8) -> Self {
        Self {
            stage,
            phase: Phase::Progress {
                percent: percent.min(100),
            },
        }
    }

    pub fn done(stage: Stage) -> Self {
        Self {
            stage,
            phase: Phase::Done,
        }
    }

    pub fn error(stage: Stage, cause: StageError) -> Self {
        Self {
            stage,
            phase: Phase::Error { cause },
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The event that ends the whole workflow
    pub fn is_final(&self) -> bool {
        self.stage == Stage::Done && self.phase == Phase::Done
    }

    pub fn percent(&self) -> Option<u8> {
        match self.phase {
            Phase::Progress { percent } => Some(percent),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&StageError> {
        match &self.phase {
            Phase::Error { cause } => Some(cause),
            _ => None,
        }
    }

    /// Text an observer would show next to the stage
    pub fn message(&self) -> String {
        let descriptor = self.stage.descriptor();
        match &self.phase {
            Phase::Start => descriptor.start_message.to_string(),
            Phase::Progress { percent } => format!("{} {}%", descriptor.start_message, percent),
            Phase::Done => descriptor.done_message.to_string(),
            Phase::Error { cause } => format!("{} {}", descriptor.error_message, cause),
        }
    }
}

impl fmt::Display for StageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.phase {
            Phase::Start => write!(f, "{}:start", self.stage),
            Phase::Progress { percent } => write!(f, "{}:progress({})", self.stage, percent),
            Phase::Done => write!(f, "{}:done", self.stage),
            Phase::Error { .. } => write!(f, "{}:error", self.stage),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
