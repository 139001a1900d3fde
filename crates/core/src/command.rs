// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands and gate decisions

use crate::stage::{Advance, Stage};
use serde::{Deserialize, Serialize};

/// Who asked for a stage to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOrigin {
    Observer,
    /// Submitted by the controller after a stage without a gate
    Auto,
    /// Submitted by resolving a pending decision
    Gate,
}

/// Request to execute one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCommand {
    pub stage: Stage,
    pub origin: CommandOrigin,
}

impl RunCommand {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            origin: CommandOrigin::Observer,
        }
    }

    pub fn auto(stage: Stage) -> Self {
        Self {
            stage,
            origin: CommandOrigin::Auto,
        }
    }

    pub fn gated(stage: Stage) -> Self {
        Self {
            stage,
            origin: CommandOrigin::Gate,
        }
    }
}

/// Answer to a pending decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
}

/// A question the workflow is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    /// The stage whose completion raised the question
    pub stage: Stage,
    pub prompt: &'static str,
    pub on_accept: RunCommand,
    pub on_reject: RunCommand,
}

impl PendingDecision {
    pub fn new(stage: Stage, on_accept: Stage, on_reject: Stage) -> Self {
        Self {
            stage,
            prompt: stage.descriptor().prompt.unwrap_or(""),
            on_accept: RunCommand::gated(on_accept),
            on_reject: RunCommand::gated(on_reject),
        }
    }

    /// The decision raised when `stage` completes, if that stage is gated
    pub fn after(stage: Stage) -> Option<Self> {
        match stage.advance() {
            Advance::Gated {
                on_accept,
                on_reject,
            } => Some(Self::new(stage, on_accept, on_reject)),
            Advance::Auto(_) | Advance::Finish => None,
        }
    }

    pub fn command_for(&self, decision: Decision) -> RunCommand {
        match decision {
            Decision::Accept => self.on_accept,
            Decision::Reject => self.on_reject,
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
