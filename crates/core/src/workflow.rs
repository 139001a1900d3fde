// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow state machine
//!
//! Pure bookkeeping for one setup run: which stages completed, whether the
//! run halted or finished, and which commands may still execute. The
//! controller consults it before running a command and updates it with each
//! stage outcome. Nothing here performs I/O.

use crate::command::RunCommand;
use crate::stage::{Advance, Stage};
use thiserror::Error;

/// Why a command was not executed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("workflow already finished")]
    Finished,
    #[error("workflow halted after {stage} failed")]
    Halted { stage: Stage },
    #[error("stage {stage} is out of order (expected {expected:?})")]
    OutOfOrder {
        stage: Stage,
        expected: Option<Stage>,
    },
    #[error("stage {stage} only runs after its gate was accepted")]
    RequiresConsent { stage: Stage },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    completed: Option<Stage>,
    in_flight: Option<Stage>,
    halted: Option<Stage>,
    connected: bool,
    finished: bool,
    /// Stage an accepted gate allowed to run next
    granted: Option<Stage>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stage that may run next without skipping; `Done` is always allowed
    pub fn expected(&self) -> Option<Stage> {
        if self.finished || self.halted.is_some() {
            return None;
        }
        match self.completed {
            None => Some(Stage::Init),
            Some(stage) => stage.next(),
        }
    }

    /// Check whether `command` may execute now
    pub fn admit(&self, command: &RunCommand) -> Result<(), Rejection> {
        if self.finished {
            return Err(Rejection::Finished);
        }
        if let Some(stage) = self.halted {
            return Err(Rejection::Halted { stage });
        }

        let stage = command.stage;
        let expected = self.expected();
        if stage != Stage::Done && Some(stage) != expected {
            return Err(Rejection::OutOfOrder { stage, expected });
        }
        if stage.requires_consent() && self.granted != Some(stage) {
            return Err(Rejection::RequiresConsent { stage });
        }
        Ok(())
    }

    /// Record that an accepted gate allows `stage` to run.
    ///
    /// The grant is used up by the next completed or failed stage.
    pub fn grant(&mut self, stage: Stage) {
        self.granted = Some(stage);
    }

    pub fn granted(&self) -> Option<Stage> {
        self.granted
    }

    pub fn begin(&mut self, stage: Stage) {
        self.in_flight = Some(stage);
    }

    /// Record a successful stage and return what should happen next
    pub fn complete(&mut self, stage: Stage) -> Advance {
        self.in_flight = None;
        self.granted = None;
        self.completed = Some(stage);
        match stage {
            Stage::Init => self.connected = true,
            Stage::Done => self.finished = true,
            _ => {}
        }
        stage.advance()
    }

    /// Record a failed stage; nothing runs afterwards
    pub fn fail(&mut self, stage: Stage) {
        self.in_flight = None;
        self.granted = None;
        self.halted = Some(stage);
    }

    pub fn in_flight(&self) -> Option<Stage> {
        self.in_flight
    }

    pub fn completed(&self) -> Option<Stage> {
        self.completed
    }

    pub fn halted(&self) -> Option<Stage> {
        self.halted
    }

    /// Whether `Init` succeeded, so a connection is open
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
