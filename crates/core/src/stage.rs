// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage descriptor table
//!
//! The setup workflow runs a fixed, ordered list of stages. Everything the
//! rest of the system needs to know about a stage (its position, its
//! human-readable text, and what follows it) lives here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the database setup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Load,
    Create,
    Test,
    Done,
}

/// What happens after a stage completes successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The controller submits the next stage itself
    Auto(Stage),
    /// The workflow waits for an external decision
    Gated { on_accept: Stage, on_reject: Stage },
    /// The workflow is over
    Finish,
}

/// Static description of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    pub stage: Stage,
    pub label: &'static str,
    pub start_message: &'static str,
    pub done_message: &'static str,
    pub error_message: &'static str,
    /// Question shown when the stage completes and the next step needs consent
    pub prompt: Option<&'static str>,
}

/// All stages, in execution order
pub const STAGES: [StageDescriptor; 5] = [
    StageDescriptor {
        stage: Stage::Init,
        label: "Initialize database",
        start_message: "Connecting to database...",
        done_message: "Connected to database.",
        error_message: "Could not connect to database!",
        prompt: None,
    },
    StageDescriptor {
        stage: Stage::Load,
        label: "Load database",
        start_message: "Loading models...",
        done_message: "Models loaded.",
        error_message: "Error loading models!",
        prompt: Some(
            "Reconfigure database? This will drop the tables in the database you chose and recreate it.",
        ),
    },
    StageDescriptor {
        stage: Stage::Create,
        label: "Create models",
        start_message: "Creating tables...",
        done_message: "Tables created.",
        error_message: "Error creating tables!",
        prompt: Some("Insert test values?"),
    },
    StageDescriptor {
        stage: Stage::Test,
        label: "Insert test data",
        start_message: "Inserting test values...",
        done_message: "Inserted test values.",
        error_message: "Error inserting test values!",
        prompt: None,
    },
    StageDescriptor {
        stage: Stage::Done,
        label: "Finished setting up database",
        start_message: "Finishing...",
        done_message: "Done.",
        error_message: "An error occurred!",
        prompt: None,
    },
];

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Stage; 5] = [
        Stage::Init,
        Stage::Load,
        Stage::Create,
        Stage::Test,
        Stage::Done,
    ];

    /// 1-based position in the sequence
    pub fn ordinal(self) -> u8 {
        match self {
            Stage::Init => 1,
            Stage::Load => 2,
            Stage::Create => 3,
            Stage::Test => 4,
            Stage::Done => 5,
        }
    }

    pub fn descriptor(self) -> &'static StageDescriptor {
        &STAGES[usize::from(self.ordinal() - 1)]
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// The stage that follows this one when nothing is skipped
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Init => Some(Stage::Load),
            Stage::Load => Some(Stage::Create),
            Stage::Create => Some(Stage::Test),
            Stage::Test => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    /// Transition taken when this stage completes successfully
    pub fn advance(self) -> Advance {
        match self {
            Stage::Init => Advance::Auto(Stage::Load),
            Stage::Load => Advance::Gated {
                on_accept: Stage::Create,
                on_reject: Stage::Done,
            },
            Stage::Create => Advance::Gated {
                on_accept: Stage::Test,
                on_reject: Stage::Done,
            },
            Stage::Test => Advance::Auto(Stage::Done),
            Stage::Done => Advance::Finish,
        }
    }

    /// Whether completing this stage opens a gate
    pub fn is_gated(self) -> bool {
        matches!(self.advance(), Advance::Gated { .. })
    }

    /// Whether this stage may only run after an accepted gate
    pub fn requires_consent(self) -> bool {
        Stage::ALL.iter().any(|s| {
            matches!(s.advance(), Advance::Gated { on_accept, .. } if on_accept == self)
        })
    }

    /// Whether this stage destroys existing data
    pub fn is_destructive(self) -> bool {
        self == Stage::Create
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Create => "create",
            Stage::Test => "test",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
