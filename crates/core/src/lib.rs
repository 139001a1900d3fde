// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cb-core: Core types for the Coinbox database setup workflow
//!
//! This crate provides:
//! - The stage descriptor table and transition rules
//! - Progress events and failure causes
//! - The pure workflow state machine used to admit commands
//! - Connection profiles and drivers

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod profile;
pub mod progress;
pub mod stage;
pub mod workflow;

pub use command::{CommandOrigin, Decision, PendingDecision, RunCommand};
pub use config::{ConfigError, WorkflowConfig, MAX_POLL_INTERVAL};
pub use error::StageError;
pub use event::{Phase, StageEvent};
pub use id::RunId;
pub use profile::{
    ConnectionSettings, Driver, DriverField, Profile, ProfileError, SettingField,
};
pub use progress::ProgressTracker;
pub use stage::{Advance, Stage, StageDescriptor, STAGES};
pub use workflow::{Rejection, WorkflowState};
