// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Coinbox database setup workflow engine

mod channel;
mod controller;
mod error;
mod executor;
mod gate;
mod observer;
mod profiles;

pub use channel::{EventReceiver, EventSender, ProgressChannel};
pub use controller::{CommandSender, ShutdownStatus, WorkflowController};
pub use error::WorkflowError;
pub use executor::{StageExecutor, WorkflowDeps};
pub use gate::Gate;
pub use observer::{observe, Observer};
pub use profiles::{select_profile, ProfileChoice};
