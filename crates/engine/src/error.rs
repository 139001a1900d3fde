// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the workflow controller

use thiserror::Error;

/// Errors from driving the workflow controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("no tokio runtime available to host the worker")]
    NoRuntime,
    #[error("workflow controller already shut down")]
    Stopped,
}
