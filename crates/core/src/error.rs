// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage failure causes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a stage failed. Carried on the `ERROR` event for that stage.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageError {
    #[error("no usable database profile: {message}")]
    Profile { message: String },
    #[error("database backend unavailable for driver {driver}: {message}")]
    BackendUnavailable { driver: String, message: String },
    #[error("could not connect to database: {message}")]
    Connection { message: String },
    #[error("failed to load models for module {module}: {message}")]
    Load { module: String, message: String },
    #[error("schema operation failed: {message}")]
    Schema { message: String },
    #[error("failed to insert test data for module {module}: {message}")]
    Seed { module: String, message: String },
    #[error("stage body panicked: {message}")]
    Panicked { message: String },
}

impl StageError {
    /// Whether the user can fix this by adjusting the connection configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StageError::Profile { .. }
                | StageError::BackendUnavailable { .. }
                | StageError::Connection { .. }
        )
    }
}
