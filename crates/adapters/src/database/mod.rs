// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database connector adapters

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DatabaseCall, DatabaseOp, FakeDatabase};

use async_trait::async_trait;
use cb_core::{Profile, StageError};
use thiserror::Error;

/// Errors from establishing or closing a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The backend library for the driver is not installed or not loadable
    #[error("backend unavailable for driver {driver}: {message}")]
    BackendUnavailable { driver: String, message: String },
    /// Network, credential or server failure
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Errors from schema operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("not connected")]
    NotConnected,
    #[error("clearing schema failed: {0}")]
    Clear(String),
    #[error("creating schema failed: {0}")]
    Create(String),
}

impl From<ConnectError> for StageError {
    fn from(err: ConnectError) -> Self {
        match err {
            ConnectError::BackendUnavailable { driver, message } => {
                StageError::BackendUnavailable { driver, message }
            }
            ConnectError::Connection(message) => StageError::Connection { message },
        }
    }
}

impl From<SchemaError> for StageError {
    fn from(err: SchemaError) -> Self {
        StageError::Schema {
            message: err.to_string(),
        }
    }
}

/// The database layer the setup workflow drives
#[async_trait]
pub trait DatabaseConnector: Clone + Send + Sync + 'static {
    /// Open a connection using the given profile
    async fn connect(&self, profile: &Profile) -> Result<(), ConnectError>;

    /// Drop every schema object the application owns
    async fn clear_schema(&self) -> Result<(), SchemaError>;

    /// Create the application schema
    async fn create_schema(&self) -> Result<(), SchemaError>;

    /// Close the connection opened by `connect`
    async fn disconnect(&self) -> Result<(), ConnectError>;
}
