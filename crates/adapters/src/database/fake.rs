// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake database connector for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ConnectError, DatabaseConnector, SchemaError};
use async_trait::async_trait;
use cb_core::Profile;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded database call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseCall {
    Connect { profile: String },
    ClearSchema,
    CreateSchema,
    Disconnect,
}

/// Operation selector for injected failures and delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseOp {
    Connect,
    ClearSchema,
    CreateSchema,
    Disconnect,
}

#[derive(Default)]
struct FakeDatabaseState {
    connected: bool,
    schema_present: bool,
    connect_error: Option<ConnectError>,
    schema_errors: HashMap<DatabaseOp, String>,
    delays: HashMap<DatabaseOp, Duration>,
}

/// Fake database connector for testing
#[derive(Clone, Default)]
pub struct FakeDatabase {
    state: Arc<Mutex<FakeDatabaseState>>,
    calls: Arc<Mutex<Vec<DatabaseCall>>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DatabaseCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).connected
    }

    pub fn has_schema(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).schema_present
    }

    /// Make the next `connect` calls fail with `error`
    pub fn fail_connect(&self, error: ConnectError) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).connect_error = Some(error);
    }

    /// Make `clear_schema` or `create_schema` fail with `message`
    pub fn fail_schema(&self, op: DatabaseOp, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .schema_errors
            .insert(op, message.into());
    }

    /// Make `op` take `delay` before completing
    pub fn delay(&self, op: DatabaseOp, delay: Duration) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .delays
            .insert(op, delay);
    }

    fn record(&self, call: DatabaseCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    async fn wait(&self, op: DatabaseOp) {
        let delay = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .delays
            .get(&op)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn schema_op(&self, op: DatabaseOp) -> Result<(), SchemaError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.connected {
            return Err(SchemaError::NotConnected);
        }
        if let Some(message) = state.schema_errors.get(&op) {
            return Err(match op {
                DatabaseOp::ClearSchema => SchemaError::Clear(message.clone()),
                _ => SchemaError::Create(message.clone()),
            });
        }
        state.schema_present = op == DatabaseOp::CreateSchema;
        Ok(())
    }
}

#[async_trait]
impl DatabaseConnector for FakeDatabase {
    async fn connect(&self, profile: &Profile) -> Result<(), ConnectError> {
        self.record(DatabaseCall::Connect {
            profile: profile.name.clone(),
        });
        self.wait(DatabaseOp::Connect).await;

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(error) = state.connect_error.clone() {
            return Err(error);
        }
        state.connected = true;
        Ok(())
    }

    async fn clear_schema(&self) -> Result<(), SchemaError> {
        self.record(DatabaseCall::ClearSchema);
        self.wait(DatabaseOp::ClearSchema).await;
        self.schema_op(DatabaseOp::ClearSchema)
    }

    async fn create_schema(&self) -> Result<(), SchemaError> {
        self.record(DatabaseCall::CreateSchema);
        self.wait(DatabaseOp::CreateSchema).await;
        self.schema_op(DatabaseOp::CreateSchema)
    }

    async fn disconnect(&self) -> Result<(), ConnectError> {
        self.record(DatabaseCall::Disconnect);
        self.wait(DatabaseOp::Disconnect).await;

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.connected {
            return Err(ConnectError::Connection("not connected".to_string()));
        }
        state.connected = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
