// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::database::{ConnectError, DatabaseConnector, SchemaError};
use crate::modules::{LoadError, Module, ModuleRef, ModuleRegistry, SeedError};
use async_trait::async_trait;
use cb_core::Profile;
use std::sync::Arc;
use tracing::Instrument;

/// Wrapper that adds tracing to any DatabaseConnector
#[derive(Clone)]
pub struct TracedDatabaseConnector<D> {
    inner: D,
}

impl<D> TracedDatabaseConnector<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<D: DatabaseConnector> DatabaseConnector for TracedDatabaseConnector<D> {
    async fn connect(&self, profile: &Profile) -> Result<(), ConnectError> {
        let span = tracing::info_span!(
            "database.connect",
            profile = %profile.name,
            driver = %profile.driver
        );
        async {
            tracing::info!(host = ?profile.settings.host, "connecting");

            let start = std::time::Instant::now();
            let result = self.inner.connect(profile).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "connected"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "connect failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn clear_schema(&self) -> Result<(), SchemaError> {
        let span = tracing::info_span!("database.clear_schema");
        async {
            tracing::warn!("dropping schema objects");

            let start = std::time::Instant::now();
            let result = self.inner.clear_schema().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "schema cleared"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "clear failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn create_schema(&self) -> Result<(), SchemaError> {
        let span = tracing::info_span!("database.create_schema");
        async {
            let start = std::time::Instant::now();
            let result = self.inner.create_schema().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "schema created"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "create failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn disconnect(&self) -> Result<(), ConnectError> {
        let result = self
            .inner
            .disconnect()
            .instrument(tracing::info_span!("database.disconnect"))
            .await;
        // Disconnect failing is usually harmless (connection already gone)
        match &result {
            Ok(()) => tracing::info!("disconnected"),
            Err(e) => tracing::warn!(error = %e, "disconnect failed (may be expected)"),
        }
        result
    }
}

/// Wrapper that adds tracing to every module a registry lists
#[derive(Clone)]
pub struct TracedModuleRegistry<M> {
    inner: M,
}

impl<M> TracedModuleRegistry<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: ModuleRegistry> ModuleRegistry for TracedModuleRegistry<M> {
    fn list_modules(&self) -> Vec<ModuleRef> {
        let modules = self.inner.list_modules();
        tracing::debug!(count = modules.len(), "listed modules");
        modules
            .into_iter()
            .map(|inner| Arc::new(TracedModule { inner }) as ModuleRef)
            .collect()
    }
}

struct TracedModule {
    inner: ModuleRef,
}

#[async_trait]
impl Module for TracedModule {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dependencies(&self) -> Vec<String> {
        self.inner.dependencies()
    }

    async fn load_models(&self) -> Result<(), LoadError> {
        let span = tracing::info_span!("module.load_models", module = self.inner.name());
        async {
            tracing::debug!("loading models");

            let start = std::time::Instant::now();
            let result = self.inner.load_models().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "models loaded"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "load failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn seed_test_data(&self) -> Result<(), SeedError> {
        let span = tracing::info_span!("module.seed_test_data", module = self.inner.name());
        async {
            tracing::debug!("adding test values");

            let start = std::time::Instant::now();
            let result = self.inner.seed_test_data().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "test values added"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "seed failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
