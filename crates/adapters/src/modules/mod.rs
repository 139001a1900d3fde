// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application module adapters
//!
//! Every application module owns a slice of the schema and may ship test
//! data. The setup workflow only needs two hooks per module.

mod ordered;

pub use ordered::{OrderedModuleRegistry, RegistryError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeModule, FakeModuleRegistry, ModuleCall, ModuleHook};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A module's schema definitions could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LoadError(pub String);

/// A module's test data could not be inserted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SeedError(pub String);

/// An application module as seen by the setup workflow
#[async_trait]
pub trait Module: Send + Sync {
    /// Short unique name, e.g. `"sales"`
    fn name(&self) -> &str;

    /// Names of modules whose models must be loaded first
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Register the module's models with the database layer
    async fn load_models(&self) -> Result<(), LoadError>;

    /// Insert the module's test values
    async fn seed_test_data(&self) -> Result<(), SeedError>;
}

pub type ModuleRef = Arc<dyn Module>;

/// Source of the ordered module list
pub trait ModuleRegistry: Clone + Send + Sync + 'static {
    fn list_modules(&self) -> Vec<ModuleRef>;
}
