// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the database, application modules and connection profiles

pub mod database;
pub mod modules;
pub mod profiles;
pub mod traced;

pub use database::{ConnectError, DatabaseConnector, SchemaError};
pub use modules::{
    LoadError, Module, ModuleRef, ModuleRegistry, OrderedModuleRegistry, RegistryError, SeedError,
};
pub use profiles::{MemoryProfileStore, ProfileStore};
pub use traced::{TracedDatabaseConnector, TracedModuleRegistry};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use database::{DatabaseCall, DatabaseOp, FakeDatabase};
#[cfg(any(test, feature = "test-support"))]
pub use modules::{FakeModule, FakeModuleRegistry, ModuleCall, ModuleHook};
