// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake modules for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LoadError, Module, ModuleRef, ModuleRegistry, SeedError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Which module hook ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleHook {
    LoadModels,
    SeedTestData,
}

/// Recorded module call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCall {
    pub module: String,
    pub hook: ModuleHook,
}

#[derive(Default)]
struct FakeModuleState {
    load_error: Option<String>,
    seed_error: Option<String>,
    delay: Option<Duration>,
}

/// Fake module that records hook calls into a shared log
pub struct FakeModule {
    name: String,
    dependencies: Vec<String>,
    state: Mutex<FakeModuleState>,
    calls: Arc<Mutex<Vec<ModuleCall>>>,
}

impl FakeModule {
    pub fn fail_load(&self, message: impl Into<String>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).load_error = Some(message.into());
    }

    pub fn fail_seed(&self, message: impl Into<String>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).seed_error = Some(message.into());
    }

    /// Make every hook take `delay` before completing
    pub fn delay(&self, delay: Duration) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).delay = Some(delay);
    }

    async fn run(&self, hook: ModuleHook) -> Option<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ModuleCall {
                module: self.name.clone(),
                hook,
            });

        let (delay, error) = {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let error = match hook {
                ModuleHook::LoadModels => state.load_error.clone(),
                ModuleHook::SeedTestData => state.seed_error.clone(),
            };
            (state.delay, error)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        error
    }
}

#[async_trait]
impl Module for FakeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    async fn load_models(&self) -> Result<(), LoadError> {
        match self.run(ModuleHook::LoadModels).await {
            Some(message) => Err(LoadError(message)),
            None => Ok(()),
        }
    }

    async fn seed_test_data(&self) -> Result<(), SeedError> {
        match self.run(ModuleHook::SeedTestData).await {
            Some(message) => Err(SeedError(message)),
            None => Ok(()),
        }
    }
}

/// Fake registry listing modules in the order they were added
#[derive(Clone, Default)]
pub struct FakeModuleRegistry {
    modules: Arc<Mutex<Vec<Arc<FakeModule>>>>,
    calls: Arc<Mutex<Vec<ModuleCall>>>,
}

impl FakeModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with modules of the given names
    pub fn with_modules(names: &[&str]) -> Self {
        let registry = Self::new();
        for name in names {
            registry.add(name);
        }
        registry
    }

    pub fn add(&self, name: &str) -> Arc<FakeModule> {
        self.add_with_dependencies(name, &[])
    }

    pub fn add_with_dependencies(&self, name: &str, dependencies: &[&str]) -> Arc<FakeModule> {
        let module = Arc::new(FakeModule {
            name: name.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            state: Mutex::new(FakeModuleState::default()),
            calls: Arc::clone(&self.calls),
        });
        self.modules
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::clone(&module));
        module
    }

    pub fn get(&self, name: &str) -> Option<Arc<FakeModule>> {
        self.modules
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|m| m.name == name)
            .cloned()
    }

    /// Get all recorded hook calls, across every module
    pub fn calls(&self) -> Vec<ModuleCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ModuleRegistry for FakeModuleRegistry {
    fn list_modules(&self) -> Vec<ModuleRef> {
        self.modules
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|m| Arc::clone(m) as ModuleRef)
            .collect()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
