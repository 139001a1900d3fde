// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency-ordered module registry

use super::{ModuleRef, ModuleRegistry};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("module registered twice: {0}")]
    Duplicate(String),
    #[error("module {module} depends on unknown module {dependency}")]
    UnknownDependency { module: String, dependency: String },
    #[error("dependency cycle between modules: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// Registry that lists modules so every module follows its dependencies.
///
/// Among modules whose dependencies are satisfied, registration order wins.
#[derive(Clone, Default)]
pub struct OrderedModuleRegistry {
    modules: Arc<Vec<ModuleRef>>,
}

impl OrderedModuleRegistry {
    pub fn new(modules: Vec<ModuleRef>) -> Result<Self, RegistryError> {
        let mut names = HashSet::new();
        for module in &modules {
            if !names.insert(module.name().to_string()) {
                return Err(RegistryError::Duplicate(module.name().to_string()));
            }
        }
        for module in &modules {
            if let Some(dependency) = module
                .dependencies()
                .into_iter()
                .find(|d| !names.contains(d))
            {
                return Err(RegistryError::UnknownDependency {
                    module: module.name().to_string(),
                    dependency,
                });
            }
        }

        let mut remaining = modules;
        let mut ordered: Vec<ModuleRef> = Vec::with_capacity(remaining.len());
        let mut placed: HashSet<String> = HashSet::new();

        while !remaining.is_empty() {
            let ready = remaining
                .iter()
                .position(|m| m.dependencies().iter().all(|d| placed.contains(d)));
            let Some(index) = ready else {
                let mut cycle: Vec<String> =
                    remaining.iter().map(|m| m.name().to_string()).collect();
                cycle.sort();
                return Err(RegistryError::Cycle(cycle));
            };
            let module = remaining.remove(index);
            placed.insert(module.name().to_string());
            ordered.push(module);
        }

        Ok(Self {
            modules: Arc::new(ordered),
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleRegistry for OrderedModuleRegistry {
    fn list_modules(&self) -> Vec<ModuleRef> {
        self.modules.as_ref().clone()
    }
}

#[cfg(test)]
#[path = "ordered_tests.rs"]
mod tests;
