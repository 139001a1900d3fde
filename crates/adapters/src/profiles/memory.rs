// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory profile store

use super::ProfileStore;
use cb_core::{Driver, Profile, ProfileError};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Inner {
    profiles: BTreeMap<String, Profile>,
    drivers: Vec<Driver>,
    active: Option<String>,
}

/// Profile store held in process memory.
///
/// The host application loads it from whatever configuration it owns.
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryProfileStore {
    pub fn new(drivers: Vec<Driver>) -> Self {
        let mut drivers = drivers;
        drivers.sort_by(|a, b| a.display.cmp(&b.display));
        Self {
            inner: Arc::new(RwLock::new(Inner {
                drivers,
                ..Default::default()
            })),
        }
    }

    /// Add a profile during setup, ignoring validation
    pub fn with_profile(self, profile: Profile) -> Self {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .profiles
            .insert(profile.name.clone(), profile);
        self
    }

    pub fn active_name(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .active
            .clone()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, name: &str) -> Result<Profile, ProfileError> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    fn list(&self) -> Vec<Profile> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .profiles
            .values()
            .cloned()
            .collect()
    }

    fn drivers(&self) -> Vec<Driver> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .drivers
            .clone()
    }

    fn save(&self, profile: Profile) -> Result<(), ProfileError> {
        if profile.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if !inner.drivers.iter().any(|d| d.name == profile.driver) {
            return Err(ProfileError::DriverNotFound(profile.driver));
        }
        inner.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<Profile, ProfileError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let profile = inner
            .profiles
            .remove(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        if inner.active.as_deref() == Some(name) {
            inner.active = None;
        }
        Ok(profile)
    }

    fn activate(&self, name: &str) -> Result<(), ProfileError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if !inner.profiles.contains_key(name) {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        inner.active = Some(name.to_string());
        Ok(())
    }

    fn active(&self) -> Result<Profile, ProfileError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let name = inner.active.as_ref().ok_or(ProfileError::NoActive)?;
        inner
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(name.clone()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
