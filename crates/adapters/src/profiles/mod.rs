// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Profile store adapters

mod memory;

pub use memory::MemoryProfileStore;

use cb_core::{Driver, Profile, ProfileError};

/// Source of connection profiles and the drivers they bind to
pub trait ProfileStore: Clone + Send + Sync + 'static {
    fn get(&self, name: &str) -> Result<Profile, ProfileError>;

    /// All profiles, sorted by name
    fn list(&self) -> Vec<Profile>;

    /// All drivers, sorted by display name
    fn drivers(&self) -> Vec<Driver>;

    fn driver(&self, name: &str) -> Result<Driver, ProfileError> {
        self.drivers()
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ProfileError::DriverNotFound(name.to_string()))
    }

    /// Insert or replace a profile
    fn save(&self, profile: Profile) -> Result<(), ProfileError>;

    fn remove(&self, name: &str) -> Result<Profile, ProfileError>;

    /// Make `name` the profile used by the next connection
    fn activate(&self, name: &str) -> Result<(), ProfileError>;

    fn active(&self) -> Result<Profile, ProfileError>;
}
