// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Choosing the profile a run connects with

use cb_adapters::ProfileStore;
use cb_core::{ConnectionSettings, Profile, ProfileError};

/// How the user picked a connection profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileChoice {
    /// Create a profile under a name that is not taken yet
    New {
        name: String,
        driver: String,
        settings: ConnectionSettings,
    },
    /// Use an existing profile as is
    Select { name: String },
    /// Change an editable profile, optionally renaming it
    Edit {
        name: String,
        new_name: Option<String>,
        settings: ConnectionSettings,
    },
}

/// Apply `choice` to `store` and make the resulting profile active
pub fn select_profile<P: ProfileStore>(
    store: &P,
    choice: ProfileChoice,
) -> Result<Profile, ProfileError> {
    let profile = match choice {
        ProfileChoice::New {
            name,
            driver,
            settings,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ProfileError::EmptyName);
            }
            if store.get(&name).is_ok() {
                return Err(ProfileError::NameTaken(name));
            }
            let driver = store.driver(&driver)?;
            let settings = driver.normalize(&settings)?;
            let profile = Profile::new(name, driver.name).with_settings(settings);
            store.save(profile.clone())?;
            profile
        }

        ProfileChoice::Select { name } => store.get(&name)?,

        ProfileChoice::Edit {
            name,
            new_name,
            settings,
        } => {
            let existing = store.get(&name)?;
            if !existing.editable {
                return Err(ProfileError::NotEditable(name));
            }
            let target = match new_name.map(|n| n.trim().to_string()) {
                Some(n) if n.is_empty() => return Err(ProfileError::EmptyName),
                Some(n) => n,
                None => name.clone(),
            };
            if target != name && store.get(&target).is_ok() {
                return Err(ProfileError::NameTaken(target));
            }

            let driver = store.driver(&existing.driver)?;
            let settings = driver.normalize(&settings)?;
            let profile = Profile {
                name: target,
                settings,
                ..existing
            };
            if profile.name != name {
                store.remove(&name)?;
            }
            store.save(profile.clone())?;
            profile
        }
    };

    store.activate(&profile.name)?;
    tracing::info!(profile = %profile.name, driver = %profile.driver, "profile selected");
    Ok(profile)
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod tests;
