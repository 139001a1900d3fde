// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection profiles and database drivers

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from profile lookup and validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("profile not found: {0}")]
    NotFound(String),
    #[error("profile is not editable: {0}")]
    NotEditable(String),
    #[error("a profile named {0} already exists")]
    NameTaken(String),
    #[error("profile name must not be empty")]
    EmptyName,
    #[error("driver not found: {0}")]
    DriverNotFound(String),
    #[error("driver {driver} requires {field}")]
    MissingField { driver: String, field: SettingField },
    #[error("no active profile")]
    NoActive,
}

/// A connection parameter a driver may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingField {
    Host,
    Port,
    Username,
    Password,
    Database,
    Query,
}

impl SettingField {
    /// Display order for connection forms
    pub const ALL: [SettingField; 6] = [
        SettingField::Host,
        SettingField::Port,
        SettingField::Username,
        SettingField::Password,
        SettingField::Database,
        SettingField::Query,
    ];
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingField::Host => "host",
            SettingField::Port => "port",
            SettingField::Username => "username",
            SettingField::Password => "password",
            SettingField::Database => "database",
            SettingField::Query => "query",
        };
        f.write_str(name)
    }
}

/// Connection parameters; `None` means "not set"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub query: Option<String>,
}

impl ConnectionSettings {
    pub fn is_set(&self, field: SettingField) -> bool {
        match field {
            SettingField::Host => self.host.is_some(),
            SettingField::Port => self.port.is_some(),
            SettingField::Username => self.username.is_some(),
            SettingField::Password => self.password.is_some(),
            SettingField::Database => self.database.is_some(),
            SettingField::Query => self.query.is_some(),
        }
    }

    fn clear(&mut self, field: SettingField) {
        match field {
            SettingField::Host => self.host = None,
            SettingField::Port => self.port = None,
            SettingField::Username => self.username = None,
            SettingField::Password => self.password = None,
            SettingField::Database => self.database = None,
            SettingField::Query => self.query = None,
        }
    }

    /// Fill `field` from a textual default when it is unset.
    /// Defaults that do not parse (e.g. a non-numeric port) are ignored.
    fn fill(&mut self, field: SettingField, value: &str) {
        if self.is_set(field) {
            return;
        }
        let text = Some(value.to_string());
        match field {
            SettingField::Host => self.host = text,
            SettingField::Port => self.port = value.parse().ok(),
            SettingField::Username => self.username = text,
            SettingField::Password => self.password = text,
            SettingField::Database => self.database = text,
            SettingField::Query => self.query = text,
        }
    }
}

/// One entry of a driver's connection form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverField {
    pub field: SettingField,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<String>,
}

impl DriverField {
    pub fn required(field: SettingField, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(field: SettingField, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            required: false,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A database backend and the settings it understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub name: String,
    pub display: String,
    pub fields: Vec<DriverField>,
}

impl Driver {
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display: display.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: DriverField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, field: SettingField) -> Option<&DriverField> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Keep only the settings this driver uses, apply defaults to required
    /// fields and reject required fields that are still missing.
    pub fn normalize(&self, settings: &ConnectionSettings) -> Result<ConnectionSettings, ProfileError> {
        let mut normalized = settings.clone();
        for field in SettingField::ALL {
            let Some(entry) = self.field(field) else {
                normalized.clear(field);
                continue;
            };
            if !entry.required {
                continue;
            }
            if let Some(default) = &entry.default {
                normalized.fill(field, default);
            }
            if !normalized.is_set(field) {
                return Err(ProfileError::MissingField {
                    driver: self.name.clone(),
                    field,
                });
            }
        }
        Ok(normalized)
    }
}

/// A named connection configuration bound to a driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Name of the driver
    pub driver: String,
    /// Built-in profiles may be selected but not edited
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(default)]
    pub settings: ConnectionSettings,
}

fn default_editable() -> bool {
    true
}

impl Profile {
    pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: driver.into(),
            editable: true,
            settings: ConnectionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ConnectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
