// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow tuning

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Longest the worker waits on the command queue before rechecking its stop flag
pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid workflow config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Bounded wait on the command queue
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Default wait used by callers that shut down without their own timeout
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl WorkflowConfig {
    /// Parse a `[workflow]`-style TOML table
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: WorkflowConfig = toml::from_str(source)?;
        let poll_interval = config.poll_interval;
        Ok(config.with_poll_interval(poll_interval))
    }

    /// Clamped to `(0, MAX_POLL_INTERVAL]`
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.clamp(Duration::from_millis(1), MAX_POLL_INTERVAL);
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
