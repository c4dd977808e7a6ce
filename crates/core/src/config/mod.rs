// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading
//!
//! The configuration is read once at startup. It names the applications that
//! can be locked and carries the static identity directory.

mod apps;

pub use apps::AppRegistry;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Service id reserved for interactive use
pub const INTERACTIVE_SERVICE_ID: u32 = 1;

/// Default number of superseded log entries tolerated before compaction
pub const DEFAULT_COMPACT_THRESHOLD: u64 = 1000;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A user known to the identity directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEntry {
    pub id: u32,
    pub name: String,
    /// Certificate subject the user authenticates with
    pub subject: String,
    /// Authority that issued the certificate
    pub issuer: String,
    /// May lock and unlock (everyone may check)
    #[serde(default)]
    pub authorized: bool,
    /// May act as another user
    #[serde(default)]
    pub can_impersonate: bool,
}

/// An automated service known to the identity directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceEntry {
    pub id: u32,
    pub name: String,
}

/// Storage tuning
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Superseded log entries tolerated before the log is rewritten on open
    pub compact_threshold: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    apps: Vec<String>,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    users: Vec<UserEntry>,
    #[serde(default)]
    services: Vec<ServiceEntry>,
}

/// Validated daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub apps: AppRegistry,
    pub storage: StorageConfig,
    pub users: Vec<UserEntry>,
    pub services: Vec<ServiceEntry>,
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let apps = AppRegistry::new(raw.apps)?;
        validate_users(&raw.users)?;
        validate_services(&raw.services)?;

        Ok(Self {
            apps,
            storage: raw.storage,
            users: raw.users,
            services: raw.services,
        })
    }
}

fn validate_users(users: &[UserEntry]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    let mut credentials = HashSet::new();
    for user in users {
        if user.id == 0 {
            return Err(ConfigError::Invalid(format!(
                "user {} has reserved id 0",
                user.name
            )));
        }
        if !ids.insert(user.id) {
            return Err(ConfigError::Invalid(format!(
                "user id {} listed twice",
                user.id
            )));
        }
        if !names.insert(user.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "user name {} listed twice",
                user.name
            )));
        }
        if !credentials.insert((user.subject.as_str(), user.issuer.as_str())) {
            return Err(ConfigError::Invalid(format!(
                "certificate of user {} is already assigned",
                user.name
            )));
        }
    }
    Ok(())
}

fn validate_services(services: &[ServiceEntry]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for service in services {
        if service.id == 0
            || service.id == INTERACTIVE_SERVICE_ID
            || service.name == crate::identity::INTERACTIVE_SERVICE
        {
            return Err(ConfigError::Invalid(format!(
                "service {} (id {}) collides with the reserved interactive service",
                service.name, service.id
            )));
        }
        if !ids.insert(service.id) || !names.insert(service.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "service {} (id {}) listed twice",
                service.name, service.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
