// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of lockable applications

use super::ConfigError;
use crate::error::BadRequest;
use std::collections::BTreeSet;

/// The fixed set of application names that may be locked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRegistry {
    apps: BTreeSet<String>,
}

impl AppRegistry {
    /// Build a registry, rejecting empty lists and malformed or repeated names
    pub fn new<I, S>(apps: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for app in apps {
            let app = app.into();
            validate_name(&app)?;
            if !set.insert(app.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "application listed twice: {}",
                    app
                )));
            }
        }

        if set.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one application must be configured".to_string(),
            ));
        }

        Ok(Self { apps: set })
    }

    pub fn contains(&self, app: &str) -> bool {
        self.apps.contains(app)
    }

    /// Look up a requested application name
    pub fn resolve<'a>(&'a self, app: &str) -> Result<&'a str, BadRequest> {
        self.apps
            .get(app)
            .map(String::as_str)
            .ok_or(BadRequest::UnknownApp)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

fn validate_name(app: &str) -> Result<(), ConfigError> {
    if app.is_empty() {
        return Err(ConfigError::Invalid(
            "application name must not be empty".to_string(),
        ));
    }
    let valid = app
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(ConfigError::Invalid(format!(
            "invalid application name: {:?}",
            app
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "apps_tests.rs"]
mod tests;
