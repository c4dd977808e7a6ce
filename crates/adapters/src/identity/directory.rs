// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static identity directory loaded from configuration

use super::{IdentityError, IdentityResolver};
use al_core::config::{Config, ServiceEntry, UserEntry, INTERACTIVE_SERVICE_ID};
use al_core::identity::INTERACTIVE_SERVICE;
use al_core::{ClientIdentity, Credential};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Directory {
    by_certificate: HashMap<(String, String), UserEntry>,
    by_name: HashMap<String, UserEntry>,
    services: HashMap<String, u32>,
}

/// Resolves credentials against the users and services listed in the config
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    directory: Arc<Directory>,
}

impl DirectoryResolver {
    pub fn new(users: &[UserEntry], services: &[ServiceEntry]) -> Self {
        let mut directory = Directory::default();
        for user in users {
            directory.by_certificate.insert(
                (user.subject.clone(), user.issuer.clone()),
                user.clone(),
            );
            directory.by_name.insert(user.name.clone(), user.clone());
        }
        directory
            .services
            .insert(INTERACTIVE_SERVICE.to_string(), INTERACTIVE_SERVICE_ID);
        for service in services {
            directory.services.insert(service.name.clone(), service.id);
        }
        Self {
            directory: Arc::new(directory),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.users, &config.services)
    }

    fn lookup(&self, credential: &Credential) -> Result<ClientIdentity, IdentityError> {
        let directory = &self.directory;
        let presenter = directory
            .by_certificate
            .get(&(credential.subject.clone(), credential.issuer.clone()))
            .ok_or(IdentityError::UnknownUser)?;
        let service_id = *directory
            .services
            .get(&credential.service)
            .ok_or(IdentityError::UnknownUser)?;

        let user = match &credential.as_user {
            None => presenter,
            Some(_) if !presenter.can_impersonate => return Err(IdentityError::UnknownUser),
            Some(target) => directory
                .by_name
                .get(target)
                .ok_or(IdentityError::UnknownUser)?,
        };

        Ok(
            ClientIdentity::new(user.id, &user.name, service_id, &credential.service)
                .with_authorized(user.authorized),
        )
    }
}

#[async_trait]
impl IdentityResolver for DirectoryResolver {
    async fn resolve(&self, credential: &Credential) -> Result<ClientIdentity, IdentityError> {
        self.lookup(credential)
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
