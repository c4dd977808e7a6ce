// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake identity resolver for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{IdentityError, IdentityResolver};
use al_core::{ClientIdentity, Credential};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    identities: HashMap<String, ClientIdentity>,
    calls: Vec<Credential>,
}

/// Resolves subjects to programmed identities and records every call
#[derive(Clone, Default)]
pub struct FakeIdentityResolver {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `subject` to `identity`, whatever the issuer or service
    pub fn add(&self, subject: &str, identity: ClientIdentity) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .identities
            .insert(subject.to_string(), identity);
    }

    /// Get all resolved credentials
    pub fn calls(&self) -> Vec<Credential> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl IdentityResolver for FakeIdentityResolver {
    async fn resolve(&self, credential: &Credential) -> Result<ClientIdentity, IdentityError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(credential.clone());
        inner
            .identities
            .get(&credential.subject)
            .cloned()
            .ok_or(IdentityError::UnknownUser)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
