// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity resolution adapters

mod directory;

pub use directory::DirectoryResolver;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeIdentityResolver;

use al_core::{ClientIdentity, Credential};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from identity resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No valid user/service could be derived from the credential
    #[error("Unknown user")]
    UnknownUser,
    #[error("identity directory error: {0}")]
    Directory(String),
}

/// Turns a presented credential into a caller identity
#[async_trait]
pub trait IdentityResolver: Clone + Send + Sync + 'static {
    async fn resolve(&self, credential: &Credential) -> Result<ClientIdentity, IdentityError>;
}
