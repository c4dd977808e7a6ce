// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::identity::{IdentityError, IdentityResolver};
use al_core::{ClientIdentity, Credential};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any IdentityResolver
#[derive(Clone)]
pub struct TracedIdentityResolver<R> {
    inner: R,
}

impl<R> TracedIdentityResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: IdentityResolver> IdentityResolver for TracedIdentityResolver<R> {
    async fn resolve(&self, credential: &Credential) -> Result<ClientIdentity, IdentityError> {
        let span = tracing::debug_span!(
            "identity.resolve",
            subject = %credential.subject,
            service = %credential.service,
        );

        async {
            if let Some(as_user) = &credential.as_user {
                tracing::debug!(as_user = %as_user, "impersonation requested");
            }

            let start = std::time::Instant::now();
            let result = self.inner.resolve(credential).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(identity) => tracing::debug!(
                    user_id = %identity.user_id,
                    service_id = %identity.service_id,
                    authorized = identity.authorized,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "resolved"
                ),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "resolution failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
