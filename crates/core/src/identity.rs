// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identities
//!
//! A [`Credential`] is what a client presents; a [`ClientIdentity`] is what an
//! identity resolver turns it into. Only the id pair ([`Requester`]) takes part
//! in lock bookkeeping; names are display data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service name used for interactive (human) access
pub const INTERACTIVE_SERVICE: &str = "user";

/// Numeric user identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

/// Numeric service identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (user, service) pair that owns lock records
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Requester {
    pub user_id: UserId,
    pub service_id: ServiceId,
}

impl Requester {
    pub fn new(user_id: u32, service_id: u32) -> Self {
        Self {
            user_id: UserId(user_id),
            service_id: ServiceId(service_id),
        }
    }
}

impl fmt::Display for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.service_id)
    }
}

/// Identity of a caller, resolved per request and never persisted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub user_id: UserId,
    pub user_name: String,
    pub service_id: ServiceId,
    pub service_name: String,
    /// Whether the caller may mutate lock state
    pub authorized: bool,
}

impl ClientIdentity {
    pub fn new(
        user_id: u32,
        user_name: impl Into<String>,
        service_id: u32,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: UserId(user_id),
            user_name: user_name.into(),
            service_id: ServiceId(service_id),
            service_name: service_name.into(),
            authorized: false,
        }
    }

    pub fn with_authorized(mut self, authorized: bool) -> Self {
        self.authorized = authorized;
        self
    }

    pub fn requester(&self) -> Requester {
        Requester {
            user_id: self.user_id,
            service_id: self.service_id,
        }
    }

    /// True when the caller acts as a person rather than an automated service
    pub fn is_interactive(&self) -> bool {
        self.service_name == INTERACTIVE_SERVICE
    }
}

/// Credential presented by a client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Certificate subject (distinguished name)
    pub subject: String,
    /// Issuing authority of the certificate
    pub issuer: String,
    /// Service acting on behalf of the user
    #[serde(default = "default_service")]
    pub service: String,
    /// User to act as, when the presenter is allowed to impersonate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_user: Option<String>,
}

fn default_service() -> String {
    INTERACTIVE_SERVICE.to_string()
}

impl Credential {
    pub fn new(subject: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            issuer: issuer.into(),
            service: default_service(),
            as_user: None,
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_as_user(mut self, user: impl Into<String>) -> Self {
        self.as_user = Some(user.into());
        self
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
