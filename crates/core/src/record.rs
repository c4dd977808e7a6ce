// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock records
//!
//! A record says "this requester wants (or has) the application". For a given
//! application the records ordered by [`LockRecord::queue_order`] form a FIFO
//! queue whose first entry is the holder.

use crate::identity::{ClientIdentity, Requester};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Uniquely identifies a record: one per (user, service, application)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LockKey {
    pub app: String,
    pub requester: Requester,
}

impl LockKey {
    pub fn new(app: impl Into<String>, requester: Requester) -> Self {
        Self {
            app: app.into(),
            requester,
        }
    }
}

/// A queued or held lock on an application
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub app: String,
    pub requester: Requester,
    /// User name at acquisition time
    pub user_name: String,
    /// Service name at acquisition time
    pub service_name: String,
    pub timestamp: DateTime<Utc>,
    /// Insertion sequence assigned by the store; breaks timestamp ties
    #[serde(default)]
    pub sequence: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LockRecord {
    /// Build an unsequenced record for the given caller
    pub fn new(
        app: impl Into<String>,
        identity: &ClientIdentity,
        timestamp: DateTime<Utc>,
        note: Option<String>,
    ) -> Self {
        Self {
            app: app.into(),
            requester: identity.requester(),
            user_name: identity.user_name.clone(),
            service_name: identity.service_name.clone(),
            timestamp,
            sequence: 0,
            note,
        }
    }

    pub fn key(&self) -> LockKey {
        LockKey::new(self.app.clone(), self.requester)
    }

    pub fn is_owned_by(&self, requester: &Requester) -> bool {
        &self.requester == requester
    }

    /// Whether the holder acted interactively rather than through a service
    pub fn is_interactive(&self) -> bool {
        self.service_name == crate::identity::INTERACTIVE_SERVICE
    }

    /// Queue order: timestamp first, insertion sequence second
    pub fn queue_order(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then(self.sequence.cmp(&other.sequence))
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
