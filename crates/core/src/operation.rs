// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock table operations
//!
//! Every change to the lock table is expressed as an operation. Persistent
//! stores log operations before applying them, so replaying the log rebuilds
//! the table.

use crate::record::{LockKey, LockRecord};
use serde::{Deserialize, Serialize};

/// All state-changing operations on the lock table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Add a record (ignored when the key already exists)
    LockInsert { record: LockRecord },
    /// Remove the record with this key (ignored when absent)
    LockDelete { key: LockKey },
}

impl Operation {
    /// Application affected by this operation
    pub fn app(&self) -> &str {
        match self {
            Operation::LockInsert { record } => &record.app,
            Operation::LockDelete { key } => &key.app,
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
