// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock store contract
//!
//! Each call is atomic on its own. Sequences of calls that must not interleave
//! (the holder check, count, and insert of a lock request) are serialized by
//! the lock manager, not by the store.

use crate::record::{LockKey, LockRecord};
use crate::table::LockTable;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistent table of lock records
pub trait LockStore: Send + Sync {
    /// Records for an application in queue order
    fn queue(&self, app: &str) -> Result<Vec<LockRecord>, StoreError>;

    /// Current holder of an application
    fn holder(&self, app: &str) -> Result<Option<LockRecord>, StoreError> {
        Ok(self.queue(app)?.into_iter().next())
    }

    /// Insert a record unless its key already exists. Returns whether it was inserted.
    fn insert(&self, record: LockRecord) -> Result<bool, StoreError>;

    /// Delete the record with this key. Returns whether a record was removed.
    fn delete(&self, key: &LockKey) -> Result<bool, StoreError>;

    /// Number of records per application
    fn counts(&self) -> Result<BTreeMap<String, usize>, StoreError>;
}

impl<S: LockStore + ?Sized> LockStore for Arc<S> {
    fn queue(&self, app: &str) -> Result<Vec<LockRecord>, StoreError> {
        (**self).queue(app)
    }

    fn holder(&self, app: &str) -> Result<Option<LockRecord>, StoreError> {
        (**self).holder(app)
    }

    fn insert(&self, record: LockRecord) -> Result<bool, StoreError> {
        (**self).insert(record)
    }

    fn delete(&self, key: &LockKey) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn counts(&self) -> Result<BTreeMap<String, usize>, StoreError> {
        (**self).counts()
    }
}

/// Non-persistent store backed by a [`LockTable`]
#[derive(Debug, Default)]
pub struct MemoryLockStore {
    table: Mutex<LockTable>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current table
    pub fn snapshot(&self) -> LockTable {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl LockStore for MemoryLockStore {
    fn queue(&self, app: &str) -> Result<Vec<LockRecord>, StoreError> {
        let table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        Ok(table.queue(app).to_vec())
    }

    fn holder(&self, app: &str) -> Result<Option<LockRecord>, StoreError> {
        let table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        Ok(table.holder(app).cloned())
    }

    fn insert(&self, record: LockRecord) -> Result<bool, StoreError> {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        Ok(match table.plan_insert(record) {
            Some(op) => table.apply(&op),
            None => false,
        })
    }

    fn delete(&self, key: &LockKey) -> Result<bool, StoreError> {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        Ok(match table.plan_delete(key) {
            Some(op) => table.apply(&op),
            None => false,
        })
    }

    fn counts(&self) -> Result<BTreeMap<String, usize>, StoreError> {
        let table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        Ok(table.counts())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
