// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock store backed by the write-ahead log
//!
//! The lock table is materialized in memory from the log on open. Every
//! mutation is planned against the table, appended to the log, and only then
//! applied, all under one mutex.

use crate::wal::{Wal, WalError};
use al_core::{LockKey, LockRecord, LockStore, LockTable, Operation, StoreError};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

struct Inner {
    wal: Wal,
    table: LockTable,
}

/// Durable [`LockStore`]
pub struct WalLockStore {
    inner: Mutex<Inner>,
}

impl WalLockStore {
    /// Open the store at `path`, replaying its log.
    ///
    /// The log is compacted when it holds more than `compact_threshold`
    /// superseded entries, or when replay stopped at a damaged entry.
    pub fn open(path: &Path, compact_threshold: u64) -> Result<Self, WalError> {
        let replay = Wal::replay(path)?;

        let mut table = LockTable::new();
        for op in &replay.ops {
            table.apply(op);
        }

        let superseded = replay.ops.len().saturating_sub(table.len()) as u64;
        let wal = if replay.corruption.is_some() || superseded > compact_threshold {
            tracing::info!(
                path = %path.display(),
                superseded,
                live = table.len(),
                "compacting lock log"
            );
            Wal::rewrite(path, &live_ops(&table))?
        } else {
            Wal::open_at(path, replay.last_seq)?
        };

        tracing::debug!(path = %path.display(), records = table.len(), "lock store opened");
        Ok(Self {
            inner: Mutex::new(Inner { wal, table }),
        })
    }

    /// Rewrite the log to exactly the live records
    #[cfg(test)]
    pub(crate) fn compact(&self) -> Result<(), WalError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let path = inner.wal.path().to_path_buf();
        inner.wal = Wal::rewrite(&path, &live_ops(&inner.table))?;
        Ok(())
    }

    /// Number of entries in the log
    #[cfg(test)]
    pub(crate) fn wal_sequence(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .wal
            .sequence()
    }

    /// Copy of the materialized table
    pub fn snapshot(&self) -> LockTable {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .table
            .clone()
    }

    fn commit(&self, plan: impl FnOnce(&LockTable) -> Option<Operation>) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let Some(op) = plan(&inner.table) else {
            return Ok(false);
        };
        let seq = inner.wal.append(&op).map_err(store_error)?;
        tracing::trace!(app = op.app(), seq, "logged lock operation");
        Ok(inner.table.apply(&op))
    }
}

fn live_ops(table: &LockTable) -> Vec<Operation> {
    let mut records: Vec<LockRecord> = table.records().cloned().collect();
    records.sort_by_key(|r| r.sequence);
    records
        .into_iter()
        .map(|record| Operation::LockInsert { record })
        .collect()
}

fn store_error(e: WalError) -> StoreError {
    match e {
        WalError::Io(e) => StoreError::Io(e),
        WalError::Json(e) => StoreError::Serialization(e),
        other => StoreError::Backend(other.to_string()),
    }
}

impl LockStore for WalLockStore {
    fn queue(&self, app: &str) -> Result<Vec<LockRecord>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.table.queue(app).to_vec())
    }

    fn holder(&self, app: &str) -> Result<Option<LockRecord>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.table.holder(app).cloned())
    }

    fn insert(&self, record: LockRecord) -> Result<bool, StoreError> {
        self.commit(|table| table.plan_insert(record))
    }

    fn delete(&self, key: &LockKey) -> Result<bool, StoreError> {
        self.commit(|table| table.plan_delete(key))
    }

    fn counts(&self) -> Result<BTreeMap<String, usize>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.table.counts())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
