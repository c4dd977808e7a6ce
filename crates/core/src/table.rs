// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory lock table
//!
//! The table is the materialized record set: per application, a vector kept
//! in queue order. Mutations happen in two steps so that persistent stores can
//! log an operation before applying it:
//!
//! ```text
//! plan_insert / plan_delete → Operation → (log) → apply
//! ```
//!
//! The holder is never stored separately; it is whatever sorts first.

use crate::operation::Operation;
use crate::record::{LockKey, LockRecord};
use std::collections::BTreeMap;

/// Materialized lock records, grouped by application
#[derive(Debug, Clone, Default)]
pub struct LockTable {
    queues: BTreeMap<String, Vec<LockRecord>>,
    next_sequence: u64,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for an application in queue order
    pub fn queue(&self, app: &str) -> &[LockRecord] {
        self.queues.get(app).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The record currently holding the application, if any
    pub fn holder(&self, app: &str) -> Option<&LockRecord> {
        self.queue(app).first()
    }

    /// Queue position of a key (0 = holder)
    pub fn position(&self, key: &LockKey) -> Option<usize> {
        self.queue(&key.app)
            .iter()
            .position(|r| r.is_owned_by(&key.requester))
    }

    pub fn contains(&self, key: &LockKey) -> bool {
        self.position(key).is_some()
    }

    /// Total number of records across all applications
    pub fn len(&self) -> usize {
        self.queues.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Number of records per application (applications without records are absent)
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.queues
            .iter()
            .map(|(app, queue)| (app.clone(), queue.len()))
            .collect()
    }

    /// All records, grouped by application and in queue order within each
    pub fn records(&self) -> impl Iterator<Item = &LockRecord> {
        self.queues.values().flatten()
    }

    /// Sequence number the next insert will receive
    #[cfg(test)]
    pub(crate) fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Plan the insertion of a record.
    ///
    /// Returns `None` when the key already has a record. Otherwise the returned
    /// operation carries the record with its sequence assigned and its
    /// timestamp raised, if needed, so it never sorts ahead of existing records.
    pub fn plan_insert(&self, mut record: LockRecord) -> Option<Operation> {
        if self.contains(&record.key()) {
            return None;
        }

        if let Some(last) = self.queue(&record.app).last() {
            if record.timestamp < last.timestamp {
                record.timestamp = last.timestamp;
            }
        }
        record.sequence = self.next_sequence;

        Some(Operation::LockInsert { record })
    }

    /// Plan the deletion of a key. Returns `None` when there is nothing to delete.
    pub fn plan_delete(&self, key: &LockKey) -> Option<Operation> {
        if self.contains(key) {
            Some(Operation::LockDelete { key: key.clone() })
        } else {
            None
        }
    }

    /// Apply an operation. Returns whether the table changed.
    pub fn apply(&mut self, op: &Operation) -> bool {
        match op {
            Operation::LockInsert { record } => {
                if self.contains(&record.key()) {
                    return false;
                }
                self.next_sequence = self.next_sequence.max(record.sequence.saturating_add(1));

                let queue = self.queues.entry(record.app.clone()).or_default();
                let at = queue.partition_point(|r| r.queue_order(record).is_le());
                queue.insert(at, record.clone());
                true
            }

            Operation::LockDelete { key } => {
                let Some(queue) = self.queues.get_mut(&key.app) else {
                    return false;
                };
                let Some(at) = queue.iter().position(|r| r.is_owned_by(&key.requester)) else {
                    return false;
                };
                queue.remove(at);
                if queue.is_empty() {
                    self.queues.remove(&key.app);
                }
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
