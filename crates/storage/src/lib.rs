// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! al-storage: durable lock store
//!
//! Lock table operations are appended to a checksummed write-ahead log and
//! replayed into an in-memory [`al_core::LockTable`] on open.

mod store;
mod wal;

pub use store::WalLockStore;
pub use wal::{Replay, Wal, WalEntry, WalError};
