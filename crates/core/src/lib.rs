// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! al-core: advisory activity locks
//!
//! This crate provides:
//! - Lock records and the per-application FIFO queue they form
//! - The lock store contract and its in-memory table
//! - The lock manager implementing check, lock, and unlock
//! - Configuration of the allowed applications and identity directory

pub mod clock;
pub mod config;
pub mod critical;
pub mod error;
pub mod identity;
pub mod manager;
pub mod operation;
pub mod record;
pub mod request;
pub mod response;
pub mod store;
pub mod table;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{AppRegistry, Config, ConfigError};
pub use critical::{AppLocks, CriticalSection};
pub use error::{BadRequest, ManagerError};
pub use identity::{ClientIdentity, Credential, Requester, ServiceId, UserId};
pub use manager::{LockManager, TripleState};
pub use operation::Operation;
pub use record::{LockKey, LockRecord};
pub use request::{Command, Fields, LockRequest};
pub use response::{CheckOutcome, HolderData, LockOutcome, LockResponse, ResultKind, UnlockOutcome};
pub use store::{LockStore, MemoryLockStore, StoreError};
pub use table::LockTable;
