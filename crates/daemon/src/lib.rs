// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Activity lock daemon
//!
//! Owns the lock store and answers clients on a Unix socket. The wire
//! protocol and daemon paths are shared with the `alock` CLI.

pub mod lifecycle;
pub mod protocol;
pub mod server;

pub use lifecycle::{
    startup, Daemon, DaemonConfig, DaemonContext, LifecycleError, STARTUP_MARKER_PREFIX,
};
pub use protocol::{ProtocolError, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};
pub use server::{serve, ServerContext, ServerError};
