// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lock requests

use crate::store::StoreError;
use thiserror::Error;

/// A request that can never succeed as sent.
///
/// Raised before any store mutation; retrying the same request gives the same
/// answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BadRequest {
    #[error("Invalid command (possible values: check, lock, unlock)")]
    InvalidCommand,
    #[error("User not authorized")]
    NotAuthorized,
    #[error("No app given")]
    NoApp,
    #[error("Unknown app")]
    UnknownApp,
    #[error("Unknown user")]
    UnknownUser,
}

/// Errors from lock manager operations
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("{0}")]
    BadRequest(#[from] BadRequest),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
