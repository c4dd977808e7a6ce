// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command outcomes and the response shape returned to clients

use crate::error::BadRequest;
use crate::record::LockRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of holder timestamps in `check` responses
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of `check`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Unlocked,
    Locked(LockRecord),
}

/// Result of `lock`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// Caller became the holder
    Locked,
    /// Caller already held position 0
    AlreadyLocked,
    /// Caller is queued behind `others` records
    Waiting { others: usize },
}

/// Result of `unlock`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    AlreadyUnlocked,
}

/// Response result discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultKind {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WAIT")]
    Wait,
    #[serde(rename = "BadRequest")]
    BadRequest,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultKind::Ok => "OK",
            ResultKind::Wait => "WAIT",
            ResultKind::BadRequest => "BadRequest",
        })
    }
}

/// Holder details reported by `check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderData {
    pub user: String,
    /// Absent when the holder acted interactively
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&LockRecord> for HolderData {
    fn from(record: &LockRecord) -> Self {
        Self {
            user: record.user_name.clone(),
            service: (!record.is_interactive()).then(|| record.service_name.clone()),
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            note: record.note.clone(),
        }
    }
}

/// `{code, result, message, data?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockResponse {
    pub code: u16,
    pub result: ResultKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<HolderData>>,
}

impl LockResponse {
    fn new(code: u16, result: ResultKind, message: impl Into<String>) -> Self {
        Self {
            code,
            result,
            message: message.into(),
            data: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(200, ResultKind::Ok, message)
    }

    pub fn wait(message: impl Into<String>) -> Self {
        Self::new(200, ResultKind::Wait, message)
    }

    pub fn bad_request(error: BadRequest) -> Self {
        Self::new(400, ResultKind::BadRequest, error.to_string())
    }

    pub fn with_data(mut self, data: Vec<HolderData>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_bad_request(&self) -> bool {
        self.result == ResultKind::BadRequest
    }
}

impl From<CheckOutcome> for LockResponse {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Unlocked => LockResponse::ok("Not locked"),
            CheckOutcome::Locked(record) => {
                LockResponse::ok("Locked").with_data(vec![HolderData::from(&record)])
            }
        }
    }
}

impl From<LockOutcome> for LockResponse {
    fn from(outcome: LockOutcome) -> Self {
        match outcome {
            LockOutcome::Locked => LockResponse::ok("Locked"),
            LockOutcome::AlreadyLocked => LockResponse::ok("Application already locked"),
            LockOutcome::Waiting { others } => {
                LockResponse::wait(format!("Locked by {} other users", others))
            }
        }
    }
}

impl From<UnlockOutcome> for LockResponse {
    fn from(outcome: UnlockOutcome) -> Self {
        match outcome {
            UnlockOutcome::Unlocked => LockResponse::ok("Unlocked"),
            UnlockOutcome::AlreadyUnlocked => LockResponse::ok("Application already unlocked"),
        }
    }
}

impl From<BadRequest> for LockResponse {
    fn from(error: BadRequest) -> Self {
        LockResponse::bad_request(error)
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
