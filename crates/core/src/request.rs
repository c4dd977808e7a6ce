// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock commands and request sanitization

use crate::error::BadRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Free-form request fields as sent by a client
pub type Fields = BTreeMap<String, String>;

/// The three lock commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Check,
    Lock,
    Unlock,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Check => "check",
            Command::Lock => "lock",
            Command::Unlock => "unlock",
        }
    }

    /// Whether the command changes lock state (and therefore needs authorization)
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Command::Check)
    }

    fn accepted_fields(&self) -> &'static [&'static str] {
        match self {
            Command::Lock => &["app", "note"],
            Command::Check | Command::Unlock => &["app"],
        }
    }
}

impl FromStr for Command {
    type Err = BadRequest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check" => Ok(Command::Check),
            "lock" => Ok(Command::Lock),
            "unlock" => Ok(Command::Unlock),
            _ => Err(BadRequest::InvalidCommand),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command with its sanitized fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    pub command: Command,
    /// Requested application (not yet checked against the registry)
    pub app: String,
    /// Only ever set for [`Command::Lock`]
    pub note: Option<String>,
}

impl LockRequest {
    /// Drop every field the command does not accept, then require `app`
    pub fn sanitize(command: Command, mut fields: Fields) -> Result<Self, BadRequest> {
        let accepted = command.accepted_fields();
        fields.retain(|key, _| accepted.contains(&key.as_str()));

        let app = fields.remove("app").ok_or(BadRequest::NoApp)?;
        let note = fields.remove("note");

        Ok(Self { command, app, note })
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
