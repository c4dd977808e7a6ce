// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage
//!
//! One JSON entry per line. Each entry carries a CRC32 of its serialized
//! operation; replay stops at the first entry that fails to parse or verify,
//! which is how a write torn by a crash shows up.

use al_core::Operation;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted entry at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
    #[error("checksum mismatch at line {line}")]
    ChecksumMismatch { line: u64 },
    #[error("log is unusable: a failed append could not be rolled back")]
    Poisoned,
}

/// A single line of the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub op: Operation,
    /// CRC32 of the serialized operation
    pub checksum: u32,
}

impl WalEntry {
    pub fn new(seq: u64, op: Operation) -> Result<Self, WalError> {
        let checksum = checksum(&op)?;
        Ok(Self { seq, op, checksum })
    }

    pub fn verify(&self) -> bool {
        checksum(&self.op).is_ok_and(|sum| sum == self.checksum)
    }

    pub fn to_line(&self) -> Result<String, WalError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self, WalError> {
        Ok(serde_json::from_str(line)?)
    }
}

fn checksum(op: &Operation) -> Result<u32, WalError> {
    let json = serde_json::to_string(op)?;
    Ok(crc32fast::hash(json.as_bytes()))
}

/// Result of reading a log from disk
#[derive(Debug, Default)]
pub struct Replay {
    /// Operations of every valid entry, in log order
    pub ops: Vec<Operation>,
    /// Sequence number of the last valid entry
    pub last_seq: u64,
    /// First invalid entry, if replay stopped early
    pub corruption: Option<WalError>,
}

/// Write-ahead log for durable operation storage
pub struct Wal {
    file: File,
    path: PathBuf,
    sequence: u64,
    /// File length covering exactly the committed entries
    committed_len: u64,
    poisoned: bool,
}

impl Wal {
    /// Open or create a WAL, continuing the sequence of its last valid entry
    #[cfg(test)]
    pub(crate) fn open(path: &Path) -> Result<Self, WalError> {
        let replay = Self::replay(path)?;
        Self::open_at(path, replay.last_seq)
    }

    pub(crate) fn open_at(path: &Path, sequence: u64) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;
        terminate_last_line(&mut file)?;
        let committed_len = file.metadata()?.len();
        Ok(Self {
            file,
            path: path.to_path_buf(),
            sequence,
            committed_len,
            poisoned: false,
        })
    }

    /// Append an operation and fsync before returning.
    ///
    /// Bytes past the last committed entry are cut off first, and a failed
    /// write or fsync is truncated away, so an error never leaves part of an
    /// entry in the log. If that truncation fails too, the log refuses all
    /// further appends.
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        if self.poisoned {
            return Err(WalError::Poisoned);
        }
        let entry = WalEntry::new(self.sequence + 1, op.clone())?;
        let mut line = entry.to_line()?;
        line.push('\n');

        let len = self.file.metadata()?.len();
        if len > self.committed_len {
            tracing::warn!(
                path = %self.path.display(),
                stray_bytes = len - self.committed_len,
                "discarding partial WAL entry"
            );
            self.truncate_to_committed()?;
        }

        let written = self
            .file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.sync_all());
        if let Err(e) = written {
            tracing::error!(path = %self.path.display(), error = %e, "WAL append failed");
            self.truncate_to_committed()?;
            return Err(e.into());
        }

        self.committed_len += line.len() as u64;
        self.sequence = entry.seq;
        Ok(self.sequence)
    }

    fn truncate_to_committed(&mut self) -> Result<(), WalError> {
        let truncated = self
            .file
            .set_len(self.committed_len)
            .and_then(|()| self.file.sync_all());
        if let Err(e) = truncated {
            tracing::error!(path = %self.path.display(), error = %e, "WAL rollback failed");
            self.poisoned = true;
            return Err(WalError::Poisoned);
        }
        Ok(())
    }

    /// Sequence number of the last appended entry
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all valid entries from the log
    pub fn replay(path: &Path) -> Result<Replay, WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Replay::default()),
            Err(e) => return Err(e.into()),
        };

        let mut replay = Replay::default();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_number = index as u64 + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    replay.corruption = Some(WalError::Corrupted {
                        line: line_number,
                        reason: e.to_string(),
                    });
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let entry = match WalEntry::from_line(trimmed) {
                Ok(entry) => entry,
                Err(e) => {
                    replay.corruption = Some(WalError::Corrupted {
                        line: line_number,
                        reason: e.to_string(),
                    });
                    break;
                }
            };
            if !entry.verify() {
                replay.corruption = Some(WalError::ChecksumMismatch { line: line_number });
                break;
            }

            replay.last_seq = entry.seq;
            replay.ops.push(entry.op);
        }

        if let Some(corruption) = &replay.corruption {
            tracing::warn!(
                path = %path.display(),
                valid_entries = replay.ops.len(),
                %corruption,
                "ignoring WAL tail"
            );
        }
        Ok(replay)
    }

    /// Replace the log with exactly `ops`, renumbered from 1.
    ///
    /// The new log is written beside the old one and renamed over it, so a
    /// crash leaves either the old or the new log intact.
    pub fn rewrite(path: &Path, ops: &[Operation]) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("wal.tmp");
        {
            let mut file = File::create(&tmp)?;
            for (index, op) in ops.iter().enumerate() {
                let entry = WalEntry::new(index as u64 + 1, op.clone())?;
                writeln!(file, "{}", entry.to_line()?)?;
            }
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Self::open_at(path, ops.len() as u64)
    }
}

/// Make sure the next entry starts on its own line
fn terminate_last_line(file: &mut File) -> io::Result<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.write_all(b"\n")?;
        file.sync_all()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
