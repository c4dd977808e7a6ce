// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-application critical sections
//!
//! Lock requests for one application are serialized; requests for different
//! applications never wait on each other. Sections are created on first use
//! and kept for the life of the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async mutexes, one per application
#[derive(Debug, Default)]
pub struct AppLocks {
    sections: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl AppLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn section(&self, app: &str) -> Arc<AsyncMutex<()>> {
        let mut sections = self.sections.lock().unwrap_or_else(|e| e.into_inner());
        sections
            .entry(app.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Wait for exclusive access to `app`. Released when the guard drops.
    pub async fn enter(&self, app: &str) -> CriticalSection {
        let guard = self.section(app).lock_owned().await;
        tracing::trace!(app, "entered critical section");
        CriticalSection {
            app: app.to_string(),
            _guard: guard,
        }
    }

    /// Whether some task is currently inside the section for `app`
    pub fn is_held(&self, app: &str) -> bool {
        let sections = self.sections.lock().unwrap_or_else(|e| e.into_inner());
        sections
            .get(app)
            .is_some_and(|section| section.try_lock().is_err())
    }
}

/// Exclusive access to one application
#[derive(Debug)]
pub struct CriticalSection {
    app: String,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for CriticalSection {
    fn drop(&mut self) {
        tracing::trace!(app = %self.app, "left critical section");
    }
}

#[cfg(test)]
#[path = "critical_tests.rs"]
mod tests;
