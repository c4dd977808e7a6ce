// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: paths, startup, shutdown.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use al_adapters::{DirectoryResolver, TracedIdentityResolver};
use al_core::{Config, ConfigError, LockManager, SystemClock};
use al_storage::{WalError, WalLockStore};
use fs2::FileExt;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::server::ServerContext;

/// Startup marker prefix written to the log before anything else.
/// The CLI uses it to find where the current startup attempt begins.
/// Full format: "--- alockd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- alockd: starting (pid: ";

/// Server context with the daemon's concrete types
pub type DaemonContext =
    ServerContext<WalLockStore, SystemClock, TracedIdentityResolver<DirectoryResolver>>;

/// Where the daemon keeps its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// State directory
    pub state_dir: PathBuf,
    /// Lock configuration (apps, users, services)
    pub config_path: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the lock store's write-ahead log
    pub wal_path: PathBuf,
}

impl DaemonConfig {
    /// Paths from the environment (`ALOCK_STATE_DIR`, `XDG_STATE_HOME`,
    /// `HOME`, `ALOCK_SOCKET_DIR`)
    pub fn from_env() -> Result<Self, LifecycleError> {
        Ok(Self::in_dirs(&state_dir()?, &socket_dir()))
    }

    /// Paths rooted at explicit directories
    pub fn in_dirs(state_dir: &Path, socket_dir: &Path) -> Self {
        let hash = path_hash(state_dir);
        Self {
            state_dir: state_dir.to_path_buf(),
            config_path: state_dir.join("config.toml"),
            socket_path: socket_dir.join(format!("{}.sock", hash)),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            wal_path: state_dir.join("wal").join("locks.wal"),
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }
}

/// Running daemon
pub struct Daemon {
    pub config: DaemonConfig,
    // Held to maintain the exclusive file lock; released on drop
    _lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    pub context: Arc<DaemonContext>,
}

impl Daemon {
    /// Shutdown the daemon gracefully
    pub fn shutdown(&self) {
        info!("Shutting down daemon...");

        for (what, path) in [
            ("socket", &self.config.socket_path),
            ("PID", &self.config.lock_path),
            ("version", &self.config.version_path),
        ] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("Failed to remove {} file: {}", what, e);
                }
            }
        }

        info!("Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("WAL error: {0}")]
    Wal(#[from] WalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &DaemonConfig) -> Result<Daemon, LifecycleError> {
    match startup_inner(config).await {
        Ok(daemon) => Ok(daemon),
        // Another daemon owns these files
        Err(e @ LifecycleError::LockFailed(_)) => Err(e),
        Err(e) => {
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

async fn startup_inner(config: &DaemonConfig) -> Result<Daemon, LifecycleError> {
    // 1. Create directories
    std::fs::create_dir_all(&config.state_dir)?;
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents races. Not truncated until locked,
    // so a failed attempt leaves the running daemon's PID intact.
    let mut lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Load configuration BEFORE binding the socket (fail fast)
    let lock_config = Config::load(&config.config_path)?;
    info!(
        apps = lock_config.apps.len(),
        users = lock_config.users.len(),
        services = lock_config.services.len(),
        "Loaded config from {}",
        config.config_path.display()
    );

    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    // 4. Load lock records from the WAL
    let store = WalLockStore::open(&config.wal_path, lock_config.storage.compact_threshold)?;
    let snapshot = store.snapshot();
    info!(
        "Loaded state: {} records across {} apps",
        snapshot.len(),
        snapshot.counts().len()
    );
    for app in snapshot.counts().keys() {
        if !lock_config.apps.contains(app) {
            warn!(app = %app, "records kept for an application no longer configured");
        }
    }

    // 5. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    let resolver = TracedIdentityResolver::new(DirectoryResolver::from_config(&lock_config));
    let manager = LockManager::new(store, SystemClock, lock_config.apps);

    info!("Daemon started with state dir {}", config.state_dir.display());

    Ok(Daemon {
        config: config.clone(),
        _lock_file: lock_file,
        listener,
        context: Arc::new(ServerContext::new(manager, resolver)),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &DaemonConfig) {
    for path in [
        &config.socket_path,
        &config.version_path,
        &config.lock_path,
    ] {
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Get the state directory for alock
fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("ALOCK_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("alock"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/alock"))
}

/// Get the socket directory for alock
///
/// Uses /tmp/alock by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with ALOCK_SOCKET_DIR for testing.
fn socket_dir() -> PathBuf {
    std::env::var("ALOCK_SOCKET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp/alock"))
}

/// Hash of a state directory, naming its socket
fn path_hash(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    // First 16 chars of hex digest
    result[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
