// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon management

use std::path::PathBuf;
use std::time::Duration;

use al_daemon::DaemonConfig;
use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::{daemon_stop, ClientError, DaemonClient};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon in the background
    Start {
        /// Configuration file (default: <state dir>/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Stop the daemon
    Stop,
    /// Show daemon status
    Status,
}

pub async fn daemon(args: DaemonArgs) -> Result<()> {
    let config = DaemonConfig::from_env()?;
    match args.command {
        DaemonCommand::Start { config: path } => start(&config, path).await,
        DaemonCommand::Stop => stop(&config).await,
        DaemonCommand::Status => status(&config).await,
    }
}

async fn start(config: &DaemonConfig, config_override: Option<PathBuf>) -> Result<()> {
    if let Ok(client) = DaemonClient::connect(config) {
        if client.ping().await.is_ok() {
            println!("Daemon already running");
            return Ok(());
        }
    }

    DaemonClient::start(config, config_override.as_ref()).await?;
    println!("Daemon started");
    Ok(())
}

async fn stop(config: &DaemonConfig) -> Result<()> {
    if daemon_stop(config).await? {
        println!("Daemon stopped");
    } else {
        println!("Daemon not running");
    }
    Ok(())
}

async fn status(config: &DaemonConfig) -> Result<()> {
    let client = match DaemonClient::connect(config) {
        Ok(client) => client,
        Err(ClientError::DaemonNotRunning) => {
            println!("Daemon not running");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let status = match client.status().await {
        Ok(status) => status,
        Err(ClientError::Io(_)) => {
            println!("Daemon not running");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let version = client.hello().await.unwrap_or_else(|_| "unknown".to_string());

    println!("Status: running");
    println!("Version: {}", version);
    println!("Uptime: {}", format_uptime(Duration::from_secs(status.uptime_secs)));
    println!("Records: {}", status.records);
    for (app, count) in &status.apps {
        println!("  {}: {}", app, count);
    }
    Ok(())
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
