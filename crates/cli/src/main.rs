// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! alock - activity lock CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod output;

use std::process::ExitCode;

use al_core::Command;
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{daemon, lock};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "alock",
    version,
    about = "Advisory activity locks for shared applications"
)]
struct Cli {
    #[command(flatten)]
    identity: lock::IdentityArgs,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show who holds the lock on an application
    Check {
        /// Application name
        app: String,
    },
    /// Take the lock, or join the queue behind its holder
    Lock {
        /// Application name
        app: String,
        /// Free-form note shown to others
        #[arg(long)]
        note: Option<String>,
    },
    /// Give up the lock or leave the queue
    Unlock {
        /// Application name
        app: String,
    },
    /// Daemon management
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { app } => {
            lock::run(Command::Check, &app, None, &cli.identity, cli.output).await
        }
        Commands::Lock { app, note } => {
            lock::run(
                Command::Lock,
                &app,
                note.as_deref(),
                &cli.identity,
                cli.output,
            )
            .await
        }
        Commands::Unlock { app } => {
            lock::run(Command::Unlock, &app, None, &cli.identity, cli.output).await
        }
        Commands::Daemon(args) => {
            daemon::daemon(args).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
