// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! check, lock, and unlock

use std::process::ExitCode;

use al_core::{Command, Credential, Fields};
use al_daemon::DaemonConfig;
use anyhow::{Context, Result};

use crate::client::DaemonClient;
use crate::output::{print_response, OutputFormat};

/// Who the request is made as
#[derive(clap::Args, Debug, Clone)]
pub struct IdentityArgs {
    /// Certificate subject to authenticate with
    #[arg(long, global = true, env = "ALOCK_SUBJECT")]
    pub subject: Option<String>,

    /// Authority that issued the certificate
    #[arg(long, global = true, env = "ALOCK_ISSUER")]
    pub issuer: Option<String>,

    /// Service acting on behalf of the user
    #[arg(long, global = true, default_value = "user")]
    pub service: String,

    /// Act as another user (requires impersonation rights)
    #[arg(long, global = true)]
    pub as_user: Option<String>,
}

impl IdentityArgs {
    pub fn credential(&self) -> Result<Credential> {
        let subject = self
            .subject
            .clone()
            .context("no subject given (use --subject or ALOCK_SUBJECT)")?;
        let issuer = self
            .issuer
            .clone()
            .context("no issuer given (use --issuer or ALOCK_ISSUER)")?;

        let mut credential = Credential::new(subject, issuer).with_service(&self.service);
        if let Some(user) = &self.as_user {
            credential = credential.with_as_user(user);
        }
        Ok(credential)
    }
}

/// Request fields for a command
pub fn fields(app: &str, note: Option<&str>) -> Fields {
    let mut fields = Fields::new();
    fields.insert("app".to_string(), app.to_string());
    if let Some(note) = note {
        fields.insert("note".to_string(), note.to_string());
    }
    fields
}

/// Send one lock command and print the response
pub async fn run(
    command: Command,
    app: &str,
    note: Option<&str>,
    identity: &IdentityArgs,
    format: OutputFormat,
) -> Result<ExitCode> {
    let credential = identity.credential()?;
    let config = DaemonConfig::from_env()?;
    let client = DaemonClient::connect(&config)?;

    let response = client
        .command(command.as_str(), fields(app, note), credential)
        .await?;
    print_response(&response, format);

    Ok(if response.is_bad_request() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
