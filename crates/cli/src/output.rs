// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use al_core::{HolderData, LockResponse};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a lock response in the specified format
pub fn print_response(response: &LockResponse, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", format_text(response)),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(response) {
                println!("{}", json);
            }
        }
    }
}

/// `RESULT: message`, then one line per reported holder
pub fn format_text(response: &LockResponse) -> String {
    let mut out = format!("{}: {}\n", response.result, response.message);
    for holder in response.data.iter().flatten() {
        out.push_str(&format!("  {}\n", format_holder(holder)));
    }
    out
}

fn format_holder(holder: &HolderData) -> String {
    let mut line = format!("held by {}", holder.user);
    if let Some(service) = &holder.service {
        line.push_str(&format!(" via {}", service));
    }
    line.push_str(&format!(" since {}", holder.timestamp));
    if let Some(note) = &holder.note {
        line.push_str(&format!(" ({})", note));
    }
    line
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
