//! `sysmap process <PID>`: print one process detail record.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::process_detail::ProcessDetailProvider;
use crate::core::telemetry::SystemTelemetry;
use crate::error::SysmapError;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let pid = *matches
        .get_one::<u32>("pid")
        .context("PID argument is required")?;

    let provider = ProcessDetailProvider::new(Arc::new(SystemTelemetry::new()));
    match provider.lookup(pid) {
        Ok(detail) => {
            println!("{}", serde_json::to_string_pretty(&detail)?);
            Ok(())
        }
        Err(SysmapError::NotFound(msg)) => {
            eprintln!("{}", format!("✗ {}", msg).red());
            std::process::exit(1);
        }
        Err(e) => Err(e).context(format!("Failed to read process {}", pid)),
    }
}
