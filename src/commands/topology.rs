//! `sysmap topology`: print one snapshot as JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::Config;
use crate::core::telemetry::SystemTelemetry;
use crate::core::topology::TopologyAssembler;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let timeout = match matches.get_one::<u64>("probe-timeout-ms") {
        Some(ms) => {
            let mut config = config.clone();
            config.set_probe_timeout_ms(*ms)?;
            config.probe_timeout()
        }
        None => config.probe_timeout(),
    };

    let telemetry = Arc::new(SystemTelemetry::with_lock_timeout(timeout));
    let assembler = TopologyAssembler::with_timeout(telemetry, timeout);
    let snapshot = assembler.assemble();

    let json = if matches.get_flag("pretty") {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{}", json);

    if !snapshot.degraded().is_empty() {
        let degraded: Vec<String> = snapshot.degraded().iter().map(|s| s.to_string()).collect();
        log::warn!("Snapshot is partial: {}", degraded.join(", "));
    }

    Ok(())
}
