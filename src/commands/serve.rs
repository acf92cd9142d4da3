//! `sysmap serve`: run the HTTP API.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use crate::core::config::Config;
use crate::core::telemetry::SystemTelemetry;
use crate::server::{self, AppState};

/// Apply one-off CLI overrides on top of the persisted configuration
pub fn apply_overrides(config: &mut Config, matches: &ArgMatches) -> Result<()> {
    if let Some(bind) = matches.get_one::<String>("bind") {
        config.set_bind_address(bind)?;
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.set_port(*port);
    }
    if let Some(timeout_ms) = matches.get_one::<u64>("probe-timeout-ms") {
        config.set_probe_timeout_ms(*timeout_ms)?;
    }
    Ok(())
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    apply_overrides(&mut config, matches)?;

    let addr = config.socket_addr()?;
    info!(
        "Starting SysMap on {} (probe timeout {:?})",
        addr,
        config.probe_timeout()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sysmap-http")
        .build()
        .context("Failed to start async runtime")?;

    let timeout = config.probe_timeout();
    let state = AppState::new(Arc::new(SystemTelemetry::with_lock_timeout(timeout)), timeout);
    runtime.block_on(server::serve(state, addr))
}
