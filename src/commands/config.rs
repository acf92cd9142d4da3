use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;

/// Configuration setting enum for DRY code
enum Setting {
    Bind,
    Port,
    Timeout,
}

impl Setting {
    fn name(&self) -> &'static str {
        match self {
            Setting::Bind => "Bind address",
            Setting::Port => "Port",
            Setting::Timeout => "Probe timeout (ms)",
        }
    }

    fn apply(&self, config: &mut Config, value: &str) -> Result<()> {
        match self {
            Setting::Bind => config.set_bind_address(value)?,
            Setting::Port => {
                let port = value
                    .parse::<u16>()
                    .with_context(|| format!("Invalid port: {}", value))?;
                config.set_port(port);
            }
            Setting::Timeout => {
                let timeout = value
                    .parse::<u64>()
                    .with_context(|| format!("Invalid timeout: {}", value))?;
                config.set_probe_timeout_ms(timeout)?;
            }
        }
        Ok(())
    }
}

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("set-bind", sub_matches)) => set(sub_matches, Setting::Bind),
        Some(("set-port", sub_matches)) => set(sub_matches, Setting::Port),
        Some(("set-timeout", sub_matches)) => set(sub_matches, Setting::Timeout),
        Some(("reset", _)) => reset(),
        _ => {
            println!("Use 'sysmap config --help' for more information.");
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = Config::load()?;
    let path = Config::get_config_path()?;

    println!("{}", "SysMap configuration:".white());
    println!("  {:<20} {}", "Bind address", config.bind_address.cyan().bold());
    println!("  {:<20} {}", "Port", config.port.to_string().cyan().bold());
    println!(
        "  {:<20} {}",
        "Probe timeout (ms)",
        config.probe_timeout_ms.to_string().cyan().bold()
    );
    println!();
    println!("{}", format!("Stored at {}", path.display()).dimmed());

    Ok(())
}

/// Shared logic for updating one setting
fn set(matches: &clap::ArgMatches, setting: Setting) -> Result<()> {
    let value = matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    let mut config = Config::load()?;
    setting.apply(&mut config, value)?;
    config.save()?;

    println!(
        "{} {}",
        format!("✓ {} set to:", setting.name()).green(),
        value
    );

    Ok(())
}

fn reset() -> Result<()> {
    let mut config = Config::load()?;
    config.reset_to_defaults();
    config.save()?;

    println!("{}", "✓ Configuration reset to defaults".green());
    Ok(())
}
