use anyhow::Result;
use clap::{Arg, Command};

use sysmap::commands;

fn probe_timeout_arg() -> Arg {
    Arg::new("probe-timeout-ms")
        .long("probe-timeout-ms")
        .value_name("MS")
        .help("Maximum time each topology probe may take")
        .value_parser(clap::value_parser!(u64))
}

fn value_arg(help: &'static str) -> Arg {
    Arg::new("value").help(help).required(true).index(1)
}

fn main() -> Result<()> {
    let matches = Command::new("sysmap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Serve a live graph of this host's hardware, processes and network peers")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API")
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("IP address to listen on"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("TCP port to listen on")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(probe_timeout_arg()),
        )
        .subcommand(
            Command::new("topology")
                .about("Print one topology snapshot as JSON")
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Pretty-print the JSON output")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(probe_timeout_arg()),
        )
        .subcommand(
            Command::new("process")
                .about("Print details for a single process")
                .arg(
                    Arg::new("pid")
                        .help("Process id")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage persisted settings (use 'sysmap config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show current settings"))
                .subcommand(
                    Command::new("set-bind")
                        .about("Set the listen address")
                        .arg(value_arg("IP address, e.g. 0.0.0.0")),
                )
                .subcommand(
                    Command::new("set-port")
                        .about("Set the listen port")
                        .arg(value_arg("TCP port")),
                )
                .subcommand(
                    Command::new("set-timeout")
                        .about("Set the per-probe timeout in milliseconds")
                        .arg(value_arg("Timeout in milliseconds")),
                )
                .subcommand(Command::new("reset").about("Restore default settings")),
        )
        .subcommand(Command::new("version").about("Shows version information"))
        .get_matches();

    sysmap::init_logging();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("serve", sub_matches)) => commands::serve(sub_matches),
        Some(("topology", sub_matches)) => commands::topology(sub_matches),
        Some(("process", sub_matches)) => commands::process(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        Some(("version", _)) => commands::version(),
        _ => {
            println!("Welcome to SysMap!");
            println!("Use 'sysmap serve' to start the API or 'sysmap --help' for more information.");
            Ok(())
        }
    }
}
