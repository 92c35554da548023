// netpreset - Main Entry Point
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # netpreset
//!
//! Apply static IPv4 gateway and DNS presets to a network adapter.
//!
//! This is the main entry point for the command line front end.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod application;
mod models;
#[cfg(target_os = "linux")]
mod network_utils;
mod platform;
mod presets;
mod storage;
mod workflow;

use application::ApplyArgs;
use models::StatusMessage;
use storage::DataStore;

/// Human-readable application name.
pub const APP_NAME: &str = "netpreset";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status for command line usage errors.
const EXIT_USAGE: u8 = 2;

/// Print version information and exit.
fn print_version() {
    println!("{} {}", APP_NAME, VERSION);
    println!("Copyright (C) 2026 Christos A. Daggas");
    println!("License: MIT");
    println!();
    println!("Apply static IPv4 gateway and DNS presets to a network adapter.");
}

/// Print help information and exit.
fn print_help() {
    println!(
        "Usage: {} [OPTIONS] <COMMAND>",
        env::args().next().unwrap_or_else(|| APP_NAME.to_string())
    );
    println!();
    println!("Apply static IPv4 gateway and DNS presets to a network adapter.");
    println!();
    println!("Commands:");
    println!("  adapters                 List active Ethernet and Wi-Fi adapters");
    println!("  presets                  List gateway and DNS presets");
    println!("  show <ADAPTER>           Show the current address of an adapter");
    println!("  apply [APPLY OPTIONS]    Apply a static configuration");
    println!();
    println!("Apply options:");
    println!("  --adapter <ADAPTER>      Adapter id or description");
    println!("  --gateway <PRESET>       Gateway preset from [Modems]");
    println!("  --dns <PRESET>           DNS preset from [DNS]");
    println!("  --ip <ADDRESS>           Static address (default: current address)");
    println!("  --mask <MASK>            Subnet mask (default: per mask_source setting)");
    println!();
    println!("Options:");
    println!("  -p, --presets <FILE>     Read presets from FILE");
    println!("  -j, --json               Print JSON output");
    println!("  -h, --help               Show this help message and exit");
    println!("  -v, --version            Show version information and exit");
    println!("  -d, --debug              Enable debug logging");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG                 Set log level (trace, debug, info, warn, error)");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Adapters,
    Presets,
    Show(String),
    Apply(ApplyArgs),
    Help,
    Version,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cli {
    command: Command,
    preset_file: Option<PathBuf>,
    json: bool,
    debug: bool,
}

fn option_value(args: &mut impl Iterator<Item = String>, option: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("Option '{}' requires a value", option))
}

/// Parse arguments, excluding the program name.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli, String> {
    let mut args = args.into_iter();
    let mut command: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut apply = ApplyArgs::default();
    let mut preset_file = None;
    let mut json = false;
    let mut debug = false;
    let mut help = false;
    let mut version = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => help = true,
            "-v" | "--version" => version = true,
            "-j" | "--json" => json = true,
            "-d" | "--debug" => debug = true,
            "-p" | "--presets" => preset_file = Some(PathBuf::from(option_value(&mut args, &arg)?)),
            "--adapter" => apply.adapter = Some(option_value(&mut args, &arg)?),
            "--gateway" => apply.gateway = Some(option_value(&mut args, &arg)?),
            "--dns" => apply.dns = Some(option_value(&mut args, &arg)?),
            "--ip" => apply.ip = Some(option_value(&mut args, &arg)?),
            "--mask" => apply.mask = Some(option_value(&mut args, &arg)?),
            _ if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
            _ if command.is_none() => command = Some(arg),
            _ => positional.push(arg),
        }
    }

    let command = match command.as_deref() {
        _ if help => Command::Help,
        _ if version => Command::Version,
        Some("adapters") => Command::Adapters,
        Some("presets") => Command::Presets,
        Some("show") => {
            let adapter = positional
                .pop()
                .ok_or_else(|| "Command 'show' requires an adapter".to_string())?;
            Command::Show(adapter)
        }
        Some("apply") => Command::Apply(apply),
        Some(other) => return Err(format!("Unknown command: {}", other)),
        None => return Err("No command given".to_string()),
    };

    if !positional.is_empty() && !matches!(command, Command::Help | Command::Version) {
        return Err(format!("Unexpected argument: {}", positional[0]));
    }

    Ok(Cli {
        command,
        preset_file,
        json,
        debug,
    })
}

/// Initialize logging to stderr; stdout carries command output.
fn init_logging(debug: bool, log_level: &str) {
    let directive = if debug { "debug" } else { log_level };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report_error(message: String, json: bool) {
    let status = StatusMessage::general(message, true);
    if json {
        match serde_json::to_string_pretty(&status) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("{}", status.text),
        }
    } else {
        eprintln!("Error: {}", status.text);
    }
}

fn run<I, P>(cli: &Cli, store: DataStore, inventory: I, platform: P) -> models::Result<bool>
where
    I: platform::AdapterInventory,
    P: platform::ConfigurationPlatform,
{
    let mut app = application::Application::new(store, inventory, platform, cli.json);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Adapters => app.adapters(&mut out),
        Command::Presets => app.presets(&mut out),
        Command::Show(adapter) => app.show(adapter, &mut out),
        Command::Apply(args) => app.apply(args, &mut out),
        Command::Help | Command::Version => Ok(true),
    }
}

#[cfg(target_os = "linux")]
fn run_native(cli: &Cli, store: DataStore) -> models::Result<bool> {
    run(cli, store, network_utils::SysfsInventory::new(), platform::native())
}

#[cfg(windows)]
fn run_native(cli: &Cli, store: DataStore) -> models::Result<bool> {
    run(cli, store, platform::native(), platform::native())
}

#[cfg(not(any(target_os = "linux", windows)))]
fn run_native(_cli: &Cli, _store: DataStore) -> models::Result<bool> {
    Err(models::Error::Unexpected(format!(
        "{} does not support this operating system",
        APP_NAME
    )))
}

fn main() -> ExitCode {
    let cli = match parse_args(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Try '--help' for more information.");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match cli.command {
        Command::Help => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            print_version();
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let mut store = DataStore::new();
    init_logging(cli.debug, &store.settings().log_level);
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::debug!("Config directory: {:?}", store.config_dir());
    store.log_settings_status();

    if let Some(path) = &cli.preset_file {
        store.set_preset_override(path.clone());
    }

    match run_native(&cli, store) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            report_error(e.to_string(), cli.json);
            ExitCode::FAILURE
        }
    }
}
