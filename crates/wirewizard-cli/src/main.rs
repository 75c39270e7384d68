// Copyright (C) 2025 Joseph Sacchini
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU Affero General Public License as published by the Free
// Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, info};
use wirewizard_core::{CurrentClient, DeviceClient, SearchPaths, keys, settings};
use wirewizard_types::{ConfigRecord, StatsRecord};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    #[cfg(distribute)]
    {
        fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    #[cfg(not(distribute))]
    {
        fmt().pretty().with_env_filter(filter).with_writer(std::io::stderr).init();
    }
}

#[derive(Debug, Parser)]
#[command(name = "wirewizard")]
#[command(version = env!("GIT_VERSION"))]
#[command(about = "Inspect locally configured WireGuard interfaces")]
struct Args {
    /// Path to the settings file
    #[arg(short, long, default_value = "/etc/wirewizard/settings.toml")]
    settings: PathBuf,

    /// Print records as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List interfaces with a configuration file
    List,
    /// Show keys, addressing and the first peer of an interface
    Show { name: String },
    /// Show handshake age and transfer totals of an interface
    Stats { name: String },
    /// Generate a new key pair
    Genkey,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] settings::SettingsError),

    #[error(transparent)]
    Generate(#[from] keys::GenerateError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("interface {0} not available")]
    Unavailable(String),
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let result = run::<CurrentClient>(&args, &mut std::io::stdout().lock());
    ExitCode::from(exit_status(result, &mut std::io::stderr()))
}

fn exit_status(result: Result<(), CliError>, err: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "wirewizard: {e}");
            1
        }
    }
}

fn run<C: DeviceClient>(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let paths = settings::load(&args.settings)?.search_paths();
    debug!(dirs = ?paths.dirs(), "resolved search paths");

    match &args.command {
        Command::List => list(&paths, args.json, out),
        Command::Show { name } => {
            let record = wirewizard_core::assemble_config::<C>(&paths, name)
                .map_err(|e| unavailable(name, e))?;
            info!(interface = %name, "assembled configuration");
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
            } else {
                write!(out, "{}", render_config(name, &record))?;
            }
            Ok(())
        }
        Command::Stats { name } => {
            let record = wirewizard_core::assemble_stats::<C>(name, SystemTime::now())
                .map_err(|e| unavailable(name, e))?;
            info!(interface = %name, "assembled statistics");
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
            } else {
                write!(out, "{}", render_stats(name, &record))?;
            }
            Ok(())
        }
        Command::Genkey => {
            let pair = keys::generate()?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&pair)?)?;
            } else {
                writeln!(out, "private key: {}", pair.private_key)?;
                writeln!(out, "public key: {}", pair.public_key)?;
            }
            Ok(())
        }
    }
}

fn unavailable(name: &str, e: wirewizard_core::LookupError) -> CliError {
    debug!(interface = name, error = %e, "interface not available");
    CliError::Unavailable(name.to_string())
}

fn list(paths: &SearchPaths, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let names = wirewizard_core::discover(paths)
        .map(|list| list.into_names())
        .unwrap_or_default();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&names)?)?;
    } else {
        for name in names {
            writeln!(out, "{name}")?;
        }
    }
    Ok(())
}

fn hidden(secret: &str) -> &str {
    if secret.is_empty() { "" } else { "(hidden)" }
}

fn render_config(name: &str, record: &ConfigRecord) -> String {
    let i = &record.interface;
    let p = &record.peer;
    format!(
        "interface: {name}\n  public key: {}\n  private key: {}\n  listening port: {}\n  address: {}\n  dns: {}\n\npeer: {}\n  endpoint: {}\n  allowed ips: {}\n  persistent keepalive: {}\n  preshared key: {}\n",
        i.public_key,
        hidden(&i.private_key),
        i.listen_port,
        i.address,
        i.dns,
        p.public_key,
        p.endpoint,
        p.allowed_ips,
        p.persistent_keepalive,
        hidden(&p.preshared_key),
    )
}

fn render_stats(name: &str, record: &StatsRecord) -> String {
    format!(
        "interface: {name}\n  latest handshake: {}\n  transfer: {}\n",
        record.last_handshake, record.transfer
    )
}
