#![deny(static_mut_refs)]

mod commands;
mod transport;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hidapi::HidApi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect HID game controllers through the OpenPad engine.
#[derive(Parser)]
#[command(name = "padctl", version)]
#[command(about = "List, capture, watch and rumble HID game controllers")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected game controllers and the driver each would use
    List {
        /// Include HID devices that are not game controllers
        #[arg(long)]
        all: bool,
    },
    /// Capture raw HID reports from a specific device
    Capture {
        /// Vendor ID (hex, e.g. 0x054C)
        #[arg(long, value_parser = parse_hex_u16)]
        vid: u16,
        /// Product ID (hex, e.g. 0x09CC)
        #[arg(long, value_parser = parse_hex_u16)]
        pid: u16,
        /// Capture duration in seconds
        #[arg(long, default_value = "5")]
        duration: u64,
        /// Save captures to a JSON file instead of printing
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print canonical controller events as the engine decodes them
    Watch {
        #[arg(long, value_parser = parse_hex_u16)]
        vid: u16,
        #[arg(long, value_parser = parse_hex_u16)]
        pid: u16,
        /// Watch duration in seconds
        #[arg(long, default_value = "10")]
        duration: u64,
        /// One JSON object per event
        #[arg(long)]
        json: bool,
        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Drive both rumble motors for a while, then stop them
    Rumble {
        #[arg(long, value_parser = parse_hex_u16)]
        vid: u16,
        #[arg(long, value_parser = parse_hex_u16)]
        pid: u16,
        /// Low-frequency motor strength (hex, 0x0000-0xFFFF)
        #[arg(long, value_parser = parse_hex_u16, default_value = "0x8000")]
        low: u16,
        /// High-frequency motor strength (hex, 0x0000-0xFFFF)
        #[arg(long, value_parser = parse_hex_u16, default_value = "0x8000")]
        high: u16,
        /// How long to rumble, in milliseconds
        #[arg(long, default_value = "1000")]
        ms: u64,
        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(s, 16).map_err(|e| format!("invalid hex value '{s}': {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("padctl={log_level},openpad={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let api = HidApi::new().context("Failed to initialize HidApi")?;

    match cli.command {
        Commands::List { all } => commands::list_devices(&api, all),
        Commands::Capture {
            vid,
            pid,
            duration,
            output,
        } => commands::capture_device(&api, vid, pid, duration, output.as_deref()),
        Commands::Watch {
            vid,
            pid,
            duration,
            json,
            config,
        } => {
            let config = commands::load_config(config.as_deref())?;
            commands::watch_device(&api, vid, pid, duration, json, config)
        }
        Commands::Rumble {
            vid,
            pid,
            low,
            high,
            ms,
            config,
        } => {
            let config = commands::load_config(config.as_deref())?;
            commands::rumble_device(&api, vid, pid, low, high, ms, config)
        }
    }
}
