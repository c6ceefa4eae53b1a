//! Subcommand implementations.

use crate::transport::{HidapiTransport, device_info};
use anyhow::{Context, Result};
use hidapi::HidApi;
use openpad_controller::{CValue, ControllerEvent, DriverKind};
use openpad_engine::{ControllerHub, EngineConfig, driver_kind};
use openpad_hid_common::HidTransport;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

const IDLE_SLEEP: Duration = Duration::from_millis(1);

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureReport {
    pub timestamp_us: u64,
    pub report_id: u8,
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureFile {
    pub vendor_id: String,
    pub product_id: String,
    pub driver: DriverKind,
    pub captures: Vec<CaptureReport>,
}

pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// One-line summary of an event: pressed buttons and the populated values.
pub fn format_event(event: &ControllerEvent) -> String {
    let mut line = format!(
        "#{} {} {:04X}:{:04X} buttons=0x{:016X}",
        event.id, event.driver, event.vendor_id, event.product_id, event.buttons
    );
    for (slot, label) in [
        (CValue::ThumbLx, "lx"),
        (CValue::ThumbLy, "ly"),
        (CValue::ThumbRx, "rx"),
        (CValue::ThumbRy, "ry"),
        (CValue::TriggerL, "lt"),
        (CValue::TriggerR, "rt"),
        (CValue::Dpad, "dpad"),
    ] {
        if slot.index() < usize::from(event.num_values) {
            line.push_str(&format!(" {label}={}", event.value(slot).data));
        }
    }
    line
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    config
        .with_env_overrides()
        .context("Invalid environment override")
}

pub fn list_devices(api: &HidApi, all: bool) -> Result<()> {
    let devices: Vec<_> = api
        .device_list()
        .map(device_info)
        .filter(|d| all || d.is_game_controller())
        .collect();
    if devices.is_empty() {
        println!("No HID game controllers found.");
        return Ok(());
    }
    println!(
        "{:<8} {:<8} {:<8} {:<10} {:<20} Product",
        "VID", "PID", "Driver", "Bus", "Manufacturer"
    );
    println!("{}", "-".repeat(80));
    for dev in devices {
        println!(
            "{:<8} {:<8} {:<8} {:<10} {:<20} {}",
            format!("0x{:04X}", dev.vendor_id),
            format!("0x{:04X}", dev.product_id),
            driver_kind(dev.vendor_id, dev.product_id).to_string(),
            format!("{:?}", dev.bus),
            dev.manufacturer.as_deref().unwrap_or("(unknown)"),
            dev.product_name.as_deref().unwrap_or("(unknown)"),
        );
    }
    Ok(())
}

pub fn capture_device(
    api: &HidApi,
    vid: u16,
    pid: u16,
    duration_secs: u64,
    output: Option<&Path>,
) -> Result<()> {
    let config = EngineConfig::default();
    let mut transport = HidapiTransport::open(
        api,
        vid,
        pid,
        Duration::from_millis(config.write_timeout_ms),
    )?;

    let start = Instant::now();
    let epoch_start = micros(SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default());
    let deadline = Duration::from_secs(duration_secs);
    let mut buf = vec![0u8; config.read_buffer_len];
    let mut captures = Vec::new();

    println!("Capturing from VID=0x{vid:04X} PID=0x{pid:04X} for {duration_secs}s...");

    while start.elapsed() < deadline {
        match transport.read_report(&mut buf) {
            Ok(0) => std::thread::sleep(IDLE_SLEEP),
            Ok(n) => {
                let elapsed_us = micros(start.elapsed());
                let report = buf.get(..n).unwrap_or_default();
                let report_id = report.first().copied().unwrap_or_default();
                let hex = hex_bytes(report);
                if output.is_none() {
                    println!("[+{elapsed_us:>10}µs] id=0x{report_id:02X}  {hex}");
                }
                captures.push(CaptureReport {
                    timestamp_us: epoch_start.saturating_add(elapsed_us),
                    report_id,
                    data: hex,
                });
            }
            Err(e) => {
                warn!("read error: {}", e);
                break;
            }
        }
    }

    println!("Captured {} report(s).", captures.len());

    if let Some(path) = output {
        let capture_file = CaptureFile {
            vendor_id: format!("0x{vid:04X}"),
            product_id: format!("0x{pid:04X}"),
            driver: driver_kind(vid, pid),
            captures,
        };
        let json =
            serde_json::to_string_pretty(&capture_file).context("Failed to serialize captures")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
        println!("Captures saved to '{}'.", path.display());
    }

    Ok(())
}

fn open_hub(api: &HidApi, vid: u16, pid: u16, config: EngineConfig) -> Result<(ControllerHub, u32)> {
    let transport = HidapiTransport::open(
        api,
        vid,
        pid,
        Duration::from_millis(config.write_timeout_ms),
    )?;
    let mut hub = ControllerHub::new(config);
    let id = hub.connect(Box::new(transport), Instant::now());
    if hub.driver_kind(id) == Some(DriverKind::Default) {
        info!("no vendor driver for this device; events need a descriptor-aware transport");
    }
    Ok((hub, id))
}

/// Polls the hub until `deadline` passes or the device goes away, handing
/// every event to `sink`.
fn run_until(
    hub: &mut ControllerHub,
    deadline: Instant,
    mut sink: impl FnMut(&ControllerEvent) -> Result<()>,
) -> Result<()> {
    while Instant::now() < deadline {
        let events = hub.poll(Instant::now());
        if hub.device_count() == 0 {
            println!("Device disconnected.");
            break;
        }
        if events.is_empty() {
            std::thread::sleep(IDLE_SLEEP);
        }
        for event in &events {
            sink(event)?;
        }
    }
    Ok(())
}

pub fn watch_device(
    api: &HidApi,
    vid: u16,
    pid: u16,
    duration_secs: u64,
    json: bool,
    config: EngineConfig,
) -> Result<()> {
    let (mut hub, _) = open_hub(api, vid, pid, config)?;
    let deadline = Instant::now() + Duration::from_secs(duration_secs);
    run_until(&mut hub, deadline, |event| {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{}", format_event(event));
        }
        Ok(())
    })
}

pub fn rumble_device(
    api: &HidApi,
    vid: u16,
    pid: u16,
    low: u16,
    high: u16,
    ms: u64,
    config: EngineConfig,
) -> Result<()> {
    let (mut hub, id) = open_hub(api, vid, pid, config)?;
    println!("Rumble low=0x{low:04X} high=0x{high:04X} for {ms} ms");

    hub.rumble(id, Instant::now(), low, high)?;
    run_until(&mut hub, Instant::now() + Duration::from_millis(ms), |_| Ok(()))?;

    if hub.device_ids().contains(&id) {
        hub.rumble(id, Instant::now(), 0, 0)?;
        // Debounced drivers flush the stop on the next service pass.
        run_until(&mut hub, Instant::now() + Duration::from_millis(100), |_| Ok(()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpad_controller::Value;

    #[test]
    fn test_hex_bytes() {
        assert_eq!(hex_bytes(&[0x01, 0xA0, 0xFF]), "0x01 0xA0 0xFF");
        assert_eq!(hex_bytes(&[]), "");
    }

    #[test]
    fn test_format_event_only_shows_populated_values() {
        let mut event = ControllerEvent::new(DriverKind::Ps4).with_identity(3, 0x054C, 0x09CC);
        event.buttons = 0b10;
        event.num_values = 2;
        event.set_value(CValue::ThumbLx, Value::signed(0x30, -5));
        event.set_value(CValue::ThumbLy, Value::signed(0x31, 7));
        assert_eq!(
            format_event(&event),
            "#3 ps4 054C:09CC buttons=0x0000000000000002 lx=-5 ly=7"
        );
    }

    #[test]
    fn test_capture_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let file = CaptureFile {
            vendor_id: "0x057E".to_string(),
            product_id: "0x2009".to_string(),
            driver: DriverKind::Nx,
            captures: vec![CaptureReport {
                timestamp_us: 100,
                report_id: 0x30,
                data: "0x30 0x01".to_string(),
            }],
        };
        let json = serde_json::to_string_pretty(&file)?;
        let restored: CaptureFile = serde_json::from_str(&json)?;
        assert_eq!(restored.driver, DriverKind::Nx);
        assert_eq!(restored.captures.len(), 1);
        assert_eq!(restored.captures.first().map(|c| c.report_id), Some(0x30));
        Ok(())
    }

    #[test]
    fn test_default_config_without_file() -> Result<(), Box<dyn std::error::Error>> {
        let config = load_config(None)?;
        assert_eq!(config.write_timeout_ms, EngineConfig::default().write_timeout_ms);
        Ok(())
    }
}
