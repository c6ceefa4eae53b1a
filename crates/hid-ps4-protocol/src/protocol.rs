//! DualShock 4 protocol handler.

use crate::ids::{FEATURE_PROBE_LEN, report_ids};
use crate::input::parse_input_report;
use crate::output::{BT_OUTPUT_LEN, DEFAULT_LIGHTBAR, encode_output};
use openpad_controller::{ControllerEvent, ControllerProtocol, DriverKind};
use openpad_hid_common::DeviceWriter;
use std::time::Instant;
use tracing::{debug, warn};

/// Per-device DualShock 4 state.
#[derive(Debug, Clone)]
pub struct Ps4Protocol {
    bluetooth: bool,
    lightbar: [u8; 3],
}

impl Default for Ps4Protocol {
    fn default() -> Self {
        Self::new()
    }
}

impl Ps4Protocol {
    pub fn new() -> Self {
        Self {
            bluetooth: false,
            lightbar: DEFAULT_LIGHTBAR,
        }
    }

    /// Lightbar colour sent with every effects report.
    pub fn with_lightbar(mut self, rgb: [u8; 3]) -> Self {
        self.lightbar = rgb;
        self
    }

    pub fn is_bluetooth(&self) -> bool {
        self.bluetooth
    }

    /// Reads the serial number feature report. Over Bluetooth the read
    /// either fails or comes back empty.
    pub fn detect_bluetooth(writer: &mut dyn DeviceWriter) -> bool {
        let mut buf = [0u8; FEATURE_PROBE_LEN];
        buf[0] = report_ids::SERIAL_FEATURE;
        match writer.read_feature_report(&mut buf) {
            Ok(_) => buf[1..].iter().all(|&b| b == 0),
            Err(e) => {
                debug!("PS4: serial feature report unavailable ({}), assuming Bluetooth", e);
                true
            }
        }
    }

    fn write_effects(&self, low: u16, high: u16, writer: &mut dyn DeviceWriter) {
        let mut out = [0u8; BT_OUTPUT_LEN];
        let len = match encode_output(self.bluetooth, low, high, self.lightbar, &mut out) {
            Ok(len) => len,
            Err(e) => {
                warn!("PS4: failed to encode effects report: {}", e);
                return;
            }
        };
        if let Err(e) = writer.write_output_report(out.get(..len).unwrap_or(&out)) {
            warn!("PS4: failed to write effects report: {}", e);
        }
    }
}

impl ControllerProtocol for Ps4Protocol {
    fn kind(&self) -> DriverKind {
        DriverKind::Ps4
    }

    fn initialize(&mut self, _now: Instant, writer: &mut dyn DeviceWriter) {
        self.bluetooth = Self::detect_bluetooth(writer);
        debug!(
            "PS4: connected over {}",
            if self.bluetooth { "Bluetooth" } else { "USB" }
        );
        // sets the lightbar
        self.write_effects(0, 0, writer);
    }

    fn handle_report(
        &mut self,
        _now: Instant,
        report: &[u8],
        _writer: &mut dyn DeviceWriter,
    ) -> Option<ControllerEvent> {
        parse_input_report(report)
    }

    fn set_rumble(&mut self, _now: Instant, low: u16, high: u16, writer: &mut dyn DeviceWriter) {
        self.write_effects(low, high, writer);
    }
}
