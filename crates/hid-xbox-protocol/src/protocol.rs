//! Xbox protocol handlers.
//!
//! Bluetooth rumble writes are rate limited. A changed request is written
//! once [`RUMBLE_DEBOUNCE`] has passed since the previous write; while any
//! motor is running the request is repeated every [`RUMBLE_KEEPALIVE`] so
//! the controller's own timeout never stops it.

use crate::input::{XboxFirmware, XboxInputState, parse_input_report};
use crate::output::build_rumble_report;
use crate::wired::parse_wired_report;
use openpad_controller::{ControllerEvent, ControllerProtocol, DriverKind};
use openpad_hid_common::DeviceWriter;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

pub const RUMBLE_DEBOUNCE: Duration = Duration::from_millis(50);
pub const RUMBLE_KEEPALIVE: Duration = Duration::from_millis(2000);

/// Per-device Xbox Bluetooth state.
#[derive(Debug, Clone, Default)]
pub struct XboxProtocol {
    input: XboxInputState,
    low: u16,
    high: u16,
    dirty: bool,
    last_write: Option<Instant>,
}

impl XboxProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn firmware(&self) -> XboxFirmware {
        self.input.firmware
    }

    /// Rumble values most recently requested.
    pub fn requested_rumble(&self) -> (u16, u16) {
        (self.low, self.high)
    }

    fn rumble_due(&self, now: Instant) -> bool {
        let Some(last) = self.last_write else {
            return self.dirty;
        };
        let elapsed = now.saturating_duration_since(last);
        (self.dirty && elapsed >= RUMBLE_DEBOUNCE)
            || ((self.low > 0 || self.high > 0) && elapsed >= RUMBLE_KEEPALIVE)
    }

    fn flush_rumble(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        if !self.rumble_due(now) {
            return;
        }
        let report = build_rumble_report(self.low, self.high);
        self.last_write = Some(now);
        match writer.write_output_report(&report) {
            Ok(_) => {
                trace!("Xbox: rumble low=0x{:04X} high=0x{:04X}", self.low, self.high);
                self.dirty = false;
            }
            Err(e) => warn!("Xbox: failed to write rumble report: {}", e),
        }
    }
}

impl ControllerProtocol for XboxProtocol {
    fn kind(&self) -> DriverKind {
        DriverKind::Xbox
    }

    fn initialize(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        self.low = 0;
        self.high = 0;
        self.dirty = true;
        self.flush_rumble(now, writer);
    }

    fn handle_report(
        &mut self,
        now: Instant,
        report: &[u8],
        writer: &mut dyn DeviceWriter,
    ) -> Option<ControllerEvent> {
        let before = self.input.firmware;
        let event = parse_input_report(report, &mut self.input);
        if before != self.input.firmware {
            debug!("Xbox: firmware {:?} detected", self.input.firmware);
        }
        self.flush_rumble(now, writer);
        event
    }

    fn set_rumble(&mut self, now: Instant, low: u16, high: u16, writer: &mut dyn DeviceWriter) {
        if (low, high) != (self.low, self.high) {
            self.low = low;
            self.high = high;
            self.dirty = true;
        }
        self.flush_rumble(now, writer);
    }

    fn service(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        self.flush_rumble(now, writer);
    }
}

/// Wired Xbox 360 style controllers. Decoding is stateless and the driver
/// has no output path.
#[derive(Debug, Clone, Copy, Default)]
pub struct XboxWiredProtocol;

impl ControllerProtocol for XboxWiredProtocol {
    fn kind(&self) -> DriverKind {
        DriverKind::XboxW
    }

    fn initialize(&mut self, _now: Instant, _writer: &mut dyn DeviceWriter) {}

    fn handle_report(
        &mut self,
        _now: Instant,
        report: &[u8],
        _writer: &mut dyn DeviceWriter,
    ) -> Option<ControllerEvent> {
        parse_wired_report(report)
    }

    fn set_rumble(&mut self, _now: Instant, _low: u16, _high: u16, _writer: &mut dyn DeviceWriter) {
        trace!("XboxW: rumble not supported");
    }
}
