//! Switch protocol handler: link detection, setup sequence, calibration and
//! rumble refresh.
//!
//! The controller acknowledges most writes with a report. When no
//! acknowledgement arrives within [`WRITE_TIMEOUT`] the driver treats the
//! device as ready again and retries whatever step has not completed yet.

use crate::calibration::StickCalibration;
use crate::ids::{
    DEFAULT_PLAYER_LIGHTS, HOME_LIGHT_PATTERN, OUTPUT_REPORT_LEN, USB_WRITE_LEN, report_modes,
    subcommands, usb_commands,
};
use crate::input::{NxReport, classify_report, parse_full_state, parse_simple_state};
use crate::output::{build_usb_command, encode_subcommand, factory_calibration_request, rumble_pattern};
use openpad_controller::{ControllerEvent, ControllerProtocol, DriverKind};
use openpad_hid_common::DeviceWriter;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A write with no acknowledgement after this long counts as done.
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// Vibration is re-enabled this often while a motor is on.
pub const RUMBLE_REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// How the controller is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NxLink {
    /// Waiting for a reply to the USB handshake.
    #[default]
    Unknown,
    Usb,
    Bluetooth,
}

/// Setup steps in the order they are sent. The first three only apply to
/// USB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStep {
    DetectLink,
    BaudRate,
    UsbHandshake,
    ForceUsb,
    Calibration,
    Vibration,
    ReportMode,
    HomeLight,
    PlayerLights,
    Done,
}

impl SetupStep {
    fn next(self) -> Self {
        match self {
            SetupStep::DetectLink => SetupStep::BaudRate,
            SetupStep::BaudRate => SetupStep::UsbHandshake,
            SetupStep::UsbHandshake => SetupStep::ForceUsb,
            SetupStep::ForceUsb => SetupStep::Calibration,
            SetupStep::Calibration => SetupStep::Vibration,
            SetupStep::Vibration => SetupStep::ReportMode,
            SetupStep::ReportMode => SetupStep::HomeLight,
            SetupStep::HomeLight => SetupStep::PlayerLights,
            SetupStep::PlayerLights | SetupStep::Done => SetupStep::Done,
        }
    }
}

/// Upper bound on writes issued by a single setup pass.
const MAX_SETUP_WRITES: usize = 9;

/// Per-device Switch driver state.
#[derive(Debug, Clone)]
pub struct NxProtocol {
    link: NxLink,
    step: SetupStep,
    write_ready: bool,
    calibrated: bool,
    factory: StickCalibration,
    simple: StickCalibration,
    rumble: [[u8; 4]; 2],
    rumble_on: bool,
    rumble_dirty: bool,
    packet_counter: u8,
    player_lights: u8,
    last_write: Option<Instant>,
    last_rumble: Option<Instant>,
}

impl Default for NxProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl NxProtocol {
    pub fn new() -> Self {
        Self {
            link: NxLink::Unknown,
            step: SetupStep::DetectLink,
            write_ready: false,
            calibrated: false,
            factory: StickCalibration::default(),
            simple: StickCalibration::simple_default(),
            rumble: [rumble_pattern(false); 2],
            rumble_on: false,
            rumble_dirty: false,
            packet_counter: 0,
            player_lights: DEFAULT_PLAYER_LIGHTS,
            last_write: None,
            last_rumble: None,
        }
    }

    /// Player LED bitmask sent during setup (bit 0 = LED 1).
    pub fn with_player_lights(mut self, mask: u8) -> Self {
        self.player_lights = mask & 0x0F;
        self
    }

    pub fn link(&self) -> NxLink {
        self.link
    }

    pub fn setup_step(&self) -> SetupStep {
        self.step
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn factory_calibration(&self) -> &StickCalibration {
        &self.factory
    }

    pub fn rumble_patterns(&self) -> &[[u8; 4]; 2] {
        &self.rumble
    }

    fn next_counter(&mut self) -> u8 {
        let v = self.packet_counter;
        self.packet_counter = (self.packet_counter + 1) & 0x0F;
        v
    }

    fn write(
        &mut self,
        now: Instant,
        bytes: &[u8],
        what: &str,
        writer: &mut dyn DeviceWriter,
    ) -> bool {
        self.last_write = Some(now);
        self.write_ready = false;
        match writer.write_output_report(bytes) {
            Ok(_) => {
                debug!("Switch: sent {} ({} bytes)", what, bytes.len());
                true
            }
            Err(e) => {
                warn!("Switch: failed to send {}: {}", what, e);
                false
            }
        }
    }

    fn write_usb_command(&mut self, now: Instant, command: u8, writer: &mut dyn DeviceWriter) -> bool {
        let report = build_usb_command(command);
        let bytes = report.get(..USB_WRITE_LEN).unwrap_or(&report);
        self.write(now, bytes, "USB command", writer)
    }

    fn write_subcommand(
        &mut self,
        now: Instant,
        subcommand: u8,
        payload: &[u8],
        writer: &mut dyn DeviceWriter,
    ) -> bool {
        let counter = self.next_counter();
        let mut out = [0u8; OUTPUT_REPORT_LEN];
        let len = encode_subcommand(
            counter,
            &self.rumble,
            subcommand,
            payload,
            self.link == NxLink::Bluetooth,
            &mut out,
        );
        let bytes = out.get(..len).unwrap_or(&out);
        self.write(now, bytes, "subcommand", writer)
    }

    fn send_step(&mut self, now: Instant, writer: &mut dyn DeviceWriter) -> bool {
        match self.step {
            SetupStep::DetectLink | SetupStep::Done => false,
            SetupStep::BaudRate => self.write_usb_command(now, usb_commands::BAUD_3M, writer),
            SetupStep::UsbHandshake => {
                self.write_usb_command(now, usb_commands::HANDSHAKE, writer)
            }
            SetupStep::ForceUsb => {
                let sent = self.write_usb_command(now, usb_commands::FORCE_USB, writer);
                // the controller never answers this one
                self.write_ready = sent;
                sent
            }
            SetupStep::Calibration => self.write_subcommand(
                now,
                subcommands::SPI_FLASH_READ,
                &factory_calibration_request(),
                writer,
            ),
            SetupStep::Vibration => {
                self.write_subcommand(now, subcommands::ENABLE_VIBRATION, &[1], writer)
            }
            SetupStep::ReportMode => {
                let mode = if self.link == NxLink::Bluetooth {
                    report_modes::SIMPLE
                } else {
                    report_modes::FULL
                };
                self.write_subcommand(now, subcommands::SET_REPORT_MODE, &[mode], writer)
            }
            SetupStep::HomeLight => {
                self.write_subcommand(now, subcommands::SET_HOME_LIGHT, &HOME_LIGHT_PATTERN, writer)
            }
            SetupStep::PlayerLights => {
                let lights = self.player_lights;
                self.write_subcommand(now, subcommands::SET_PLAYER_LIGHTS, &[lights], writer)
            }
        }
    }

    fn advance_setup(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        for _ in 0..MAX_SETUP_WRITES {
            if !self.write_ready || matches!(self.step, SetupStep::DetectLink | SetupStep::Done) {
                break;
            }
            if !self.send_step(now, writer) {
                break;
            }
            debug!("Switch: setup step {:?} sent", self.step);
            self.step = self.step.next();
            if self.step == SetupStep::Done {
                info!("Switch: setup complete over {:?}", self.link);
            }
        }
    }

    fn refresh_rumble(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        if !self.write_ready {
            return;
        }
        let stale = self
            .last_rumble
            .is_none_or(|t| now.saturating_duration_since(t) > RUMBLE_REFRESH_INTERVAL);
        if !(self.rumble_dirty || (self.rumble_on && stale)) {
            return;
        }
        if self.write_subcommand(now, subcommands::ENABLE_VIBRATION, &[1], writer) {
            self.last_rumble = Some(now);
            self.rumble_dirty = false;
        }
    }

    /// Runs the state machine once.
    pub fn step(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        let timed_out = self
            .last_write
            .is_none_or(|t| now.saturating_duration_since(t) > WRITE_TIMEOUT);

        if self.link == NxLink::Unknown && timed_out {
            info!("Switch: no USB handshake reply, assuming Bluetooth");
            self.link = NxLink::Bluetooth;
            self.step = SetupStep::Calibration;
        }
        if timed_out {
            self.write_ready = true;
        }
        if self.link == NxLink::Unknown {
            return;
        }

        self.advance_setup(now, writer);
        self.refresh_rumble(now, writer);
    }

    fn on_report(&mut self, report: &[u8]) -> Option<ControllerEvent> {
        match classify_report(report)? {
            NxReport::FullState if self.calibrated => parse_full_state(report, &mut self.factory),
            NxReport::SimpleState if self.calibrated => {
                parse_simple_state(report, &mut self.simple)
            }
            NxReport::FullState | NxReport::SimpleState => None,
            NxReport::UsbAck => {
                self.write_ready = true;
                if self.link == NxLink::Unknown {
                    debug!("Switch: USB handshake acknowledged");
                    self.link = NxLink::Usb;
                    self.step = SetupStep::BaudRate;
                }
                None
            }
            NxReport::SubcommandReply {
                subcommand,
                calibration,
            } => {
                self.write_ready = true;
                if let Some(cal) = calibration {
                    debug!(
                        "Switch: factory calibration centres L({}, {}) R({}, {})",
                        cal.lx.center, cal.ly.center, cal.rx.center, cal.ry.center
                    );
                    self.factory = cal;
                    self.calibrated = true;
                } else {
                    debug!("Switch: subcommand 0x{:02X} acknowledged", subcommand);
                }
                None
            }
        }
    }
}

impl ControllerProtocol for NxProtocol {
    fn kind(&self) -> DriverKind {
        DriverKind::Nx
    }

    fn initialize(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        self.rumble = [rumble_pattern(false); 2];
        self.simple = StickCalibration::simple_default();
        if !self.write_usb_command(now, usb_commands::HANDSHAKE, writer) {
            debug!(
                "Switch: USB handshake not accepted, link detection falls back to the {:?} timeout",
                WRITE_TIMEOUT
            );
        }
    }

    fn handle_report(
        &mut self,
        now: Instant,
        report: &[u8],
        writer: &mut dyn DeviceWriter,
    ) -> Option<ControllerEvent> {
        let event = self.on_report(report);
        self.step(now, writer);
        event
    }

    /// Switch motors are on/off only; any non-zero intensity turns a motor on.
    fn set_rumble(&mut self, now: Instant, low: u16, high: u16, writer: &mut dyn DeviceWriter) {
        self.rumble = [rumble_pattern(low > 0), rumble_pattern(high > 0)];
        self.rumble_on = low > 0 || high > 0;
        self.rumble_dirty = true;
        self.step(now, writer);
    }

    fn service(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        self.step(now, writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpad_hid_common::mock::MockHidDevice;
    use tracing_test::traced_test;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    #[traced_test]
    fn test_rejected_handshake_is_logged_and_detection_continues() {
        let mut dev = MockHidDevice::new(0x057E, 0x2009, "mock://switch-pro");
        let mut nx = NxProtocol::new();
        let t0 = Instant::now();

        dev.set_fail_writes(true);
        nx.initialize(t0, &mut dev);
        assert!(logs_contain("failed to send USB command"));
        assert!(logs_contain("USB handshake not accepted"));
        assert!(dev.get_write_history().is_empty());
        assert_eq!(nx.link(), NxLink::Unknown);

        dev.set_fail_writes(false);
        nx.service(t0 + ms(600), &mut dev);
        assert_eq!(nx.link(), NxLink::Bluetooth);
        assert_eq!(dev.get_write_history().len(), 1);
        assert_eq!(nx.setup_step(), SetupStep::Vibration);
    }
}
