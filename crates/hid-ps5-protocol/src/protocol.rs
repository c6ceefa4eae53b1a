//! DualSense protocol handler.

use crate::input::{layout_for, parse_input_report};
use crate::output::{BT_OUTPUT_LEN, BT_SEQ_MODULUS, DEFAULT_LIGHTBAR, encode_output};
use openpad_controller::{ControllerEvent, ControllerProtocol, DriverKind};
use openpad_hid_common::DeviceWriter;
use std::time::Instant;
use tracing::{debug, warn};

/// Per-device DualSense state.
#[derive(Debug, Clone)]
pub struct Ps5Protocol {
    primed: bool,
    bluetooth: bool,
    seq: u8,
    player: u8,
    lightbar: [u8; 3],
}

impl Default for Ps5Protocol {
    fn default() -> Self {
        Self::new()
    }
}

impl Ps5Protocol {
    pub fn new() -> Self {
        Self {
            primed: false,
            bluetooth: false,
            seq: 0,
            player: 0,
            lightbar: DEFAULT_LIGHTBAR,
        }
    }

    pub fn with_lightbar(mut self, rgb: [u8; 3]) -> Self {
        self.lightbar = rgb;
        self
    }

    /// Player indicator LED mask (five LEDs, bit 0 leftmost).
    pub fn with_player_indicator(mut self, mask: u8) -> Self {
        self.player = mask & 0x1F;
        self
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    pub fn is_bluetooth(&self) -> bool {
        self.bluetooth
    }

    fn write_effects(&mut self, low: u16, high: u16, writer: &mut dyn DeviceWriter) {
        let mut out = [0u8; BT_OUTPUT_LEN];
        let encoded = encode_output(
            self.bluetooth,
            self.seq,
            low,
            high,
            self.player,
            self.lightbar,
            &mut out,
        );
        let len = match encoded {
            Ok(len) => len,
            Err(e) => {
                warn!("PS5: failed to encode effects report: {}", e);
                return;
            }
        };
        if self.bluetooth {
            self.seq = (self.seq + 1) % BT_SEQ_MODULUS;
        }
        if let Err(e) = writer.write_output_report(out.get(..len).unwrap_or(&out)) {
            warn!("PS5: failed to write effects report: {}", e);
        }
    }
}

impl ControllerProtocol for Ps5Protocol {
    fn kind(&self) -> DriverKind {
        DriverKind::Ps5
    }

    /// The DualSense ignores output until it has started reporting, so the
    /// first write waits for the first input report.
    fn initialize(&mut self, _now: Instant, _writer: &mut dyn DeviceWriter) {
        self.primed = false;
    }

    fn handle_report(
        &mut self,
        _now: Instant,
        report: &[u8],
        writer: &mut dyn DeviceWriter,
    ) -> Option<ControllerEvent> {
        if let Some(layout) = layout_for(report) {
            self.bluetooth = layout.bluetooth;
        }

        if !self.primed {
            self.primed = true;
            debug!(
                "PS5: first report ({} bytes), priming output over {}",
                report.len(),
                if self.bluetooth { "Bluetooth" } else { "USB" }
            );
            self.write_effects(0, 0, writer);
            return None;
        }

        parse_input_report(report)
    }

    fn set_rumble(&mut self, _now: Instant, low: u16, high: u16, writer: &mut dyn DeviceWriter) {
        self.write_effects(low, high, writer);
    }
}
