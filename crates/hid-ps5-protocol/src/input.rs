//! DualSense input report parsing.
//!
//! The three report framings share one state layout read through three
//! cursors: sticks, triggers and buttons.
//!
//! | framing            | id     | sticks | triggers | buttons |
//! |--------------------|--------|--------|----------|---------|
//! | USB                | `0x01` | 1      | 5        | 8       |
//! | Bluetooth full     | `0x31` | 2      | 6        | 9       |
//! | Bluetooth simple   | `0x01` | 1      | 8        | 5       |
//!
//! The simple framing is what a DualSense sends over Bluetooth until it has
//! received its first output report; it is shorter than a USB report.

use crate::ids::{USB_INPUT_LEN, report_ids};
use openpad_controller::{CButton, CValue, ControllerEvent, DriverKind, Value, byte_stick, usage};
use openpad_hid_common::{ReportView, clamp_hat};

const NUM_BUTTONS: u8 = 15;
const NUM_VALUES: u8 = 7;

/// Byte cursors for one report framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ps5Layout {
    pub sticks: usize,
    pub triggers: usize,
    pub buttons: usize,
    pub bluetooth: bool,
}

impl Ps5Layout {
    pub const USB: Self = Self {
        sticks: 1,
        triggers: 5,
        buttons: 8,
        bluetooth: false,
    };
    pub const BT_FULL: Self = Self {
        sticks: 2,
        triggers: 6,
        buttons: 9,
        bluetooth: true,
    };
    pub const BT_SIMPLE: Self = Self {
        sticks: 1,
        triggers: 8,
        buttons: 5,
        bluetooth: true,
    };

    /// Smallest report that holds every field at these cursors.
    pub fn min_len(&self) -> usize {
        (self.sticks + 4).max(self.triggers + 2).max(self.buttons + 3)
    }
}

/// Picks the framing of `data` from its id and size.
pub fn layout_for(data: &[u8]) -> Option<Ps5Layout> {
    let layout = match *data.first()? {
        report_ids::BT_INPUT => Ps5Layout::BT_FULL,
        report_ids::SIMPLE_INPUT if data.len() >= USB_INPUT_LEN => Ps5Layout::USB,
        report_ids::SIMPLE_INPUT => Ps5Layout::BT_SIMPLE,
        _ => return None,
    };
    (data.len() >= layout.min_len()).then_some(layout)
}

/// Decodes a DualSense input report in any of its framings.
pub fn parse_input_report(data: &[u8]) -> Option<ControllerEvent> {
    let layout = layout_for(data)?;
    let view = ReportView::new(data);
    let s = view.offset(layout.sticks)?;
    let t = view.offset(layout.triggers)?;
    let b = view.offset(layout.buttons)?;

    let mut event = ControllerEvent::new(DriverKind::Ps5);
    event.num_buttons = NUM_BUTTONS;
    event.num_values = NUM_VALUES;

    let face = b.u8_or_zero(0);
    let shoulders = b.u8_or_zero(1);
    let system = b.u8_or_zero(2);

    let buttons = [
        (CButton::X, face & 0x10),
        (CButton::A, face & 0x20),
        (CButton::B, face & 0x40),
        (CButton::Y, face & 0x80),
        (CButton::LeftShoulder, shoulders & 0x01),
        (CButton::RightShoulder, shoulders & 0x02),
        (CButton::LeftTrigger, shoulders & 0x04),
        (CButton::RightTrigger, shoulders & 0x08),
        (CButton::Back, shoulders & 0x10),
        (CButton::Start, shoulders & 0x20),
        (CButton::LeftThumb, shoulders & 0x40),
        (CButton::RightThumb, shoulders & 0x80),
        (CButton::Guide, system & 0x01),
        (CButton::Touchpad, system & 0x02),
        (CButton::Mute, system & 0x04),
    ];
    for (button, bits) in buttons {
        event.set_button(button, bits != 0);
    }

    event.set_value(CValue::ThumbLx, byte_stick(usage::X, s.u8_or_zero(0), false));
    event.set_value(CValue::ThumbLy, byte_stick(usage::Y, s.u8_or_zero(1), true));
    event.set_value(CValue::ThumbRx, byte_stick(usage::Z, s.u8_or_zero(2), false));
    event.set_value(CValue::ThumbRy, byte_stick(usage::RZ, s.u8_or_zero(3), true));
    event.set_value(CValue::TriggerL, Value::unsigned8(usage::RX, t.u8_or_zero(0)));
    event.set_value(CValue::TriggerR, Value::unsigned8(usage::RY, t.u8_or_zero(1)));
    event.set_value(
        CValue::Dpad,
        Value::new(usage::HAT, i16::from(clamp_hat(face & 0x0F)), 0, 8),
    );

    Some(event)
}
