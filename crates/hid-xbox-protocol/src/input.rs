//! Xbox Bluetooth input report parsing.
//!
//! ```text
//! 0x01: 1..9   LX LY RX RY  (u16 LE, centre 0x8000, Y down)
//!       9..13  LT RT        (10-bit in u16 LE)
//!       13     hat          (0 = centre, 1..8 = N, NE, ...)
//!       14..17 buttons
//! 0x02: 1      guide (bit 0)
//! ```

use crate::ids::report_ids;
use openpad_controller::{CButton, CValue, ControllerEvent, DriverKind, Value, usage};
use openpad_hid_common::{DPAD_CENTER, ReportView};

pub const INPUT_REPORT_MIN_LEN: usize = 17;

const NUM_BUTTONS: u8 = 14;
const NUM_VALUES: u8 = 7;

/// Firmware generation, learned from the reports themselves.
///
/// `V1` is assumed once an input report arrives without the guide bit
/// (byte 15, `0x10`); the guide button then keeps the value latched from
/// the last `0x02` report. Seeing the bit, or a `0x02` report, moves the pad
/// to `V2`, which reads guide from the input report. There is no way back
/// from `V2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XboxFirmware {
    #[default]
    Unknown,
    V1,
    V2,
}

/// Input state carried between reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XboxInputState {
    pub firmware: XboxFirmware,
    pub guide: bool,
}

/// Stick sample: unsigned around `0x8000`, optionally flipped so up is
/// positive.
pub(crate) fn centred_stick(raw: u16, invert: bool) -> i16 {
    let v = i32::from(raw) - 0x8000;
    let v = if invert { -(v + 1) } else { v };
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Flips a signed Y axis so up is positive.
pub(crate) fn flip_axis(v: i16) -> i16 {
    (-(i32::from(v) + 1)) as i16
}

fn trigger(raw: u16) -> u8 {
    (raw >> 2).min(u16::from(u8::MAX)) as u8
}

/// Decodes a Bluetooth report. `0x02` reports only update `state`.
pub fn parse_input_report(data: &[u8], state: &mut XboxInputState) -> Option<ControllerEvent> {
    let view = ReportView::new(data);
    match view.report_id()? {
        report_ids::INPUT => {}
        report_ids::GUIDE => {
            state.firmware = XboxFirmware::V2;
            state.guide = view.bit(1, 0x01);
            return None;
        }
        _ => return None,
    }
    if view.len() < INPUT_REPORT_MIN_LEN {
        return None;
    }

    let d14 = view.u8_or_zero(14);
    let d15 = view.u8_or_zero(15);
    let d16 = view.u8_or_zero(16);

    state.firmware = match (state.firmware, d15 & 0x10 != 0) {
        (XboxFirmware::V2, _) | (_, true) => XboxFirmware::V2,
        _ => XboxFirmware::V1,
    };
    if state.firmware == XboxFirmware::V2 {
        state.guide = d15 & 0x10 != 0;
    }

    let mut event = ControllerEvent::new(DriverKind::Xbox);
    event.num_buttons = NUM_BUTTONS;
    event.num_values = NUM_VALUES;

    let lt = trigger(view.u16_le_at(9).unwrap_or(0));
    let rt = trigger(view.u16_le_at(11).unwrap_or(0));

    let buttons = [
        (CButton::X, d14 & 0x08 != 0),
        (CButton::A, d14 & 0x01 != 0),
        (CButton::B, d14 & 0x02 != 0),
        (CButton::Y, d14 & 0x10 != 0),
        (CButton::LeftShoulder, d14 & 0x40 != 0),
        (CButton::RightShoulder, d14 & 0x80 != 0),
        (CButton::LeftTrigger, lt > 0),
        (CButton::RightTrigger, rt > 0),
        (CButton::Back, d16 & 0x01 != 0),
        (CButton::Start, d15 & 0x08 != 0),
        (CButton::LeftThumb, d15 & 0x20 != 0),
        (CButton::RightThumb, d15 & 0x40 != 0),
        (CButton::Guide, state.guide),
    ];
    for (button, pressed) in buttons {
        event.set_button(button, pressed);
    }

    let stick = |offset: usize, invert: bool| {
        centred_stick(view.u16_le_at(offset).unwrap_or(0x8000), invert)
    };
    event.set_value(CValue::ThumbLx, Value::signed(usage::X, stick(1, false)));
    event.set_value(CValue::ThumbLy, Value::signed(usage::Y, stick(3, true)));
    event.set_value(CValue::ThumbRx, Value::signed(usage::Z, stick(5, false)));
    event.set_value(CValue::ThumbRy, Value::signed(usage::RZ, stick(7, true)));
    event.set_value(CValue::TriggerL, Value::unsigned8(usage::RX, lt));
    event.set_value(CValue::TriggerR, Value::unsigned8(usage::RY, rt));

    let hat = match view.u8_or_zero(13) {
        0 => DPAD_CENTER,
        n => (n - 1).min(DPAD_CENTER),
    };
    event.set_value(CValue::Dpad, Value::new(usage::HAT, i16::from(hat), 0, 8));

    Some(event)
}
