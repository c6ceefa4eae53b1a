//! Wired Xbox 360 style report parsing.
//!
//! Fixed 14-byte layout with no usable report id:
//!
//! ```text
//! 2      hat bits (up, down, left, right) + Start Back L3 R3
//! 3      LB RB Guide - A B X Y
//! 4, 5   LT RT (u8)
//! 6..14  LX LY RX RY (i16 LE, Y down)
//! ```

use crate::input::flip_axis;
use openpad_controller::{CButton, CValue, ControllerEvent, DriverKind, Value, usage};
use openpad_hid_common::{ReportView, dpad_from_bits};

pub const WIRED_REPORT_LEN: usize = 14;

const NUM_BUTTONS: u8 = 13;
const NUM_VALUES: u8 = 7;

/// Decodes a wired report. Anything shorter than [`WIRED_REPORT_LEN`] gives
/// `None`.
pub fn parse_wired_report(data: &[u8]) -> Option<ControllerEvent> {
    let view = ReportView::require(data, WIRED_REPORT_LEN)?;
    let d2 = view.u8_or_zero(2);
    let d3 = view.u8_or_zero(3);
    let lt = view.u8_or_zero(4);
    let rt = view.u8_or_zero(5);

    let mut event = ControllerEvent::new(DriverKind::XboxW);
    event.num_buttons = NUM_BUTTONS;
    event.num_values = NUM_VALUES;

    let buttons = [
        (CButton::X, d3 & 0x40 != 0),
        (CButton::A, d3 & 0x10 != 0),
        (CButton::B, d3 & 0x20 != 0),
        (CButton::Y, d3 & 0x80 != 0),
        (CButton::LeftShoulder, d3 & 0x01 != 0),
        (CButton::RightShoulder, d3 & 0x02 != 0),
        (CButton::LeftTrigger, lt > 0),
        (CButton::RightTrigger, rt > 0),
        (CButton::Back, d2 & 0x20 != 0),
        (CButton::Start, d2 & 0x10 != 0),
        (CButton::LeftThumb, d2 & 0x40 != 0),
        (CButton::RightThumb, d2 & 0x80 != 0),
        (CButton::Guide, d3 & 0x04 != 0),
    ];
    for (button, pressed) in buttons {
        event.set_button(button, pressed);
    }

    let axis = |offset: usize| view.i16_le_at(offset).unwrap_or(0);
    event.set_value(CValue::ThumbLx, Value::signed(usage::X, axis(6)));
    event.set_value(CValue::ThumbLy, Value::signed(usage::Y, flip_axis(axis(8))));
    event.set_value(CValue::ThumbRx, Value::signed(usage::Z, axis(10)));
    event.set_value(CValue::ThumbRy, Value::signed(usage::RZ, flip_axis(axis(12))));
    event.set_value(CValue::TriggerL, Value::unsigned8(usage::RX, lt));
    event.set_value(CValue::TriggerR, Value::unsigned8(usage::RY, rt));

    let hat = dpad_from_bits(d2 & 0x01 != 0, d2 & 0x08 != 0, d2 & 0x02 != 0, d2 & 0x04 != 0);
    event.set_value(CValue::Dpad, Value::new(usage::HAT, i16::from(hat), 0, 8));

    Some(event)
}
