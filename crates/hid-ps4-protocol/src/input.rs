//! DualShock 4 input report parsing.
//!
//! USB reports (`0x01`) carry the state block at offset 1, Bluetooth
//! extended reports (`0x11`) at offset 3. The block layout is identical:
//!
//! ```text
//! 0..4  LX LY RX RY (u8, centre 0x80)
//! 4     face buttons (high nibble) + hat (low nibble)
//! 5     L1 R1 L2 R2 Share Options L3 R3
//! 6     PS, touchpad click
//! 7, 8  L2 / R2 analog
//! ```

use crate::ids::report_ids;
use openpad_controller::{CButton, CValue, ControllerEvent, DriverKind, Value, byte_stick, usage};
use openpad_hid_common::{ReportView, clamp_hat};

pub const USB_STATE_OFFSET: usize = 1;
pub const BT_STATE_OFFSET: usize = 3;

/// Bytes of the state block read by the decoder.
pub const STATE_BLOCK_LEN: usize = 9;

const NUM_BUTTONS: u8 = 14;
const NUM_VALUES: u8 = 7;

/// State block of a USB or Bluetooth input report.
pub fn state_block(data: &[u8]) -> Option<ReportView<'_>> {
    let view = ReportView::new(data);
    let offset = match view.report_id()? {
        report_ids::USB_INPUT => USB_STATE_OFFSET,
        report_ids::BT_INPUT => BT_STATE_OFFSET,
        _ => return None,
    };
    let block = view.offset(offset)?;
    (block.len() >= STATE_BLOCK_LEN).then_some(block)
}

/// Decodes a DualShock 4 input report. Other report ids give `None`.
pub fn parse_input_report(data: &[u8]) -> Option<ControllerEvent> {
    let p = state_block(data)?;

    let mut event = ControllerEvent::new(DriverKind::Ps4);
    event.num_buttons = NUM_BUTTONS;
    event.num_values = NUM_VALUES;

    let face = p.u8_or_zero(4);
    let shoulders = p.u8_or_zero(5);
    let system = p.u8_or_zero(6);

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
    ];
    for (button, bits) in buttons {
        event.set_button(button, bits != 0);
    }

    event.set_value(CValue::ThumbLx, byte_stick(usage::X, p.u8_or_zero(0), false));
    event.set_value(CValue::ThumbLy, byte_stick(usage::Y, p.u8_or_zero(1), true));
    event.set_value(CValue::ThumbRx, byte_stick(usage::Z, p.u8_or_zero(2), false));
    event.set_value(CValue::ThumbRy, byte_stick(usage::RZ, p.u8_or_zero(3), true));
    event.set_value(CValue::TriggerL, Value::unsigned8(usage::RX, p.u8_or_zero(7)));
    event.set_value(CValue::TriggerR, Value::unsigned8(usage::RY, p.u8_or_zero(8)));
    event.set_value(
        CValue::Dpad,
        Value::new(usage::HAT, i16::from(clamp_hat(face & 0x0F)), 0, 8),
    );

    Some(event)
}
