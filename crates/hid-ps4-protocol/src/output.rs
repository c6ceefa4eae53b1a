//! DualShock 4 output report encoding (rumble motors and lightbar).

#![deny(static_mut_refs)]

use crate::ids::report_ids;
use openpad_hid_common::{HidCommonResult, seal_bluetooth_report};

pub const USB_OUTPUT_LEN: usize = 32;
pub const BT_OUTPUT_LEN: usize = 78;

pub const USB_EFFECTS_OFFSET: usize = 4;
pub const BT_EFFECTS_OFFSET: usize = 6;

/// Enables rumble, lightbar and lightbar flash on the USB report.
pub const USB_EFFECT_FLAGS: u8 = 0x07;

/// Bluetooth report flags: HID output with CRC, polling interval code.
pub const BT_REPORT_FLAGS: u8 = 0xC4;
pub const BT_EFFECT_FLAGS: u8 = 0x03;

/// Dim blue.
pub const DEFAULT_LIGHTBAR: [u8; 3] = [0x00, 0x00, 0x40];

/// Encodes an effects report into `out` and returns the number of bytes to
/// write. The high-frequency (right) motor comes first on the wire.
///
/// # Errors
///
/// Propagates a failure to seal the Bluetooth checksum trailer.
pub fn encode_output(
    bluetooth: bool,
    low: u16,
    high: u16,
    lightbar: [u8; 3],
    out: &mut [u8; BT_OUTPUT_LEN],
) -> HidCommonResult<usize> {
    out.fill(0);

    let (len, offset) = if bluetooth {
        out[0] = report_ids::BT_OUTPUT;
        out[1] = BT_REPORT_FLAGS;
        out[3] = BT_EFFECT_FLAGS;
        (BT_OUTPUT_LEN, BT_EFFECTS_OFFSET)
    } else {
        out[0] = report_ids::USB_OUTPUT;
        out[1] = USB_EFFECT_FLAGS;
        (USB_OUTPUT_LEN, USB_EFFECTS_OFFSET)
    };

    let [high_motor, _] = high.to_be_bytes();
    let [low_motor, _] = low.to_be_bytes();
    out[offset] = high_motor;
    out[offset + 1] = low_motor;
    out[offset + 2..offset + 5].copy_from_slice(&lightbar);

    if bluetooth {
        seal_bluetooth_report(out)?;
    }

    Ok(len)
}
