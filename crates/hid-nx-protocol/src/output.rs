//! Switch output report encoding.
//!
//! All functions are pure and allocation-free.
//!
//! # Report layouts
//!
//! ```text
//! USB command (0x80):   [0x80, cmd, 0...]                       64 bytes
//! Subcommand  (0x01):   [0x01, counter, rumble0[4], rumble1[4],
//!                        subcommand id, payload...]            49 (BT) / 64 (USB)
//! ```
//!
//! The packet counter is a 4-bit rolling value; the device drops packets
//! that repeat the previous counter.

use crate::ids::{
    BT_WRITE_LEN, FACTORY_STICK_CAL_ADDR, FACTORY_STICK_CAL_LEN, OUTPUT_REPORT_LEN, USB_WRITE_LEN,
    report_ids,
};

/// Motor idle pattern.
pub const RUMBLE_OFF: [u8; 4] = [0x00, 0x01, 0x40, 0x40];

/// Motor on pattern (fixed frequency and amplitude).
pub const RUMBLE_ON: [u8; 4] = [0x74, 0xBE, 0xBD, 0x6F];

/// Offset of the subcommand id within a subcommand report.
pub const SUBCOMMAND_ID_OFFSET: usize = 10;

/// Offset of the subcommand payload within a subcommand report.
pub const SUBCOMMAND_DATA_OFFSET: usize = 11;

/// Largest subcommand payload that fits a Bluetooth write.
pub const MAX_SUBCOMMAND_PAYLOAD: usize = BT_WRITE_LEN - SUBCOMMAND_DATA_OFFSET;

/// Pattern for one motor.
pub fn rumble_pattern(on: bool) -> [u8; 4] {
    if on { RUMBLE_ON } else { RUMBLE_OFF }
}

/// Builds a USB command report.
pub fn build_usb_command(command: u8) -> [u8; OUTPUT_REPORT_LEN] {
    let mut out = [0u8; OUTPUT_REPORT_LEN];
    out[0] = report_ids::USB_COMMAND;
    out[1] = command;
    out
}

/// Number of bytes to write for a subcommand on the given transport.
pub fn subcommand_write_len(bluetooth: bool) -> usize {
    if bluetooth { BT_WRITE_LEN } else { USB_WRITE_LEN }
}

/// Encodes a rumble + subcommand report and returns the number of bytes to
/// write. Payload bytes beyond [`MAX_SUBCOMMAND_PAYLOAD`] are dropped.
pub fn encode_subcommand(
    counter: u8,
    rumble: &[[u8; 4]; 2],
    subcommand: u8,
    payload: &[u8],
    bluetooth: bool,
    out: &mut [u8; OUTPUT_REPORT_LEN],
) -> usize {
    out.fill(0);
    out[0] = report_ids::SUBCOMMAND;
    out[1] = counter & 0x0F;
    out[2..6].copy_from_slice(&rumble[0]);
    out[6..10].copy_from_slice(&rumble[1]);
    out[SUBCOMMAND_ID_OFFSET] = subcommand;

    let n = payload.len().min(MAX_SUBCOMMAND_PAYLOAD);
    if let (Some(dst), Some(src)) = (
        out.get_mut(SUBCOMMAND_DATA_OFFSET..SUBCOMMAND_DATA_OFFSET + n),
        payload.get(..n),
    ) {
        dst.copy_from_slice(src);
    }

    subcommand_write_len(bluetooth)
}

/// SPI flash read request: address (u32 LE) then length.
pub fn spi_read_payload(address: u32, len: u8) -> [u8; 5] {
    let a = address.to_le_bytes();
    [a[0], a[1], a[2], a[3], len]
}

/// SPI read request for the factory stick calibration block.
pub fn factory_calibration_request() -> [u8; 5] {
    spi_read_payload(FACTORY_STICK_CAL_ADDR, FACTORY_STICK_CAL_LEN)
}
