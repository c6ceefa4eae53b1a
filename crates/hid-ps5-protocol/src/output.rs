//! DualSense output report encoding.
//!
//! USB and Bluetooth share one effects block. Bluetooth prefixes it with a
//! sequence tag and the `0x10` data tag, and appends a CRC32 trailer.

#![deny(static_mut_refs)]

use crate::ids::report_ids;
use openpad_hid_common::{HidCommonResult, seal_bluetooth_report};

pub const USB_OUTPUT_LEN: usize = 48;
pub const BT_OUTPUT_LEN: usize = 78;

pub const USB_EFFECTS_OFFSET: usize = 1;
pub const BT_EFFECTS_OFFSET: usize = 3;

/// Data tag at byte 2 of every Bluetooth output report.
pub const BT_TAG: u8 = 0x10;

/// Bluetooth sequence numbers live in the upper nibble of byte 1 and wrap
/// at 16.
pub const BT_SEQ_MODULUS: u8 = 16;

/// Both motors.
pub const EFFECT_FLAGS0: u8 = 0x01 | 0x02;
/// Lightbar and player indicator.
pub const EFFECT_FLAGS1: u8 = 0x04 | 0x10;

const PLAYER_INDICATOR: usize = 43;
const LIGHTBAR: usize = 44;

/// Magenta.
pub const DEFAULT_LIGHTBAR: [u8; 3] = [0xFF, 0x00, 0xFF];

/// Encodes a rumble/LED report and returns the number of bytes to write.
/// `seq` only matters over Bluetooth, where its low nibble is sent.
///
/// # Errors
///
/// Propagates a failure to seal the Bluetooth checksum trailer.
pub fn encode_output(
    bluetooth: bool,
    seq: u8,
    low: u16,
    high: u16,
    player: u8,
    lightbar: [u8; 3],
    out: &mut [u8; BT_OUTPUT_LEN],
) -> HidCommonResult<usize> {
    out.fill(0);

    let (len, offset) = if bluetooth {
        out[0] = report_ids::BT_OUTPUT;
        out[1] = (seq % BT_SEQ_MODULUS) << 4;
        out[2] = BT_TAG;
        (BT_OUTPUT_LEN, BT_EFFECTS_OFFSET)
    } else {
        out[0] = report_ids::USB_OUTPUT;
        (USB_OUTPUT_LEN, USB_EFFECTS_OFFSET)
    };

    let [high_motor, _] = high.to_be_bytes();
    let [low_motor, _] = low.to_be_bytes();
    let block = &mut out[offset..];
    block[0] = EFFECT_FLAGS0;
    block[1] = EFFECT_FLAGS1;
    block[2] = high_motor;
    block[3] = low_motor;
    block[PLAYER_INDICATOR] = player;
    block[LIGHTBAR..LIGHTBAR + 3].copy_from_slice(&lightbar);

    if bluetooth {
        seal_bluetooth_report(out)?;
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpad_hid_common::verify_bluetooth_report;

    #[test]
    fn test_usb_layout() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; BT_OUTPUT_LEN];
        let len = encode_output(false, 9, 0x2200, 0x1100, 0, DEFAULT_LIGHTBAR, &mut out)?;
        assert_eq!(len, 48);
        assert_eq!(&out[..5], &[0x02, 0x03, 0x14, 0x11, 0x22]);
        assert_eq!(&out[44..48], &[0x00, 0xFF, 0x00, 0xFF]);
        Ok(())
    }

    #[test]
    fn test_bluetooth_layout() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; BT_OUTPUT_LEN];
        let len = encode_output(true, 0, 0, 0xFFFF, 0x04, [1, 2, 3], &mut out)?;
        assert_eq!(len, 78);
        assert_eq!(&out[..7], &[0x31, 0x00, 0x10, 0x03, 0x14, 0xFF, 0x00]);
        assert_eq!(&out[46..50], &[0x04, 1, 2, 3]);
        assert!(out[50..74].iter().all(|&b| b == 0));
        assert!(verify_bluetooth_report(&out));
        Ok(())
    }

    #[test]
    fn test_bluetooth_sequence_tag_wraps() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; BT_OUTPUT_LEN];
        encode_output(true, 3, 0, 0, 0, DEFAULT_LIGHTBAR, &mut out)?;
        assert_eq!(&out[1..3], &[0x30, 0x10]);
        encode_output(true, 17, 0, 0, 0, DEFAULT_LIGHTBAR, &mut out)?;
        assert_eq!(&out[1..3], &[0x10, 0x10]);
        assert!(verify_bluetooth_report(&out));
        Ok(())
    }
}
