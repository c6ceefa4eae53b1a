//! Xbox Bluetooth rumble report.

#![deny(static_mut_refs)]

use crate::ids::report_ids;

pub const RUMBLE_REPORT_LEN: usize = 9;

/// Enable bits for the four actuators (left, right, left and right impulse
/// triggers).
pub const RUMBLE_ENABLE_ALL: u8 = 0x0F;

/// Duration byte; the controller stops on its own after about three seconds.
pub const RUMBLE_DURATION_MAX: u8 = 0xFF;

/// Builds the rumble report. Trigger motors stay off.
pub fn build_rumble_report(low: u16, high: u16) -> [u8; RUMBLE_REPORT_LEN] {
    let [low_motor, _] = low.to_be_bytes();
    let [high_motor, _] = high.to_be_bytes();
    [
        report_ids::RUMBLE,
        RUMBLE_ENABLE_ALL,
        0x00,
        0x00,
        low_motor,
        high_motor,
        RUMBLE_DURATION_MAX,
        0x00,
        0x00,
    ]
}
