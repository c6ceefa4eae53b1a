//! Xbox controller HID protocols.
//!
//! - Bluetooth/BLE controllers ([`XboxProtocol`]): 16-bit sticks, 10-bit
//!   triggers, firmware-dependent guide button and debounced rumble.
//! - Wired Xbox 360 style controllers ([`XboxWiredProtocol`]): a fixed
//!   14-byte report decoded without state.

#![deny(static_mut_refs)]

pub mod ids;
pub mod input;
pub mod output;
pub mod protocol;
pub mod wired;

pub use ids::{
    MICROSOFT_VENDOR_ID, is_xbox_bluetooth_product, is_xbox_wired_product, product_ids,
};
pub use input::{XboxFirmware, XboxInputState, parse_input_report};
pub use output::{RUMBLE_REPORT_LEN, build_rumble_report};
pub use protocol::{RUMBLE_DEBOUNCE, RUMBLE_KEEPALIVE, XboxProtocol, XboxWiredProtocol};
pub use wired::{WIRED_REPORT_LEN, parse_wired_report};
