//! Sony DualShock 4 HID protocol (and licensed PS4 pads).
//!
//! Input decoding is stateless; the only per-device state is whether the
//! controller is attached over Bluetooth, which changes the output report
//! framing and adds a CRC32 trailer.

#![deny(static_mut_refs)]

pub mod ids;
pub mod input;
pub mod output;
pub mod protocol;

pub use ids::{LICENSED_PADS, SONY_VENDOR_ID, is_ps4_product, product_ids};
pub use input::{parse_input_report, state_block};
pub use output::{BT_OUTPUT_LEN, DEFAULT_LIGHTBAR, USB_OUTPUT_LEN, encode_output};
pub use protocol::Ps4Protocol;
