//! Sony DualSense HID protocol.
//!
//! The transport is inferred from report sizes (78 bytes over Bluetooth, 64
//! over USB). The first input report after connecting only triggers the
//! priming output write; decoding starts with the second.

#![deny(static_mut_refs)]

pub mod ids;
pub mod input;
pub mod output;
pub mod protocol;

pub use ids::{SONY_VENDOR_ID, is_ps5_product, product_ids};
pub use input::{Ps5Layout, layout_for, parse_input_report};
pub use output::{BT_OUTPUT_LEN, DEFAULT_LIGHTBAR, USB_OUTPUT_LEN, encode_output};
pub use protocol::Ps5Protocol;
