//! Nintendo Switch controller protocol (Pro Controller, Joy-Con, licensed pads).
//!
//! I/O-free: everything is driven through [`openpad_hid_common::DeviceWriter`]
//! with the caller supplying the clock.
//!
//! # Setup sequence
//!
//! 1. USB handshake `0x80 0x02`. A `0x81` reply means USB; silence for 500 ms
//!    means Bluetooth.
//! 2. USB only: 3 Mbit baud rate, handshake again, force USB.
//! 3. SPI read of the factory stick calibration (`0x603D`, 18 bytes).
//! 4. Enable vibration, select full (USB) or simple (Bluetooth) reports.
//! 5. Home and player LEDs.
//!
//! Input reports are ignored until the calibration reply has been parsed.

#![deny(static_mut_refs)]

pub mod calibration;
pub mod ids;
pub mod input;
pub mod output;
pub mod protocol;

pub use calibration::{AxisCalibration, StickCalibration, parse_factory_calibration, unpack_pair};
pub use ids::{HORI_VENDOR_ID, NINTENDO_VENDOR_ID, is_nx_product, product_ids};
pub use input::{NxReport, classify_report, parse_full_state, parse_simple_state};
pub use output::{RUMBLE_OFF, RUMBLE_ON, build_usb_command, encode_subcommand};
pub use protocol::{NxLink, NxProtocol, SetupStep, WRITE_TIMEOUT};
