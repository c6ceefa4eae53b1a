//! Common HID utilities for OpenPad controller drivers
//!
//! This crate provides the pieces shared by every vendor driver: the
//! transport boundary ([`DeviceWriter`], [`HidTransport`]), bounds-checked
//! report access, the Bluetooth output-report CRC32 trailer and the D-pad
//! octant encoding.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod crc;
pub mod descriptor;
pub mod device_info;
pub mod hat;
pub mod report;
pub mod transport;

pub use crc::*;
pub use descriptor::*;
pub use device_info::*;
pub use hat::*;
pub use report::*;
pub use transport::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    OpenError(String),

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Write timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid report format: {0}")]
    InvalidReport(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
