//! OpenPad controller hub.
//!
//! Picks a driver for every connected HID device, decodes its input reports
//! into canonical [`ControllerEvent`]s and forwards rumble requests. Devices
//! without a vendor driver are decoded from their own report descriptor.
//!
//! ```no_run
//! use openpad_engine::{ControllerHub, EngineConfig};
//! use openpad_hid_common::mock::MockHidDevice;
//! use std::time::Instant;
//!
//! let mut hub = ControllerHub::new(EngineConfig::default());
//! let id = hub.connect(Box::new(MockHidDevice::new(0x054C, 0x09CC, "pad")), Instant::now());
//! for event in hub.poll(Instant::now()) {
//!     println!("{} buttons={:#x}", event.id, event.buttons);
//! }
//! let _ = hub.rumble(id, Instant::now(), 0x8000, 0);
//! ```

#![deny(static_mut_refs)]

pub mod config;
pub mod default_driver;
pub mod device;
pub mod driver;
pub mod error;
pub mod hub;
pub mod registry;

pub use config::{DEDUPE_ENV, EngineConfig, MIN_READ_BUFFER_LEN, NX_PLAYER_SLOTS};
pub use default_driver::{decode_described, decode_unmapped};
pub use device::Device;
pub use driver::Driver;
pub use error::{EngineError, EngineResult};
pub use hub::ControllerHub;
pub use openpad_controller::{ControllerEvent, DriverKind};
pub use registry::driver_kind;
