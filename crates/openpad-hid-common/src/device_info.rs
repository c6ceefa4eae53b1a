//! Device information types for HID game controllers

use serde::{Deserialize, Serialize};

/// Generic desktop usage page.
pub const USAGE_PAGE_GENERIC_DESKTOP: u16 = 0x01;
/// Generic desktop usages that identify a game controller collection.
pub const USAGE_JOYSTICK: u16 = 0x04;
pub const USAGE_GAMEPAD: u16 = 0x05;
pub const USAGE_MULTI_AXIS: u16 = 0x08;

/// Link the device is attached over, when the transport knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BusType {
    #[default]
    Unknown,
    Usb,
    Bluetooth,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HidDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub usage_page: u16,
    pub usage: u16,
    pub bus: BusType,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub path: String,
}

impl HidDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id,
            usage_page: USAGE_PAGE_GENERIC_DESKTOP,
            usage: USAGE_GAMEPAD,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_usage(mut self, usage_page: u16, usage: u16) -> Self {
        self.usage_page = usage_page;
        self.usage = usage;
        self
    }

    pub fn with_bus(mut self, bus: BusType) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    /// True when the top-level collection is a joystick, gamepad or
    /// multi-axis controller. Keyboards and mice exposing vendor pages are
    /// filtered out by transports using this check.
    pub fn is_game_controller(&self) -> bool {
        self.usage_page == USAGE_PAGE_GENERIC_DESKTOP
            && matches!(
                self.usage,
                USAGE_JOYSTICK | USAGE_GAMEPAD | USAGE_MULTI_AXIS
            )
    }

    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .or_else(|| self.manufacturer.clone())
            .unwrap_or_else(|| format!("{:04X}:{:04X}", self.vendor_id, self.product_id))
    }
}
