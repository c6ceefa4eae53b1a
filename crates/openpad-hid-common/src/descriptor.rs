//! Self-described report contents.
//!
//! Controllers without a dedicated driver are decoded from the layout they
//! publish in their report descriptor. Descriptor parsing belongs to the
//! transport; it hands the engine the already-extracted usages below.

use serde::{Deserialize, Serialize};

/// HID usage page for buttons.
pub const USAGE_PAGE_BUTTON: u16 = 0x09;

/// One button capability range and the usages asserted in the current report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonRange {
    pub usage_page: u16,
    pub usage_min: u16,
    pub usage_max: u16,
    pub pressed: Vec<u16>,
}

impl ButtonRange {
    pub fn new(usage_min: u16, usage_max: u16) -> Self {
        Self {
            usage_page: USAGE_PAGE_BUTTON,
            usage_min,
            usage_max,
            pressed: Vec::new(),
        }
    }

    pub fn with_pressed(mut self, usages: impl IntoIterator<Item = u16>) -> Self {
        self.pressed.extend(usages);
        self
    }

    /// Number of usages the range declares.
    pub fn width(&self) -> u16 {
        self.usage_max
            .checked_sub(self.usage_min)
            .map_or(0, |span| span.saturating_add(1))
    }
}

/// One value capability with its current sample and logical range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueField {
    pub usage_page: u16,
    pub usage: u16,
    pub data: i32,
    pub logical_min: i32,
    pub logical_max: i32,
}

impl ValueField {
    pub fn new(usage: u16, data: i32, logical_min: i32, logical_max: i32) -> Self {
        Self {
            usage_page: crate::USAGE_PAGE_GENERIC_DESKTOP,
            usage,
            data,
            logical_min,
            logical_max,
        }
    }
}

/// The decoded contents of one input report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribedReport {
    pub buttons: Vec<ButtonRange>,
    pub values: Vec<ValueField>,
}
