//! Canonical controller event.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of buttons an event can carry.
pub const MAX_BUTTONS: usize = 64;

/// Maximum number of value slots an event can carry.
pub const MAX_VALUES: usize = 16;

/// HID generic desktop usages that map to canonical axes.
pub mod usage {
    pub const X: u16 = 0x30;
    pub const Y: u16 = 0x31;
    pub const Z: u16 = 0x32;
    pub const RX: u16 = 0x33;
    pub const RY: u16 = 0x34;
    pub const RZ: u16 = 0x35;
    pub const SLIDER: u16 = 0x36;
    pub const DIAL: u16 = 0x37;
    pub const WHEEL: u16 = 0x38;
    pub const HAT: u16 = 0x39;
}

/// Canonical button indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CButton {
    X = 0,
    A = 1,
    B = 2,
    Y = 3,
    LeftShoulder = 4,
    RightShoulder = 5,
    LeftTrigger = 6,
    RightTrigger = 7,
    Back = 8,
    Start = 9,
    LeftThumb = 10,
    RightThumb = 11,
    Guide = 12,
    Touchpad = 13,
    Mute = 14,
}

impl CButton {
    pub const ALL: [CButton; 15] = [
        CButton::X,
        CButton::A,
        CButton::B,
        CButton::Y,
        CButton::LeftShoulder,
        CButton::RightShoulder,
        CButton::LeftTrigger,
        CButton::RightTrigger,
        CButton::Back,
        CButton::Start,
        CButton::LeftThumb,
        CButton::RightThumb,
        CButton::Guide,
        CButton::Touchpad,
        CButton::Mute,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Canonical value slots. Slot index equals the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CValue {
    ThumbLx = 0,
    ThumbLy = 1,
    ThumbRx = 2,
    ThumbRy = 3,
    TriggerL = 4,
    TriggerR = 5,
    Dpad = 6,
}

impl CValue {
    pub const COUNT: usize = 7;

    pub const ALL: [CValue; Self::COUNT] = [
        CValue::ThumbLx,
        CValue::ThumbLy,
        CValue::ThumbRx,
        CValue::ThumbRy,
        CValue::TriggerL,
        CValue::TriggerR,
        CValue::Dpad,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// HID usage that belongs in this slot.
    pub fn usage(self) -> u16 {
        match self {
            CValue::ThumbLx => usage::X,
            CValue::ThumbLy => usage::Y,
            CValue::ThumbRx => usage::Z,
            CValue::ThumbRy => usage::RZ,
            CValue::TriggerL => usage::RX,
            CValue::TriggerR => usage::RY,
            CValue::Dpad => usage::HAT,
        }
    }

    /// Slot a usage belongs in, if it is one of the canonical seven.
    pub fn for_usage(usage: u16) -> Option<CValue> {
        CValue::ALL.into_iter().find(|slot| slot.usage() == usage)
    }
}

/// Driver that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriverKind {
    #[default]
    Default,
    Nx,
    Ps4,
    Ps5,
    Xbox,
    XboxW,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverKind::Default => "default",
            DriverKind::Nx => "nx",
            DriverKind::Ps4 => "ps4",
            DriverKind::Ps5 => "ps5",
            DriverKind::Xbox => "xbox",
            DriverKind::XboxW => "xboxw",
        };
        f.write_str(name)
    }
}

/// One analog sample with its logical range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Value {
    pub usage: u16,
    pub data: i16,
    pub min: i16,
    pub max: i16,
}

impl Value {
    pub const fn new(usage: u16, data: i16, min: i16, max: i16) -> Self {
        Self {
            usage,
            data,
            min,
            max,
        }
    }

    /// Full symmetric signed range.
    pub const fn signed(usage: u16, data: i16) -> Self {
        Self::new(usage, data, i16::MIN, i16::MAX)
    }

    /// Unsigned 8-bit range.
    pub const fn unsigned8(usage: u16, data: u8) -> Self {
        Self::new(usage, data as i16, 0, u8::MAX as i16)
    }

    pub fn in_range(&self) -> bool {
        self.min <= self.data && self.data <= self.max
    }
}

/// Snapshot of one controller after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerEvent {
    /// Session id assigned by the engine.
    pub id: u32,
    pub vendor_id: u16,
    pub product_id: u16,
    pub driver: DriverKind,
    pub num_buttons: u8,
    pub num_values: u8,
    /// Bit `n` is button `n`.
    pub buttons: u64,
    pub values: [Value; MAX_VALUES],
    /// Values are in canonical layout and range. Vendor drivers produce
    /// canonical events directly; generic events get there through
    /// [`map_values`](crate::map_values).
    pub mapped: bool,
}

impl ControllerEvent {
    pub fn new(driver: DriverKind) -> Self {
        Self {
            driver,
            mapped: driver != DriverKind::Default,
            ..Self::default()
        }
    }

    pub fn button(&self, button: CButton) -> bool {
        self.button_at(button.index())
    }

    pub fn button_at(&self, index: usize) -> bool {
        index < MAX_BUTTONS && self.buttons & (1u64 << index) != 0
    }

    pub fn set_button(&mut self, button: CButton, pressed: bool) {
        self.set_button_at(button.index(), pressed);
    }

    /// Sets button `index`; indices of 64 and above are dropped.
    pub fn set_button_at(&mut self, index: usize, pressed: bool) -> bool {
        if index >= MAX_BUTTONS {
            return false;
        }
        let bit = 1u64 << index;
        if pressed {
            self.buttons |= bit;
        } else {
            self.buttons &= !bit;
        }
        true
    }

    /// Indices of all pressed buttons, ascending.
    pub fn pressed_buttons(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_BUTTONS).filter(|&i| self.button_at(i))
    }

    pub fn value(&self, slot: CValue) -> Value {
        self.values
            .get(slot.index())
            .copied()
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, slot: CValue, value: Value) {
        if let Some(dst) = self.values.get_mut(slot.index()) {
            *dst = value;
        }
    }

    /// The populated value slots.
    pub fn active_values(&self) -> &[Value] {
        let n = usize::from(self.num_values).min(MAX_VALUES);
        self.values.get(..n).unwrap_or(&[])
    }

    /// Stamps device identity onto a decoded event.
    pub fn with_identity(mut self, id: u32, vendor_id: u16, product_id: u16) -> Self {
        self.id = id;
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }
}
