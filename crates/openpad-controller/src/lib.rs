//! Canonical controller state for OpenPad.
//!
//! Every driver, vendor-specific or generic, produces a [`ControllerEvent`]:
//! up to 64 buttons indexed by [`CButton`] and up to 16 [`Value`] slots whose
//! first seven are pinned to the canonical axes listed in [`CValue`].
//!
//! - [`normalize`] rescales raw samples into the canonical ranges.
//! - [`mapping`] turns a generically decoded event into canonical layout.
//! - [`dedupe`] suppresses repeated or noise-only events.
//! - [`protocol`] is the trait every vendor driver implements.

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod dedupe;
pub mod event;
pub mod mapping;
pub mod normalize;
pub mod protocol;

pub use dedupe::{DEFAULT_STICK_DEADZONE, EventDeduper, clean_stick_value};
pub use event::{
    CButton, CValue, ControllerEvent, DriverKind, MAX_BUTTONS, MAX_VALUES, Value, usage,
};
pub use mapping::map_values;
pub use normalize::{byte_stick, signed_to_signed16, unsigned_to_signed16, unsigned_to_u8};
pub use protocol::ControllerProtocol;
