//! Decoder for controllers without a vendor driver.
//!
//! Buttons and values come from the usages the transport extracted with the
//! device's own report descriptor. Button usages index from the start of
//! their capability range; values keep declaration order until
//! [`map_values`] moves the canonical ones into place.

use openpad_controller::{ControllerEvent, DriverKind, MAX_BUTTONS, MAX_VALUES, Value, map_values};
use openpad_hid_common::{DescribedReport, USAGE_PAGE_BUTTON};

fn saturate(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Builds the raw event without canonical mapping.
pub fn decode_unmapped(report: &DescribedReport) -> ControllerEvent {
    let mut event = ControllerEvent::new(DriverKind::Default);

    let mut num_buttons: usize = 0;
    for range in report
        .buttons
        .iter()
        .filter(|r| r.usage_page == USAGE_PAGE_BUTTON)
    {
        num_buttons += usize::from(range.width());
        for &usage in &range.pressed {
            if let Some(index) = usage.checked_sub(range.usage_min) {
                event.set_button_at(usize::from(index), true);
            }
        }
    }
    event.num_buttons = num_buttons.min(MAX_BUTTONS) as u8;

    for (slot, field) in event.values.iter_mut().zip(report.values.iter().take(MAX_VALUES)) {
        *slot = Value::new(
            field.usage,
            saturate(field.data),
            saturate(field.logical_min),
            saturate(field.logical_max),
        );
    }
    event.num_values = report.values.len().min(MAX_VALUES) as u8;

    event
}

/// Decodes and maps a self-described report into canonical layout.
pub fn decode_described(report: &DescribedReport) -> ControllerEvent {
    let mut event = decode_unmapped(report);
    map_values(&mut event);
    event
}
