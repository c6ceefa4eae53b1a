//! Generic mapper for controllers without a dedicated driver.
//!
//! A generically decoded event carries values in whatever order the device
//! declared them. [`map_values`] moves the seven canonical usages into their
//! fixed slots, rescales them and synthesizes analog triggers for devices
//! that only report trigger buttons.

use crate::event::{CButton, CValue, ControllerEvent, MAX_VALUES, Value, usage};
use crate::normalize::{unsigned_to_signed16, unsigned_to_u8};
use openpad_hid_common::DPAD_CENTER;
use tracing::trace;

fn has_usage(values: &[Value], wanted: u16) -> bool {
    values.iter().any(|v| v.usage == wanted)
}

/// Moves every canonical usage into its slot. Each swap settles one value
/// for good, so the per-slot loop is bounded by the slot count.
fn settle_canonical_slots(values: &mut [Value]) {
    for x in 0..values.len() {
        for _ in 0..MAX_VALUES {
            let Some(current) = values.get(x).map(|v| v.usage) else {
                break;
            };
            let Some(target) = CValue::for_usage(current).map(CValue::index) else {
                break;
            };
            let occupied_by_same = values.get(target).is_some_and(|v| v.usage == current);
            if target == x || occupied_by_same || target >= values.len() {
                break;
            }
            values.swap(x, target);
        }
    }
}

fn neutral(slot: CValue) -> Value {
    match slot {
        CValue::ThumbLx | CValue::ThumbLy | CValue::ThumbRx | CValue::ThumbRy => {
            Value::signed(slot.usage(), 0)
        }
        CValue::TriggerL | CValue::TriggerR => Value::unsigned8(slot.usage(), 0),
        CValue::Dpad => Value::new(usage::HAT, i16::from(DPAD_CENTER), 0, i16::from(DPAD_CENTER)),
    }
}

/// Canonical slots that still hold something else get a neutral value; the
/// previous occupant is kept at the end while there is room.
fn fill_missing_slots(event: &mut ControllerEvent) {
    for slot in CValue::ALL {
        let Some(current) = event.values.get(slot.index()).copied() else {
            continue;
        };
        if current.usage == slot.usage() {
            continue;
        }

        let end = usize::from(event.num_values);
        if current.usage != 0 && end < MAX_VALUES {
            if let Some(dst) = event.values.get_mut(end) {
                *dst = current;
                event.num_values += 1;
            }
        }
        event.set_value(slot, neutral(slot));
    }
}

/// Hat switches report out-of-range values as their null state.
fn normalize_hat(v: &mut Value) {
    let centre = i16::from(DPAD_CENTER);
    let data = if v.data < v.min || v.data > v.max {
        centre
    } else {
        (i32::from(v.data) - i32::from(v.min)).clamp(0, i32::from(centre)) as i16
    };
    *v = Value::new(usage::HAT, data, 0, centre);
}

/// Neutral value for a known axis usage, used when the device declared no
/// logical range at all.
fn unset_axis(code: u16) -> Option<Value> {
    match code {
        usage::X | usage::Y | usage::Z | usage::RZ => Some(Value::signed(code, 0)),
        usage::RX | usage::RY | usage::SLIDER | usage::DIAL | usage::WHEEL => {
            Some(Value::unsigned8(code, 0))
        }
        usage::HAT => Some(neutral(CValue::Dpad)),
        _ => None,
    }
}

fn convert(v: &mut Value) {
    if v.min == 0 && v.max == 0 {
        if let Some(neutral) = unset_axis(v.usage) {
            *v = neutral;
        }
        return;
    }

    match v.usage {
        usage::X | usage::Z => unsigned_to_signed16(v, false),
        usage::Y | usage::RZ => unsigned_to_signed16(v, true),
        usage::RX | usage::RY | usage::SLIDER | usage::DIAL | usage::WHEEL => unsigned_to_u8(v),
        usage::HAT => normalize_hat(v),
        _ => {}
    }
}

fn synthesize_trigger(event: &mut ControllerEvent, slot: CValue, button: CButton) {
    let data = if event.button(button) { u8::MAX } else { 0 };
    event.set_value(slot, Value::unsigned8(slot.usage(), data));
}

/// Rewrites a generically decoded event into canonical layout.
///
/// Y and Rz are always inverted, whatever their declared range, so the
/// conversion runs once per event: events already marked
/// [`mapped`](ControllerEvent::mapped) are left alone.
pub fn map_values(event: &mut ControllerEvent) {
    if event.mapped {
        return;
    }
    event.num_values = event.num_values.min(MAX_VALUES as u8);

    let declared = event.active_values();
    let have_lt = has_usage(declared, usage::RX);
    let have_rt = has_usage(declared, usage::RY);

    let declared_len = usize::from(event.num_values);
    if declared_len < CValue::COUNT {
        for v in event.values.iter_mut().take(CValue::COUNT).skip(declared_len) {
            *v = Value::default();
        }
        event.num_values = CValue::COUNT as u8;
    }

    let n = usize::from(event.num_values);
    if let Some(values) = event.values.get_mut(..n) {
        settle_canonical_slots(values);
    }
    for v in event.values.iter_mut().take(n) {
        convert(v);
    }
    fill_missing_slots(event);

    if !have_lt {
        synthesize_trigger(event, CValue::TriggerL, CButton::LeftTrigger);
    }
    if !have_rt {
        synthesize_trigger(event, CValue::TriggerR, CButton::RightTrigger);
    }

    event.mapped = true;

    trace!(
        num_values = event.num_values,
        synthesized_lt = !have_lt,
        synthesized_rt = !have_rt,
        "mapped generic values"
    );
}
