//! Suppression of repeated controller events.
//!
//! Sticks jitter by a few counts even when untouched. Before comparing with
//! the previous event for the same controller, stick values inside the dead
//! zone snap to zero and the lowest bit is dropped.

use crate::event::{CValue, ControllerEvent};
use std::collections::HashMap;

pub const DEFAULT_STICK_DEADZONE: u16 = 2000;

const STICKS: [CValue; 4] = [
    CValue::ThumbLx,
    CValue::ThumbLy,
    CValue::ThumbRx,
    CValue::ThumbRy,
];

/// Dead zone plus one bit of precision loss; the extremes are preserved.
pub fn clean_stick_value(value: i16, deadzone: u16) -> i16 {
    if value.unsigned_abs() < deadzone {
        0
    } else if value == i16::MIN || value == i16::MAX {
        value
    } else {
        value & !1
    }
}

#[derive(Debug, Clone)]
pub struct EventDeduper {
    deadzone: u16,
    last: HashMap<u32, ControllerEvent>,
}

impl Default for EventDeduper {
    fn default() -> Self {
        Self::new(DEFAULT_STICK_DEADZONE)
    }
}

impl EventDeduper {
    pub fn new(deadzone: u16) -> Self {
        Self {
            deadzone,
            last: HashMap::new(),
        }
    }

    /// Cleans the sticks of `event` in place and reports whether it differs
    /// from the previous event with the same id.
    pub fn changed(&mut self, event: &mut ControllerEvent) -> bool {
        for slot in STICKS {
            if let Some(v) = event.values.get_mut(slot.index()) {
                v.data = clean_stick_value(v.data, self.deadzone);
            }
        }

        let changed = self.last.get(&event.id).is_none_or(|prev| {
            prev.buttons != event.buttons
                || prev.num_values != event.num_values
                || prev.active_values() != event.active_values()
        });
        self.last.insert(event.id, *event);
        changed
    }

    /// Drops the history of a disconnected controller.
    pub fn forget(&mut self, id: u32) {
        self.last.remove(&id);
    }

    pub fn tracked(&self) -> usize {
        self.last.len()
    }
}
