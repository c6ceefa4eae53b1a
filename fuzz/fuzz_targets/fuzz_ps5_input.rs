//! Fuzzes the DualSense layout detection and input parser.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_ps5_input
#![no_main]
use libfuzzer_sys::fuzz_target;
use openpad_hid_ps5_protocol::{layout_for, parse_input_report};

fuzz_target!(|data: &[u8]| {
    let layout = layout_for(data);
    let event = parse_input_report(data);
    assert_eq!(layout.is_some(), event.is_some());
    if let Some(event) = event {
        assert!(event.active_values().iter().all(|v| v.in_range()));
    }
});
