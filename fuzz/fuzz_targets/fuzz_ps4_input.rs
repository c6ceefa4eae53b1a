//! Fuzzes the DualShock 4 input parser.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_ps4_input
#![no_main]
use libfuzzer_sys::fuzz_target;
use openpad_hid_ps4_protocol::{parse_input_report, state_block};

fuzz_target!(|data: &[u8]| {
    let _ = state_block(data);
    if let Some(event) = parse_input_report(data) {
        assert!(event.active_values().iter().all(|v| v.in_range()));
    }
});
