//! Fuzzes the Xbox Bluetooth and wired input parsers, plus the rumble
//! encoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_xbox_input
#![no_main]
use libfuzzer_sys::fuzz_target;
use openpad_hid_xbox_protocol::{
    XboxInputState, build_rumble_report, parse_input_report, parse_wired_report,
};

fuzz_target!(|data: &[u8]| {
    let mut state = XboxInputState::default();
    for chunk in data.chunks(17) {
        let _ = parse_input_report(chunk, &mut state);
    }
    let _ = parse_input_report(data, &mut state);
    let _ = parse_wired_report(data);

    if let [a, b, c, d, ..] = *data {
        let _ = build_rumble_report(u16::from_le_bytes([a, b]), u16::from_le_bytes([c, d]));
    }
});
