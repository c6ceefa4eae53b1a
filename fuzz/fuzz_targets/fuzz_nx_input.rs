//! Fuzzes the Switch report classifier, state decoders and SPI calibration
//! parser.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_nx_input
#![no_main]
use libfuzzer_sys::fuzz_target;
use openpad_hid_nx_protocol::{
    StickCalibration, classify_report, parse_factory_calibration, parse_full_state,
    parse_simple_state,
};

fuzz_target!(|data: &[u8]| {
    let _ = classify_report(data);
    let _ = parse_factory_calibration(data);

    let mut cal = parse_factory_calibration(data).unwrap_or_default();
    if let Some(event) = parse_full_state(data, &mut cal) {
        assert!(event.active_values().iter().all(|v| v.in_range()));
    }

    let mut simple = StickCalibration::default();
    if let Some(event) = parse_simple_state(data, &mut simple) {
        assert!(event.active_values().iter().all(|v| v.in_range()));
    }
});
