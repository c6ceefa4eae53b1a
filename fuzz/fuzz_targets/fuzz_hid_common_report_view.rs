//! Fuzzes the bounds-checked report view and the Bluetooth CRC trailer.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_hid_common_report_view
#![no_main]
use libfuzzer_sys::fuzz_target;
use openpad_hid_common::{ReportView, clamp_hat, verify_bluetooth_report};

fuzz_target!(|data: &[u8]| {
    let view = ReportView::new(data);
    for offset in [0usize, 1, 3, 7, 63, usize::MAX] {
        let _ = view.u8_at(offset);
        let _ = view.u16_le_at(offset);
        let _ = view.i16_le_at(offset);
        let _ = view.bytes(offset, 4);
        let _ = view.offset(offset);
    }
    let _ = verify_bluetooth_report(data);
    if let Some(&b) = data.first() {
        assert!(clamp_hat(b) <= 8);
    }
});
