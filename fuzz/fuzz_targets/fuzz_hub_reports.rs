//! Drives every driver through the hub with arbitrary report streams.
//!
//! The first byte picks the device, the rest is split into reports on
//! `0xFF` separators.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_hub_reports
#![no_main]
use libfuzzer_sys::fuzz_target;
use openpad_engine::{ControllerHub, EngineConfig};
use openpad_hid_common::mock::MockHidDevice;
use std::time::{Duration, Instant};

const DEVICES: [(u16, u16); 6] = [
    (0x057E, 0x2009),
    (0x054C, 0x09CC),
    (0x054C, 0x0CE6),
    (0x045E, 0x0B13),
    (0x045E, 0x028E),
    (0x1234, 0x5678),
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let (vid, pid) = DEVICES[usize::from(selector) % DEVICES.len()];
    let pad = MockHidDevice::new(vid, pid, "fuzz");
    let mut hub = ControllerHub::new(EngineConfig {
        dedupe: selector & 0x80 != 0,
        ..EngineConfig::default()
    });
    let t0 = Instant::now();
    let id = hub.connect(Box::new(pad.clone()), t0);

    for (i, report) in rest.split(|&b| b == 0xFF).enumerate() {
        pad.queue_read(report.to_vec());
        let now = t0 + Duration::from_millis(40 * i as u64);
        for event in hub.poll(now) {
            assert_eq!(event.id, id);
        }
        let _ = hub.rumble(id, now, u16::from(selector) << 8, 0);
    }
});
