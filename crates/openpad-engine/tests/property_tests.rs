//! Every driver behind the hub must survive arbitrary input.

use openpad_engine::{ControllerHub, EngineConfig};
use openpad_hid_common::mock::MockHidDevice;
use proptest::prelude::*;
use std::time::{Duration, Instant};

const DEVICES: [(u16, u16); 6] = [
    (0x057E, 0x2009),
    (0x054C, 0x09CC),
    (0x054C, 0x0CE6),
    (0x045E, 0x0B13),
    (0x045E, 0x028E),
    (0x1234, 0x5678),
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_reports_never_panic_and_stay_in_range(
        device in 0usize..DEVICES.len(),
        reports in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..96), 1..8),
        dedupe in any::<bool>(),
    ) {
        let (vid, pid) = DEVICES[device];
        let mut hub = ControllerHub::new(EngineConfig { dedupe, ..EngineConfig::default() });
        let t0 = Instant::now();
        let id = hub.connect(Box::new(MockHidDevice::new(vid, pid, "prop")), t0);

        for (i, report) in reports.iter().enumerate() {
            let now = t0 + Duration::from_millis(100 * i as u64);
            if let Ok(Some(event)) = hub.handle_report(id, now, report) {
                prop_assert_eq!(event.id, id);
                prop_assert!(usize::from(event.num_values) <= event.values.len());
                let dpad = event.value(openpad_controller::CValue::Dpad);
                if dpad.usage == openpad_controller::usage::HAT {
                    prop_assert!((0..=8).contains(&dpad.data));
                }
            }
        }
    }
}
