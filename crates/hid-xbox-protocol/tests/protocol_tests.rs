//! Xbox rumble scheduling and decoding through a mock device.

use openpad_controller::{CButton, CValue, ControllerProtocol, DriverKind};
use openpad_hid_common::mock::MockHidDevice;
use openpad_hid_xbox_protocol::{
    MICROSOFT_VENDOR_ID, XboxFirmware, XboxInputState, XboxProtocol, XboxWiredProtocol,
    build_rumble_report, parse_input_report, parse_wired_report, product_ids,
};
use proptest::prelude::*;
use std::time::{Duration, Instant};

fn device() -> MockHidDevice {
    MockHidDevice::new(MICROSOFT_VENDOR_ID, product_ids::XBOX_ONE_S_BT, "mock://xbox")
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_rumble_report_bytes() {
    let report = build_rumble_report(0xFFFF, 0x4000);
    let hex: Vec<String> = report.iter().map(|b| format!("{:02X}", b)).collect();
    insta::assert_snapshot!(hex.join(" "), @"03 0F 00 00 FF 40 FF 00 00");
}

#[test]
fn test_initialize_stops_motors() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut xbox = XboxProtocol::new();
    xbox.initialize(Instant::now(), &mut dev);
    let history = dev.get_write_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.first().ok_or("no write")?.as_slice(), &build_rumble_report(0, 0));
    Ok(())
}

#[test]
fn test_identical_requests_within_debounce_write_once() {
    let mut dev = device();
    let mut xbox = XboxProtocol::new();
    let t0 = Instant::now();
    xbox.initialize(t0, &mut dev);

    xbox.set_rumble(t0 + ms(100), 0x8000, 0x8000, &mut dev);
    xbox.set_rumble(t0 + ms(120), 0x8000, 0x8000, &mut dev);
    assert_eq!(dev.get_write_history().len(), 2);
}

#[test]
fn test_changed_request_waits_for_debounce() {
    let mut dev = device();
    let mut xbox = XboxProtocol::new();
    let t0 = Instant::now();
    xbox.initialize(t0, &mut dev);

    xbox.set_rumble(t0 + ms(10), 0x1000, 0, &mut dev);
    assert_eq!(dev.get_write_history().len(), 1);
    assert_eq!(xbox.requested_rumble(), (0x1000, 0));

    xbox.service(t0 + ms(49), &mut dev);
    assert_eq!(dev.get_write_history().len(), 1);
    xbox.service(t0 + ms(50), &mut dev);
    let history = dev.get_write_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1][4], 0x10);
}

#[test]
fn test_running_motor_is_refreshed() {
    let mut dev = device();
    let mut xbox = XboxProtocol::new();
    let t0 = Instant::now();
    xbox.initialize(t0, &mut dev);
    xbox.set_rumble(t0 + ms(100), 0, 0xFFFF, &mut dev);
    assert_eq!(dev.get_write_history().len(), 2);

    xbox.service(t0 + ms(1500), &mut dev);
    assert_eq!(dev.get_write_history().len(), 2);
    xbox.service(t0 + ms(2100), &mut dev);
    assert_eq!(dev.get_write_history().len(), 3);

    xbox.set_rumble(t0 + ms(2200), 0, 0, &mut dev);
    xbox.service(t0 + ms(9000), &mut dev);
    assert_eq!(dev.get_write_history().len(), 4);
}

#[test]
fn test_failed_write_is_retried() {
    let mut dev = device();
    let mut xbox = XboxProtocol::new();
    let t0 = Instant::now();
    dev.set_fail_writes(true);
    xbox.initialize(t0, &mut dev);
    dev.set_fail_writes(false);
    xbox.service(t0 + ms(60), &mut dev);
    assert_eq!(dev.get_write_history().len(), 1);
}

#[test]
fn test_guide_report_through_protocol() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut xbox = XboxProtocol::new();
    let t0 = Instant::now();
    assert!(xbox.handle_report(t0, &[0x02, 0x01], &mut dev).is_none());
    assert_eq!(xbox.firmware(), XboxFirmware::V2);

    let mut report = [0u8; 17];
    report[0] = 0x01;
    report[15] = 0x10 | 0x08;
    let event = xbox
        .handle_report(t0, &report, &mut dev)
        .ok_or("parse failed")?;
    assert_eq!(event.driver, DriverKind::Xbox);
    assert!(event.button(CButton::Guide));
    assert!(event.button(CButton::Start));
    Ok(())
}

#[test]
fn test_legacy_pad_reports_v1() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut xbox = XboxProtocol::new();
    let t0 = Instant::now();
    assert_eq!(xbox.firmware(), XboxFirmware::Unknown);

    let mut report = [0u8; 17];
    report[0] = 0x01;
    xbox.handle_report(t0, &report, &mut dev).ok_or("parse failed")?;
    assert_eq!(xbox.firmware(), XboxFirmware::V1);

    report[15] = 0x10;
    let event = xbox
        .handle_report(t0, &report, &mut dev)
        .ok_or("parse failed")?;
    assert_eq!(xbox.firmware(), XboxFirmware::V2);
    assert!(event.button(CButton::Guide));
    Ok(())
}

#[test]
fn test_wired_protocol_decodes_without_state() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = MockHidDevice::new(MICROSOFT_VENDOR_ID, product_ids::XBOX_360_WIRED, "mock://360");
    let mut pad = XboxWiredProtocol;
    let t0 = Instant::now();
    pad.initialize(t0, &mut dev);
    pad.set_rumble(t0, 0xFFFF, 0xFFFF, &mut dev);
    assert!(dev.get_write_history().is_empty());

    let mut report = [0u8; 14];
    report[2] = 0x02;
    report[4] = 0x80;
    let event = pad.handle_report(t0, &report, &mut dev).ok_or("parse failed")?;
    assert_eq!(event.driver, DriverKind::XboxW);
    assert_eq!(event.num_buttons, 13);
    assert_eq!(event.value(CValue::Dpad).data, 4);
    assert_eq!(event.value(CValue::TriggerL).data, 0x80);
    assert!(event.button(CButton::LeftTrigger));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_bluetooth_decode_is_total(data in proptest::collection::vec(any::<u8>(), 0..40)) {
        let mut state = XboxInputState::default();
        if let Some(event) = parse_input_report(&data, &mut state) {
            prop_assert!(event.active_values().iter().all(|v| v.in_range()));
        }
    }

    #[test]
    fn prop_wired_decode_is_total(data in proptest::collection::vec(any::<u8>(), 0..40)) {
        if let Some(event) = parse_wired_report(&data) {
            prop_assert!(event.active_values().iter().all(|v| v.in_range()));
            prop_assert!(event.value(CValue::Dpad).data <= 8);
        }
    }
}
