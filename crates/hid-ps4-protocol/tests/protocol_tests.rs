//! DualShock 4 connection handling and output reports through a mock device.

use openpad_controller::{CButton, CValue, ControllerProtocol, DriverKind};
use openpad_hid_common::mock::MockHidDevice;
use openpad_hid_common::verify_bluetooth_report;
use openpad_hid_ps4_protocol::{Ps4Protocol, SONY_VENDOR_ID, parse_input_report, product_ids};
use proptest::prelude::*;
use std::time::Instant;

fn device() -> MockHidDevice {
    MockHidDevice::new(SONY_VENDOR_ID, product_ids::DUALSHOCK4_V2, "mock://ds4")
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_usb_when_serial_is_readable() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut serial = vec![0x12, 0xAA, 0xBB, 0xCC];
    serial.resize(65, 0);
    dev.set_feature_reply(Some(serial));

    let mut ds4 = Ps4Protocol::new();
    ds4.initialize(Instant::now(), &mut dev);
    assert!(!ds4.is_bluetooth());
    assert_eq!(ds4.kind(), DriverKind::Ps4);

    let history = dev.get_write_history();
    let lights = history.first().ok_or("no lightbar write")?;
    insta::assert_snapshot!(hex(&lights[..10]), @"05 07 00 00 00 00 00 00 40 00");
    assert_eq!(lights.len(), 32);
    Ok(())
}

#[test]
fn test_bluetooth_when_serial_read_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut ds4 = Ps4Protocol::new().with_lightbar([0x10, 0x20, 0x30]);
    ds4.initialize(Instant::now(), &mut dev);
    assert!(ds4.is_bluetooth());

    dev.clear_write_history();
    ds4.set_rumble(Instant::now(), 0x4000, 0xFFFF, &mut dev);
    let history = dev.get_write_history();
    let report = history.first().ok_or("no rumble write")?;
    assert_eq!(report.len(), 78);
    assert_eq!(&report[..11], &[0x11, 0xC4, 0x00, 0x03, 0, 0, 0xFF, 0x40, 0x10, 0x20, 0x30]);
    assert!(verify_bluetooth_report(report));
    Ok(())
}

#[test]
fn test_bluetooth_when_serial_is_empty() {
    let mut dev = device();
    dev.set_feature_reply(Some(vec![0x12; 1]));
    let mut ds4 = Ps4Protocol::new();
    ds4.initialize(Instant::now(), &mut dev);
    assert!(ds4.is_bluetooth());
}

#[test]
fn test_write_failure_is_not_fatal() {
    let mut dev = device();
    dev.set_fail_writes(true);
    let mut ds4 = Ps4Protocol::new();
    ds4.initialize(Instant::now(), &mut dev);
    ds4.set_rumble(Instant::now(), 1, 1, &mut dev);
    assert!(dev.get_write_history().is_empty());
}

#[test]
fn test_decode_through_protocol() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut ds4 = Ps4Protocol::new();
    let mut report = vec![0u8; 64];
    report[0] = 0x01;
    report[5] = 0x10 | 0x06; // X, hat left
    report[6] = 0x01 | 0x20; // L1, Options
    let event = ds4
        .handle_report(Instant::now(), &report, &mut dev)
        .ok_or("parse failed")?;
    assert!(event.button(CButton::X));
    assert!(event.button(CButton::LeftShoulder));
    assert!(event.button(CButton::Start));
    assert_eq!(event.pressed_buttons().count(), 3);
    assert_eq!(event.value(CValue::Dpad).data, 6);
    assert_eq!(event.num_buttons, 14);
    assert_eq!(event.num_values, 7);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_decode_is_total(data in proptest::collection::vec(any::<u8>(), 0..100)) {
        if let Some(event) = parse_input_report(&data) {
            for value in event.active_values() {
                prop_assert!(value.in_range());
            }
        }
    }
}
