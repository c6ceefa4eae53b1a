//! Setup sequence, calibration and rumble refresh driven through a mock
//! device with an injected clock.

use openpad_controller::{CButton, CValue, ControllerProtocol, DriverKind};
use openpad_hid_common::mock::MockHidDevice;
use openpad_hid_nx_protocol::{
    NINTENDO_VENDOR_ID, NxLink, NxProtocol, RUMBLE_ON, SetupStep, product_ids,
};
use std::time::{Duration, Instant};

fn device() -> MockHidDevice {
    MockHidDevice::new(NINTENDO_VENDOR_ID, product_ids::PRO_CONTROLLER, "mock://pro")
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn usb_ack(command: u8) -> Vec<u8> {
    let mut r = vec![0u8; 64];
    r[0] = 0x81;
    r[1] = command;
    r
}

fn subcommand_reply(subcommand: u8) -> Vec<u8> {
    let mut r = vec![0u8; 64];
    r[0] = 0x21;
    r[14] = subcommand;
    r
}

/// SPI reply with every centre at 0x800 and every extent at 0x500.
fn calibration_reply() -> Vec<u8> {
    let mut r = subcommand_reply(0x10);
    let centre = [0x00, 0x08, 0x80];
    let extent = [0x00, 0x05, 0x50];
    let header = [0x3D, 0x60, 0x00, 0x00, 0x12];
    let mut flash = Vec::new();
    flash.extend_from_slice(&extent);
    flash.extend_from_slice(&centre);
    flash.extend_from_slice(&extent);
    flash.extend_from_slice(&centre);
    flash.extend_from_slice(&extent);
    flash.extend_from_slice(&extent);
    r[15..20].copy_from_slice(&header);
    r[20..38].copy_from_slice(&flash);
    r
}

fn centred_full_state(b3: u8) -> Vec<u8> {
    let mut r = vec![0u8; 49];
    r[0] = 0x30;
    r[3] = b3;
    r[6..9].copy_from_slice(&[0x00, 0x08, 0x80]);
    r[9..12].copy_from_slice(&[0x00, 0x08, 0x80]);
    r
}

fn first_bytes(history: &[Vec<u8>]) -> Vec<(u8, u8)> {
    history
        .iter()
        .map(|w| (w.first().copied().unwrap_or(0), w.get(1).copied().unwrap_or(0)))
        .collect()
}

#[test]
fn test_usb_handshake_sequence() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut nx = NxProtocol::new();
    let t0 = Instant::now();

    nx.initialize(t0, &mut dev);
    assert_eq!(nx.kind(), DriverKind::Nx);
    assert_eq!(nx.link(), NxLink::Unknown);

    assert!(nx.handle_report(t0 + ms(5), &usb_ack(0x02), &mut dev).is_none());
    assert_eq!(nx.link(), NxLink::Usb);
    nx.handle_report(t0 + ms(10), &usb_ack(0x03), &mut dev);
    nx.handle_report(t0 + ms(15), &usb_ack(0x02), &mut dev);

    let history = dev.get_write_history();
    assert_eq!(
        first_bytes(&history),
        vec![(0x80, 0x02), (0x80, 0x03), (0x80, 0x02), (0x80, 0x04), (0x01, 0x00)]
    );
    // force-USB gets no reply, so the SPI read follows straight away
    let spi = history.last().ok_or("no writes")?;
    assert_eq!(spi.len(), 64);
    assert_eq!(spi[10], 0x10);
    assert_eq!(&spi[11..16], &[0x3D, 0x60, 0x00, 0x00, 0x12]);
    assert_eq!(nx.setup_step(), SetupStep::Vibration);
    Ok(())
}

#[test]
fn test_silence_means_bluetooth() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut nx = NxProtocol::new();
    let t0 = Instant::now();

    nx.initialize(t0, &mut dev);
    nx.service(t0 + ms(400), &mut dev);
    assert_eq!(nx.link(), NxLink::Unknown);
    assert_eq!(dev.get_write_history().len(), 1);

    nx.service(t0 + ms(600), &mut dev);
    assert_eq!(nx.link(), NxLink::Bluetooth);

    let history = dev.get_write_history();
    assert_eq!(history.len(), 2);
    let spi = history.last().ok_or("no writes")?;
    assert_eq!(spi.len(), 49);
    assert_eq!(spi[0], 0x01);
    assert_eq!(spi[10], 0x10);
    Ok(())
}

#[test]
fn test_state_reports_wait_for_calibration() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut nx = NxProtocol::new();
    let t0 = Instant::now();

    nx.initialize(t0, &mut dev);
    for (i, cmd) in [0x02, 0x03, 0x02].into_iter().enumerate() {
        nx.handle_report(t0 + ms(5 * (i as u64 + 1)), &usb_ack(cmd), &mut dev);
    }

    assert!(nx.handle_report(t0 + ms(20), &centred_full_state(0x01), &mut dev).is_none());

    nx.handle_report(t0 + ms(25), &calibration_reply(), &mut dev);
    assert!(nx.is_calibrated());
    let cal = nx.factory_calibration();
    assert_eq!(cal.lx.center, 0x800);
    assert_eq!(cal.ry.center, 0x800);
    assert_eq!(cal.lx.max, 1152);
    assert_eq!(cal.lx.min, -1152);

    let event = nx
        .handle_report(t0 + ms(30), &centred_full_state(0x01), &mut dev)
        .ok_or("parse failed")?;
    assert_eq!(event.pressed_buttons().collect::<Vec<_>>(), vec![CButton::X.index()]);
    assert_eq!(event.value(CValue::Dpad).data, 8);
    assert_eq!(event.value(CValue::TriggerL).data, 0);
    Ok(())
}

#[test]
fn test_failed_write_is_retried_after_timeout() {
    let mut dev = device();
    let mut nx = NxProtocol::new();
    let t0 = Instant::now();

    nx.initialize(t0, &mut dev);
    dev.set_fail_writes(true);
    nx.service(t0 + ms(600), &mut dev);
    assert_eq!(nx.link(), NxLink::Bluetooth);
    assert_eq!(nx.setup_step(), SetupStep::Calibration);

    dev.set_fail_writes(false);
    nx.service(t0 + ms(700), &mut dev);
    assert_eq!(dev.get_write_history().len(), 1);

    nx.service(t0 + ms(1200), &mut dev);
    assert_eq!(dev.get_write_history().len(), 2);
    assert_eq!(nx.setup_step(), SetupStep::Vibration);
}

#[test]
fn test_bluetooth_setup_completes_and_rumble_refreshes() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = device();
    let mut nx = NxProtocol::new().with_player_lights(0x03);
    let t0 = Instant::now();

    nx.initialize(t0, &mut dev);
    nx.service(t0 + ms(600), &mut dev);
    nx.handle_report(t0 + ms(610), &calibration_reply(), &mut dev);
    for (i, sub) in [0x48, 0x03, 0x38, 0x30].into_iter().enumerate() {
        nx.handle_report(t0 + ms(620 + 10 * i as u64), &subcommand_reply(sub), &mut dev);
    }
    assert_eq!(nx.setup_step(), SetupStep::Done);

    let history = dev.get_write_history();
    let subs: Vec<u8> = history.iter().skip(1).map(|w| w[10]).collect();
    assert_eq!(subs, vec![0x10, 0x48, 0x03, 0x38, 0x30]);
    // report mode: simple over Bluetooth
    assert_eq!(history[3][11], 0x3F);
    assert_eq!(history[5][11], 0x03);

    dev.clear_write_history();
    nx.set_rumble(t0 + ms(700), 0x4000, 0, &mut dev);
    let history = dev.get_write_history();
    let write = history.first().ok_or("rumble not sent")?;
    assert_eq!(write[10], 0x48);
    assert_eq!(&write[2..6], &RUMBLE_ON);
    assert_eq!(nx.rumble_patterns()[1], [0x00, 0x01, 0x40, 0x40]);

    // a held motor is refreshed once the device is ready again
    nx.handle_report(t0 + ms(710), &subcommand_reply(0x48), &mut dev);
    assert_eq!(dev.get_write_history().len(), 1);
    nx.service(t0 + ms(1300), &mut dev);
    assert_eq!(dev.get_write_history().len(), 2);
    Ok(())
}
