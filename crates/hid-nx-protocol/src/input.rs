//! Switch input report parsing.
//!
//! Buttons are mapped by position, so the face button on the left of the
//! diamond is canonical X regardless of the label printed on it.

use crate::calibration::{AxisCalibration, StickCalibration, parse_spi_reply};
use crate::ids::{report_ids, subcommands};
use openpad_controller::{CButton, CValue, ControllerEvent, DriverKind, Value, signed_to_signed16, usage};
use openpad_hid_common::{ReportView, clamp_hat, dpad_from_bits};

/// Minimum length of a full or simple state report.
pub const STATE_REPORT_MIN_LEN: usize = 12;

/// Offset of the subcommand id echoed in a reply.
pub const REPLY_SUBCOMMAND_OFFSET: usize = 14;

/// Offset of the subcommand reply payload.
pub const REPLY_PAYLOAD_OFFSET: usize = 15;

const NUM_BUTTONS: u8 = 14;
const NUM_VALUES: u8 = 7;

/// What an incoming report means for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NxReport {
    FullState,
    SimpleState,
    /// A USB command was acknowledged.
    UsbAck,
    /// A subcommand reply; carries the factory calibration when it answers
    /// the SPI read.
    SubcommandReply {
        subcommand: u8,
        calibration: Option<StickCalibration>,
    },
}

/// Classifies a raw report. Unknown or short reports give `None`.
pub fn classify_report(data: &[u8]) -> Option<NxReport> {
    let view = ReportView::new(data);
    match view.report_id()? {
        report_ids::FULL_STATE => Some(NxReport::FullState),
        report_ids::SIMPLE_STATE => Some(NxReport::SimpleState),
        report_ids::USB_REPLY => {
            let b1 = view.u8_or_zero(1);
            let b2 = view.u8_or_zero(2);
            (b1 == 0x02 || b1 == 0x03 || b2 == 0x04).then_some(NxReport::UsbAck)
        }
        report_ids::SUBCOMMAND_REPLY => {
            let subcommand = view.u8_at(REPLY_SUBCOMMAND_OFFSET)?;
            let calibration = if subcommand == subcommands::SPI_FLASH_READ {
                view.offset(REPLY_PAYLOAD_OFFSET)
                    .and_then(|payload| parse_spi_reply(payload.as_bytes()))
            } else {
                None
            };
            Some(NxReport::SubcommandReply {
                subcommand,
                calibration,
            })
        }
        _ => None,
    }
}

/// Builds a stick value from a centred sample, widening the tracked range.
fn stick_value(code: u16, sample: i32, axis: &mut AxisCalibration) -> Value {
    axis.expand(sample);
    let clamp = |v: i32| v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    let mut value = Value::new(code, clamp(sample), clamp(axis.min), clamp(axis.max));
    signed_to_signed16(&mut value);
    value
}

fn set_trigger_values(event: &mut ControllerEvent) {
    let lt = if event.button(CButton::LeftTrigger) { u8::MAX } else { 0 };
    let rt = if event.button(CButton::RightTrigger) { u8::MAX } else { 0 };
    event.set_value(CValue::TriggerL, Value::unsigned8(usage::RX, lt));
    event.set_value(CValue::TriggerR, Value::unsigned8(usage::RY, rt));
}

fn dpad_value(octant: u8) -> Value {
    Value::new(usage::HAT, i16::from(octant), 0, 8)
}

/// Parses a `0x30` full state report against the factory calibration.
pub fn parse_full_state(data: &[u8], cal: &mut StickCalibration) -> Option<ControllerEvent> {
    let view = ReportView::require(data, STATE_REPORT_MIN_LEN)?;
    if view.report_id()? != report_ids::FULL_STATE {
        return None;
    }

    let mut event = ControllerEvent::new(DriverKind::Nx);
    event.num_buttons = NUM_BUTTONS;
    event.num_values = NUM_VALUES;

    let buttons = [
        (CButton::X, view.bit(3, 0x01)),
        (CButton::A, view.bit(3, 0x04)),
        (CButton::B, view.bit(3, 0x08)),
        (CButton::Y, view.bit(3, 0x02)),
        (CButton::LeftShoulder, view.bit(5, 0x40)),
        (CButton::RightShoulder, view.bit(3, 0x40)),
        (CButton::LeftTrigger, view.bit(5, 0x80)),
        (CButton::RightTrigger, view.bit(3, 0x80)),
        (CButton::Back, view.bit(4, 0x01)),
        (CButton::Start, view.bit(4, 0x02)),
        (CButton::LeftThumb, view.bit(4, 0x08)),
        (CButton::RightThumb, view.bit(4, 0x04)),
        (CButton::Guide, view.bit(4, 0x10)),
        (CButton::Touchpad, view.bit(4, 0x20)),
    ];
    for (button, pressed) in buttons {
        event.set_button(button, pressed);
    }

    let byte = |offset: usize| i32::from(view.u8_or_zero(offset));
    let lx = (byte(6) | ((byte(7) & 0x0F) << 8)) - cal.lx.center;
    let ly = ((byte(7) >> 4) | (byte(8) << 4)) - cal.ly.center;
    let rx = (byte(9) | ((byte(10) & 0x0F) << 8)) - cal.rx.center;
    let ry = ((byte(10) >> 4) | (byte(11) << 4)) - cal.ry.center;

    event.set_value(CValue::ThumbLx, stick_value(usage::X, lx, &mut cal.lx));
    event.set_value(CValue::ThumbLy, stick_value(usage::Y, ly, &mut cal.ly));
    event.set_value(CValue::ThumbRx, stick_value(usage::Z, rx, &mut cal.rx));
    event.set_value(CValue::ThumbRy, stick_value(usage::RZ, ry, &mut cal.ry));

    set_trigger_values(&mut event);

    let up = view.bit(5, 0x02);
    let down = view.bit(5, 0x01);
    let left = view.bit(5, 0x08);
    let right = view.bit(5, 0x04);
    event.set_value(CValue::Dpad, dpad_value(dpad_from_bits(up, right, down, left)));

    Some(event)
}

/// Truncates to a 16-bit sample, wrapping like the device's own arithmetic.
fn wrap16(v: i32) -> i32 {
    i32::from(v as i16)
}

/// Parses a `0x3F` simple HID mode report.
///
/// Sticks are 16-bit with a nominal centre of `0x8000`; Y grows downwards
/// and is negated. Centred samples are 16-bit, so a Y reading of exactly 0
/// wraps to the bottom of the range.
pub fn parse_simple_state(data: &[u8], cal: &mut StickCalibration) -> Option<ControllerEvent> {
    let view = ReportView::require(data, STATE_REPORT_MIN_LEN)?;
    if view.report_id()? != report_ids::SIMPLE_STATE {
        return None;
    }

    let mut event = ControllerEvent::new(DriverKind::Nx);
    event.num_buttons = NUM_BUTTONS;
    event.num_values = NUM_VALUES;

    let buttons = [
        (CButton::X, view.bit(1, 0x04)),
        (CButton::A, view.bit(1, 0x01)),
        (CButton::B, view.bit(1, 0x02)),
        (CButton::Y, view.bit(1, 0x08)),
        (CButton::LeftShoulder, view.bit(1, 0x10)),
        (CButton::RightShoulder, view.bit(1, 0x20)),
        (CButton::LeftTrigger, view.bit(1, 0x40)),
        (CButton::RightTrigger, view.bit(1, 0x80)),
        (CButton::Back, view.bit(2, 0x01)),
        (CButton::Start, view.bit(2, 0x02)),
        (CButton::LeftThumb, view.bit(2, 0x04)),
        (CButton::RightThumb, view.bit(2, 0x08)),
        (CButton::Guide, view.bit(2, 0x10)),
        (CButton::Touchpad, view.bit(2, 0x20)),
    ];
    for (button, pressed) in buttons {
        event.set_button(button, pressed);
    }

    let raw = |offset: usize| i32::from(view.u16_le_at(offset).unwrap_or(0x8000));
    let lx = wrap16(raw(4) - cal.lx.center);
    let ly = wrap16(-(raw(6) - cal.ly.center));
    let rx = wrap16(raw(8) - cal.rx.center);
    let ry = wrap16(-(raw(10) - cal.ry.center));

    event.set_value(CValue::ThumbLx, stick_value(usage::X, lx, &mut cal.lx));
    event.set_value(CValue::ThumbLy, stick_value(usage::Y, ly, &mut cal.ly));
    event.set_value(CValue::ThumbRx, stick_value(usage::Z, rx, &mut cal.rx));
    event.set_value(CValue::ThumbRy, stick_value(usage::RZ, ry, &mut cal.ry));

    set_trigger_values(&mut event);
    event.set_value(CValue::Dpad, dpad_value(clamp_hat(view.u8_or_zero(3))));

    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated() -> StickCalibration {
        let axis = AxisCalibration::new(-1000, 2048, 1000);
        StickCalibration {
            lx: axis,
            ly: axis,
            rx: axis,
            ry: axis,
        }
    }

    /// Full state report with all sticks at 2048 (0x800).
    fn centred_full_report() -> [u8; 49] {
        let mut d = [0u8; 49];
        d[0] = 0x30;
        // 0x800 | 0x800 packed: [0x00, 0x08, 0x80]
        d[6..9].copy_from_slice(&[0x00, 0x08, 0x80]);
        d[9..12].copy_from_slice(&[0x00, 0x08, 0x80]);
        d
    }

    #[test]
    fn test_full_state_x_only() -> Result<(), Box<dyn std::error::Error>> {
        let mut d = centred_full_report();
        d[3] = 0x01;
        let mut cal = calibrated();
        let event = parse_full_state(&d, &mut cal).ok_or("parse failed")?;

        assert!(event.button(CButton::X));
        assert_eq!(event.pressed_buttons().collect::<Vec<_>>(), vec![0]);
        assert_eq!(event.num_buttons, 14);
        assert_eq!(event.num_values, 7);
        assert_eq!(event.value(CValue::ThumbLx).data, 0);
        assert_eq!(event.value(CValue::ThumbRy).data, 0);
        assert_eq!(event.value(CValue::Dpad).data, 8);
        Ok(())
    }

    #[test]
    fn test_full_state_stick_extremes() -> Result<(), Box<dyn std::error::Error>> {
        let mut d = centred_full_report();
        // lx = 0x800 + 1000 = 0xBE8, ly = 0x800 - 1000 = 0x418
        d[6] = 0xE8;
        d[7] = 0x8B;
        d[8] = 0x41;
        let mut cal = calibrated();
        let event = parse_full_state(&d, &mut cal).ok_or("parse failed")?;

        assert_eq!(event.value(CValue::ThumbLx).data, i16::MAX);
        assert_eq!(event.value(CValue::ThumbLy).data, i16::MIN);
        Ok(())
    }

    #[test]
    fn test_full_state_range_expands() -> Result<(), Box<dyn std::error::Error>> {
        let mut d = centred_full_report();
        // rx = 0x800 + 1500 = 0xDDC
        d[9] = 0xDC;
        d[10] = 0x8D;
        let mut cal = calibrated();
        let event = parse_full_state(&d, &mut cal).ok_or("parse failed")?;

        assert_eq!(cal.rx.max, 1500);
        assert_eq!(event.value(CValue::ThumbRx).data, i16::MAX);
        Ok(())
    }

    #[test]
    fn test_full_state_triggers_and_dpad() -> Result<(), Box<dyn std::error::Error>> {
        let mut d = centred_full_report();
        d[3] = 0x80; // ZR
        d[5] = 0x02 | 0x04 | 0x80; // up + right + ZL
        let mut cal = calibrated();
        let event = parse_full_state(&d, &mut cal).ok_or("parse failed")?;

        assert_eq!(event.value(CValue::TriggerL).data, 255);
        assert_eq!(event.value(CValue::TriggerR).data, 255);
        assert_eq!(event.value(CValue::Dpad).data, 1);
        Ok(())
    }

    #[test]
    fn test_simple_state() -> Result<(), Box<dyn std::error::Error>> {
        let mut d = [0u8; 12];
        d[0] = 0x3F;
        d[1] = 0x01; // bottom face button
        d[2] = 0x10; // home
        d[3] = 0x0F; // out of range hat
        for offset in [4, 6, 8, 10] {
            d[offset..offset + 2].copy_from_slice(&0x8000u16.to_le_bytes());
        }
        d[6..8].copy_from_slice(&0x0001u16.to_le_bytes()); // ly all the way up

        let mut cal = StickCalibration::simple_default();
        let event = parse_simple_state(&d, &mut cal).ok_or("parse failed")?;

        assert!(event.button(CButton::A));
        assert!(event.button(CButton::Guide));
        assert_eq!(event.pressed_buttons().count(), 2);
        assert_eq!(event.value(CValue::ThumbLx).data, 0);
        assert_eq!(event.value(CValue::ThumbLy).data, i16::MAX);
        assert_eq!(event.value(CValue::Dpad).data, 8);
        Ok(())
    }

    #[test]
    fn test_simple_state_y_wraps_at_sixteen_bits() -> Result<(), Box<dyn std::error::Error>> {
        let mut d = [0u8; 12];
        d[0] = 0x3F;
        for offset in [4, 6, 8, 10] {
            d[offset..offset + 2].copy_from_slice(&0x8000u16.to_le_bytes());
        }
        d[10..12].copy_from_slice(&0x0000u16.to_le_bytes());

        let mut cal = StickCalibration::simple_default();
        let event = parse_simple_state(&d, &mut cal).ok_or("parse failed")?;

        // -(0 - 0x8000) = 0x8000 does not fit and comes back as i16::MIN
        assert_eq!(cal.ry.min, i32::from(i16::MIN));
        assert_eq!(event.value(CValue::ThumbRy).data, i16::MIN);
        assert_eq!(event.value(CValue::ThumbLy).data, 0);
        Ok(())
    }

    #[test]
    fn test_wrap16() {
        assert_eq!(wrap16(0x8000), -0x8000);
        assert_eq!(wrap16(-0x8000), -0x8000);
        assert_eq!(wrap16(0x7FFF), 0x7FFF);
        assert_eq!(wrap16(-5), -5);
    }

    #[test]
    fn test_short_and_foreign_reports_are_ignored() {
        let mut cal = calibrated();
        assert!(parse_full_state(&[0x30; 11], &mut cal).is_none());
        assert!(parse_full_state(&[0x3F; 12], &mut cal).is_none());
        assert!(parse_simple_state(&[0x3F; 5], &mut cal).is_none());
        assert!(classify_report(&[]).is_none());
        assert!(classify_report(&[0x55, 0x00]).is_none());
    }

    #[test]
    fn test_classify_usb_ack() {
        assert_eq!(classify_report(&[0x81, 0x02]), Some(NxReport::UsbAck));
        assert_eq!(classify_report(&[0x81, 0x03]), Some(NxReport::UsbAck));
        assert_eq!(classify_report(&[0x81, 0x01, 0x04]), Some(NxReport::UsbAck));
        assert_eq!(classify_report(&[0x81, 0x01, 0x00]), None);
    }

    #[test]
    fn test_classify_non_spi_reply() {
        let mut d = [0u8; 20];
        d[0] = 0x21;
        d[14] = 0x48;
        assert_eq!(
            classify_report(&d),
            Some(NxReport::SubcommandReply {
                subcommand: 0x48,
                calibration: None
            })
        );
    }
}
