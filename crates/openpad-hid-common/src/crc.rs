//! CRC32 trailer for Bluetooth HID output reports.
//!
//! Sony controllers reject Bluetooth output reports unless the last four
//! bytes carry a CRC32 (IEEE, reflected polynomial `0xEDB88320`) computed over
//! the HID transaction header byte `0xA2` followed by the report body.

use crate::{HidCommonError, HidCommonResult};

/// HIDP `DATA | OUTPUT` transaction header that seeds the checksum.
pub const BT_OUTPUT_HEADER: u8 = 0xA2;

/// Length of the checksum trailer.
pub const CRC_TRAILER_LEN: usize = 4;

/// Plain IEEE CRC32.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC32 of `BT_OUTPUT_HEADER` followed by `body`.
pub fn bluetooth_output_crc(body: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[BT_OUTPUT_HEADER]);
    hasher.update(body);
    hasher.finalize()
}

/// Computes the checksum over everything but the trailer and stores it
/// little-endian in the last four bytes of `report`.
///
/// # Errors
///
/// Returns [`HidCommonError::InvalidReport`] if `report` is too short to
/// hold a trailer.
pub fn seal_bluetooth_report(report: &mut [u8]) -> HidCommonResult<u32> {
    let body_len = report
        .len()
        .checked_sub(CRC_TRAILER_LEN)
        .ok_or_else(|| HidCommonError::InvalidReport("report shorter than CRC trailer".into()))?;
    let (body, trailer) = report.split_at_mut(body_len);
    let crc = bluetooth_output_crc(body);
    trailer.copy_from_slice(&crc.to_le_bytes());
    Ok(crc)
}

/// True when the trailer of `report` matches its body.
pub fn verify_bluetooth_report(report: &[u8]) -> bool {
    let Some(body_len) = report.len().checked_sub(CRC_TRAILER_LEN) else {
        return false;
    };
    let (body, trailer) = report.split_at(body_len);
    trailer == bluetooth_output_crc(body).to_le_bytes()
}
