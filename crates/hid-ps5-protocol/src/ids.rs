//! DualSense identifiers and report ids.

#![deny(static_mut_refs)]

pub const SONY_VENDOR_ID: u16 = 0x054C;

pub mod product_ids {
    pub const DUALSENSE: u16 = 0x0CE6;
    pub const DUALSENSE_EDGE: u16 = 0x0DF2;
}

pub mod report_ids {
    /// USB input, and the reduced Bluetooth report before the priming write.
    pub const SIMPLE_INPUT: u8 = 0x01;
    /// Bluetooth full input report.
    pub const BT_INPUT: u8 = 0x31;
    pub const USB_OUTPUT: u8 = 0x02;
    pub const BT_OUTPUT: u8 = 0x31;
}

/// USB input report size.
pub const USB_INPUT_LEN: usize = 64;

/// Bluetooth full input report size.
pub const BT_INPUT_LEN: usize = 78;

pub fn is_ps5_product(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == SONY_VENDOR_ID
        && matches!(product_id, product_ids::DUALSENSE | product_ids::DUALSENSE_EDGE)
}
