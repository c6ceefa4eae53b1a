//! Microsoft controller identifiers.

#![deny(static_mut_refs)]

pub const MICROSOFT_VENDOR_ID: u16 = 0x045E;

pub mod product_ids {
    // Bluetooth / BLE HID
    pub const XBOX_ONE_S_BT_LEGACY: u16 = 0x02E0;
    pub const XBOX_ONE_S_BT: u16 = 0x02FD;
    pub const ELITE_SERIES_2_BT: u16 = 0x0B05;
    pub const SERIES_XS_BLE: u16 = 0x0B13;
    pub const XBOX_ONE_S_BLE: u16 = 0x0B20;
    pub const ELITE_SERIES_2_BLE: u16 = 0x0B22;

    // Wired / receiver
    pub const XBOX_360_WIRED: u16 = 0x028E;
    pub const XBOX_360_WIRELESS: u16 = 0x028F;
    pub const XBOX_360_RECEIVER: u16 = 0x0719;
}

pub mod report_ids {
    pub const INPUT: u8 = 0x01;
    /// Guide button report sent by newer firmware.
    pub const GUIDE: u8 = 0x02;
    pub const RUMBLE: u8 = 0x03;
}

pub fn is_xbox_bluetooth_product(vendor_id: u16, product_id: u16) -> bool {
    use product_ids::*;
    vendor_id == MICROSOFT_VENDOR_ID
        && matches!(
            product_id,
            XBOX_ONE_S_BT_LEGACY
                | XBOX_ONE_S_BT
                | ELITE_SERIES_2_BT
                | SERIES_XS_BLE
                | XBOX_ONE_S_BLE
                | ELITE_SERIES_2_BLE
        )
}

pub fn is_xbox_wired_product(vendor_id: u16, product_id: u16) -> bool {
    use product_ids::*;
    vendor_id == MICROSOFT_VENDOR_ID
        && matches!(product_id, XBOX_360_WIRED | XBOX_360_WIRELESS | XBOX_360_RECEIVER)
}
