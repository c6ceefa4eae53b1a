//! Nintendo Switch controller identifiers and wire constants.

/// Nintendo Co., Ltd.
pub const NINTENDO_VENDOR_ID: u16 = 0x057E;

/// HORI, maker of licensed Switch pads.
pub const HORI_VENDOR_ID: u16 = 0x0F0D;

pub mod product_ids {
    pub const JOYCON_LEFT: u16 = 0x2006;
    pub const JOYCON_RIGHT: u16 = 0x2007;
    pub const PRO_CONTROLLER: u16 = 0x2009;
    pub const SNES_CONTROLLER: u16 = 0x2017;
    /// HORI Wireless Switch Pad (vendor [`super::HORI_VENDOR_ID`]).
    pub const HORI_WIRELESS_PAD: u16 = 0x00F6;
}

/// First byte of every report in either direction.
pub mod report_ids {
    /// Standard full input report (buttons, 12-bit sticks, IMU).
    pub const FULL_STATE: u8 = 0x30;
    /// Simple HID mode input report.
    pub const SIMPLE_STATE: u8 = 0x3F;
    /// Reply to a subcommand.
    pub const SUBCOMMAND_REPLY: u8 = 0x21;
    /// Reply to a USB handshake command.
    pub const USB_REPLY: u8 = 0x81;
    /// Rumble plus subcommand output report.
    pub const SUBCOMMAND: u8 = 0x01;
    /// USB-only command output report.
    pub const USB_COMMAND: u8 = 0x80;
}

/// Commands carried by [`report_ids::USB_COMMAND`].
pub mod usb_commands {
    pub const HANDSHAKE: u8 = 0x02;
    pub const BAUD_3M: u8 = 0x03;
    /// Stop talking over the Bluetooth chip; no reply is sent.
    pub const FORCE_USB: u8 = 0x04;
}

pub mod subcommands {
    pub const SET_REPORT_MODE: u8 = 0x03;
    pub const SPI_FLASH_READ: u8 = 0x10;
    pub const SET_PLAYER_LIGHTS: u8 = 0x30;
    pub const SET_HOME_LIGHT: u8 = 0x38;
    pub const ENABLE_VIBRATION: u8 = 0x48;
}

/// Report mode payloads for [`subcommands::SET_REPORT_MODE`].
pub mod report_modes {
    pub const FULL: u8 = 0x30;
    pub const SIMPLE: u8 = 0x3F;
}

/// SPI flash address of the factory stick calibration (left then right).
pub const FACTORY_STICK_CAL_ADDR: u32 = 0x603D;

/// Length of the factory stick calibration block.
pub const FACTORY_STICK_CAL_LEN: u8 = 18;

/// Output buffer size and the bytes actually written per transport.
pub const OUTPUT_REPORT_LEN: usize = 64;
pub const USB_WRITE_LEN: usize = 64;
pub const BT_WRITE_LEN: usize = 49;

/// Home button LED: one mini-cycle at full intensity, held.
pub const HOME_LIGHT_PATTERN: [u8; 4] = [0x01, 0xF0, 0xF0, 0x00];

/// Player LED 1.
pub const DEFAULT_PLAYER_LIGHTS: u8 = 0x01;

/// Returns true when the vendor/product pair is a Switch-protocol controller.
pub fn is_nx_product(vendor_id: u16, product_id: u16) -> bool {
    match vendor_id {
        NINTENDO_VENDOR_ID => matches!(
            product_id,
            product_ids::JOYCON_LEFT
                | product_ids::JOYCON_RIGHT
                | product_ids::PRO_CONTROLLER
                | product_ids::SNES_CONTROLLER
        ),
        HORI_VENDOR_ID => product_id == product_ids::HORI_WIRELESS_PAD,
        _ => false,
    }
}
