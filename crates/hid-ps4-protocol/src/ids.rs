//! DualShock 4 and licensed PS4 controller identifiers.

#![deny(static_mut_refs)]

/// Sony Interactive Entertainment.
pub const SONY_VENDOR_ID: u16 = 0x054C;

pub mod product_ids {
    pub const DUALSHOCK4_V1: u16 = 0x05C4;
    pub const DUALSHOCK4_V2: u16 = 0x09CC;
    /// Sony wireless USB adapter.
    pub const WIRELESS_ADAPTER: u16 = 0x0BA0;
    /// STRIKEPAD grip add-on.
    pub const STRIKEPAD: u16 = 0x05C5;
}

pub mod report_ids {
    /// USB input report.
    pub const USB_INPUT: u8 = 0x01;
    /// Bluetooth extended input report.
    pub const BT_INPUT: u8 = 0x11;
    /// Serial number feature report; used to tell USB from Bluetooth.
    pub const SERIAL_FEATURE: u8 = 0x12;
    pub const USB_OUTPUT: u8 = 0x05;
    pub const BT_OUTPUT: u8 = 0x11;
}

/// Feature probe buffer: report id plus 64 payload bytes.
pub const FEATURE_PROBE_LEN: usize = 65;

/// Licensed third-party pads that speak the DualShock 4 protocol.
pub const LICENSED_PADS: &[(u16, u16)] = &[
    (0x0079, 0x181B), // Venom Arcade Stick
    (0x0738, 0x8250), // Mad Catz FightPad Pro
    (0x0738, 0x8384), // Mad Catz FightStick TE S+
    (0x0738, 0x8480), // Mad Catz FightStick TE 2
    (0x0738, 0x8481), // Mad Catz FightStick TE 2+
    (0x0C12, 0x0E10), // Armor Armor 3 Pad
    (0x0C12, 0x1CF6), // EMIO Elite Controller
    (0x0C12, 0x0E15), // Game:Pad 4
    (0x0C12, 0x0EF6), // Hitbox Arcade Stick
    (0x0F0D, 0x0055), // HORIPAD 4 FPS
    (0x0F0D, 0x0066), // HORIPAD 4 FPS Plus
    (0x0F0D, 0x0084), // HORI Fighting Commander
    (0x0F0D, 0x008A), // HORI Real Arcade Pro 4
    (0x0F0D, 0x009C), // HORI TAC PRO
    (0x0F0D, 0x00A0), // HORI TAC4
    (0x0F0D, 0x00EE), // HORI mini wired
    (0x11C0, 0x4001), // PS4 Fun Controller
    (0x146B, 0x0D01), // Nacon Revolution Pro
    (0x146B, 0x0D02), // Nacon Revolution Pro v2
    (0x146B, 0x0D10), // Nacon Revolution Infinite
    (0x1532, 0x0401), // Razer Panthera
    (0x1532, 0x1000), // Razer Raiju
    (0x1532, 0x1004), // Razer Raiju 2 Ultimate USB
    (0x1532, 0x1007), // Razer Raiju 2 Tournament USB
    (0x1532, 0x1008), // Razer Panthera Evo
    (0x1532, 0x1009), // Razer Raiju 2 Ultimate BT
    (0x1532, 0x100A), // Razer Raiju 2 Tournament BT
    (0x1532, 0x1100), // Razer RAION Fightpad
    (0x20D6, 0x792A), // PowerA Fusion Fight Pad
    (0x7545, 0x0104), // Armor 3 / Level Up Cobra
    (0x9886, 0x0025), // Astro C40
    (0x0E6F, 0x0207), // Victrix Pro Fightstick
];

/// True for Sony DualShock 4 hardware and the licensed pads above.
pub fn is_ps4_product(vendor_id: u16, product_id: u16) -> bool {
    if vendor_id == SONY_VENDOR_ID {
        return matches!(
            product_id,
            product_ids::DUALSHOCK4_V1
                | product_ids::DUALSHOCK4_V2
                | product_ids::WIRELESS_ADAPTER
                | product_ids::STRIKEPAD
        );
    }
    LICENSED_PADS.contains(&(vendor_id, product_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sony_pads() {
        assert!(is_ps4_product(SONY_VENDOR_ID, product_ids::DUALSHOCK4_V2));
        assert!(!is_ps4_product(SONY_VENDOR_ID, 0x0CE6));
    }

    #[test]
    fn test_licensed_pads() {
        assert!(is_ps4_product(0x0F0D, 0x00EE));
        assert!(is_ps4_product(0x9886, 0x0025));
        assert!(!is_ps4_product(0x0F0D, 0x00F6));
    }
}
