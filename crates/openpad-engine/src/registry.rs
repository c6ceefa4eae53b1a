//! Vendor/product id to driver lookup.

use openpad_controller::DriverKind;
use openpad_hid_nx_protocol::is_nx_product;
use openpad_hid_ps4_protocol::is_ps4_product;
use openpad_hid_ps5_protocol::is_ps5_product;
use openpad_hid_xbox_protocol::{is_xbox_bluetooth_product, is_xbox_wired_product};

/// Picks the driver for a device. Anything unrecognised is decoded from its
/// own report descriptor by the default driver.
pub fn driver_kind(vendor_id: u16, product_id: u16) -> DriverKind {
    if is_nx_product(vendor_id, product_id) {
        DriverKind::Nx
    } else if is_ps4_product(vendor_id, product_id) {
        DriverKind::Ps4
    } else if is_ps5_product(vendor_id, product_id) {
        DriverKind::Ps5
    } else if is_xbox_bluetooth_product(vendor_id, product_id) {
        DriverKind::Xbox
    } else if is_xbox_wired_product(vendor_id, product_id) {
        DriverKind::XboxW
    } else {
        DriverKind::Default
    }
}
