//! Per-device driver state and dispatch.

use crate::config::EngineConfig;
use crate::default_driver::decode_described;
use crate::registry::driver_kind;
use openpad_controller::{ControllerEvent, ControllerProtocol, DriverKind};
use openpad_hid_common::{DescribedReport, DeviceWriter};
use openpad_hid_nx_protocol::NxProtocol;
use openpad_hid_ps4_protocol::Ps4Protocol;
use openpad_hid_ps5_protocol::Ps5Protocol;
use openpad_hid_xbox_protocol::{XboxProtocol, XboxWiredProtocol};
use std::time::Instant;
use tracing::trace;

/// The driver bound to one device, carrying that device's protocol state.
#[derive(Debug, Clone)]
pub enum Driver {
    /// Decodes from the device's own report descriptor.
    Default,
    Nx(NxProtocol),
    Ps4(Ps4Protocol),
    Ps5(Ps5Protocol),
    Xbox(XboxProtocol),
    XboxW(XboxWiredProtocol),
}

impl Driver {
    pub fn for_device(vendor_id: u16, product_id: u16, config: &EngineConfig) -> Self {
        Self::for_kind(driver_kind(vendor_id, product_id), config)
    }

    pub fn for_kind(kind: DriverKind, config: &EngineConfig) -> Self {
        match kind {
            DriverKind::Default => Driver::Default,
            DriverKind::Nx => {
                Driver::Nx(NxProtocol::new().with_player_lights(config.nx_player_lights()))
            }
            DriverKind::Ps4 => Driver::Ps4(Ps4Protocol::new().with_lightbar(config.ps4_led)),
            DriverKind::Ps5 => Driver::Ps5(Ps5Protocol::new().with_lightbar(config.ps5_led)),
            DriverKind::Xbox => Driver::Xbox(XboxProtocol::new()),
            DriverKind::XboxW => Driver::XboxW(XboxWiredProtocol),
        }
    }

    pub fn kind(&self) -> DriverKind {
        match self {
            Driver::Default => DriverKind::Default,
            Driver::Nx(_) => DriverKind::Nx,
            Driver::Ps4(_) => DriverKind::Ps4,
            Driver::Ps5(_) => DriverKind::Ps5,
            Driver::Xbox(_) => DriverKind::Xbox,
            Driver::XboxW(_) => DriverKind::XboxW,
        }
    }

    fn protocol(&mut self) -> Option<&mut dyn ControllerProtocol> {
        match self {
            Driver::Default => None,
            Driver::Nx(p) => Some(p),
            Driver::Ps4(p) => Some(p),
            Driver::Ps5(p) => Some(p),
            Driver::Xbox(p) => Some(p),
            Driver::XboxW(p) => Some(p),
        }
    }

    /// True when reports must be described by the transport before decoding.
    pub fn needs_descriptor(&self) -> bool {
        matches!(self, Driver::Default)
    }

    pub fn init(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        if let Some(protocol) = self.protocol() {
            protocol.initialize(now, writer);
        }
    }

    /// Decodes a raw report with a vendor driver. The default driver cannot
    /// decode raw bytes and always returns `None` here.
    pub fn decode(
        &mut self,
        now: Instant,
        report: &[u8],
        writer: &mut dyn DeviceWriter,
    ) -> Option<ControllerEvent> {
        match self.protocol() {
            Some(protocol) => protocol.handle_report(now, report, writer),
            None => {
                trace!("default driver needs a described report");
                None
            }
        }
    }

    /// Decodes a transport-described report. Only the default driver uses
    /// this path.
    pub fn decode_described(&mut self, report: &DescribedReport) -> Option<ControllerEvent> {
        match self {
            Driver::Default => Some(decode_described(report)),
            _ => None,
        }
    }

    pub fn rumble(&mut self, now: Instant, low: u16, high: u16, writer: &mut dyn DeviceWriter) {
        match self.protocol() {
            Some(protocol) => protocol.set_rumble(now, low, high, writer),
            None => trace!("default driver has no rumble output"),
        }
    }

    pub fn service(&mut self, now: Instant, writer: &mut dyn DeviceWriter) {
        if let Some(protocol) = self.protocol() {
            protocol.service(now, writer);
        }
    }
}
