//! A connected controller: transport, identity and driver.

use crate::config::EngineConfig;
use crate::driver::Driver;
use crate::error::EngineResult;
use openpad_controller::{ControllerEvent, DriverKind};
use openpad_hid_common::{HidDeviceInfo, HidTransport};
use std::fmt;
use std::time::Instant;
use tracing::{debug, trace};

pub struct Device {
    id: u32,
    info: HidDeviceInfo,
    transport: Box<dyn HidTransport>,
    driver: Driver,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("info", &self.info)
            .field("driver", &self.driver.kind())
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Wraps a transport and picks its driver; does not talk to the device.
    pub fn new(id: u32, transport: Box<dyn HidTransport>, config: &EngineConfig) -> Self {
        let info = transport.info().clone();
        let driver = Driver::for_device(info.vendor_id, info.product_id, config);
        Self {
            id,
            info,
            transport,
            driver,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn info(&self) -> &HidDeviceInfo {
        &self.info
    }

    pub fn kind(&self) -> DriverKind {
        self.driver.kind()
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn initialize(&mut self, now: Instant) {
        debug!(
            id = self.id,
            vid = self.info.vendor_id,
            pid = self.info.product_id,
            driver = %self.driver.kind(),
            "initializing controller"
        );
        self.driver.init(now, self.transport.as_mut());
    }

    /// Decodes one raw input report and stamps the session identity on the
    /// resulting event.
    pub fn decode(&mut self, now: Instant, report: &[u8]) -> Option<ControllerEvent> {
        let event = if self.driver.needs_descriptor() {
            let described = self.transport.describe_report(report)?;
            self.driver.decode_described(&described)
        } else {
            self.driver.decode(now, report, self.transport.as_mut())
        }?;
        Some(event.with_identity(self.id, self.info.vendor_id, self.info.product_id))
    }

    /// Reads at most one report and decodes it.
    ///
    /// # Errors
    ///
    /// Propagates transport read failures, including disconnection.
    pub fn poll(&mut self, now: Instant, buf: &mut [u8]) -> EngineResult<Option<ControllerEvent>> {
        let n = self.transport.read_report(buf)?;
        if n == 0 {
            return Ok(None);
        }
        let report = buf.get(..n).unwrap_or_default();
        trace!(id = self.id, len = n, "input report");
        Ok(self.decode(now, report))
    }

    pub fn rumble(&mut self, now: Instant, low: u16, high: u16) {
        self.driver.rumble(now, low, high, self.transport.as_mut());
    }

    pub fn service(&mut self, now: Instant) {
        self.driver.service(now, self.transport.as_mut());
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }
}
