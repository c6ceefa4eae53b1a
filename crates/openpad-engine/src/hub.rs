//! Controller hub: owns every connected device and routes reports, timers
//! and rumble requests to the right driver.

use crate::config::{EngineConfig, MIN_READ_BUFFER_LEN};
use crate::device::Device;
use crate::error::{EngineError, EngineResult};
use openpad_controller::{ControllerEvent, DriverKind, EventDeduper};
use openpad_hid_common::{HidCommonError, HidDeviceInfo, HidTransport};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct ControllerHub {
    config: EngineConfig,
    devices: BTreeMap<u32, Device>,
    next_id: u32,
    deduper: Option<EventDeduper>,
    read_buf: Vec<u8>,
}

impl Default for ControllerHub {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ControllerHub {
    pub fn new(config: EngineConfig) -> Self {
        let deduper = config
            .dedupe
            .then(|| EventDeduper::new(config.stick_deadzone));
        let read_buf = vec![0u8; config.read_buffer_len.max(MIN_READ_BUFFER_LEN)];
        Self {
            config,
            devices: BTreeMap::new(),
            next_id: 1,
            deduper,
            read_buf,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Takes ownership of a transport, picks its driver and runs the driver's
    /// initialization. Returns the session id used by every other call.
    pub fn connect(&mut self, transport: Box<dyn HidTransport>, now: Instant) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);

        let mut device = Device::new(id, transport, &self.config);
        info!(
            id,
            vid = device.info().vendor_id,
            pid = device.info().product_id,
            driver = %device.kind(),
            "controller connected"
        );
        device.initialize(now);
        self.devices.insert(id, device);
        id
    }

    /// Drops a device and its driver state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDevice`] if `id` is not connected.
    pub fn disconnect(&mut self, id: u32) -> EngineResult<HidDeviceInfo> {
        let device = self
            .devices
            .remove(&id)
            .ok_or(EngineError::UnknownDevice(id))?;
        if let Some(deduper) = self.deduper.as_mut() {
            deduper.forget(id);
        }
        info!(id, "controller disconnected");
        Ok(device.info().clone())
    }

    pub fn device_ids(&self) -> Vec<u32> {
        self.devices.keys().copied().collect()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn device_info(&self, id: u32) -> Option<&HidDeviceInfo> {
        self.devices.get(&id).map(Device::info)
    }

    pub fn driver_kind(&self, id: u32) -> Option<DriverKind> {
        self.devices.get(&id).map(Device::kind)
    }

    /// Polls every device once: at most one non-blocking read each, then the
    /// driver timers. Devices whose transport reports disconnection are
    /// removed.
    pub fn poll(&mut self, now: Instant) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        let mut gone = Vec::new();

        for (&id, device) in self.devices.iter_mut() {
            match device.poll(now, &mut self.read_buf) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(EngineError::Transport(HidCommonError::Disconnected)) => {
                    gone.push(id);
                    continue;
                }
                Err(e) => warn!(id, "read failed: {}", e),
            }
            device.service(now);
        }

        for id in gone {
            if self.disconnect(id).is_ok() {
                debug!(id, "removed after transport disconnect");
            }
        }

        self.filter(events)
    }

    /// Decodes a report delivered by the caller instead of read by the hub.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDevice`] if `id` is not connected.
    pub fn handle_report(
        &mut self,
        id: u32,
        now: Instant,
        report: &[u8],
    ) -> EngineResult<Option<ControllerEvent>> {
        let device = self
            .devices
            .get_mut(&id)
            .ok_or(EngineError::UnknownDevice(id))?;
        let Some(mut event) = device.decode(now, report) else {
            return Ok(None);
        };
        if let Some(deduper) = self.deduper.as_mut()
            && !deduper.changed(&mut event)
        {
            return Ok(None);
        }
        Ok(Some(event))
    }

    /// Requests rumble on one controller. Motor strengths are 0..=0xFFFF;
    /// drivers without rumble ignore the request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDevice`] if `id` is not connected.
    pub fn rumble(&mut self, id: u32, now: Instant, low: u16, high: u16) -> EngineResult<()> {
        let device = self
            .devices
            .get_mut(&id)
            .ok_or(EngineError::UnknownDevice(id))?;
        debug!(id, low, high, "rumble");
        device.rumble(now, low, high);
        Ok(())
    }

    fn filter(&mut self, events: Vec<ControllerEvent>) -> Vec<ControllerEvent> {
        match self.deduper.as_mut() {
            Some(deduper) => events
                .into_iter()
                .filter_map(|mut event| deduper.changed(&mut event).then_some(event))
                .collect(),
            None => events,
        }
    }
}
