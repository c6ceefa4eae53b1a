//! hidapi-backed transport.

use anyhow::{Context, Result};
use hidapi::{HidApi, HidDevice};
use openpad_hid_common::{
    BusType, DeviceWriter, HidCommonError, HidCommonResult, HidDeviceInfo, HidTransport,
};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub fn device_info(dev: &hidapi::DeviceInfo) -> HidDeviceInfo {
    let bus = match dev.bus_type() {
        hidapi::BusType::Usb => BusType::Usb,
        hidapi::BusType::Bluetooth => BusType::Bluetooth,
        _ => BusType::Unknown,
    };
    HidDeviceInfo {
        vendor_id: dev.vendor_id(),
        product_id: dev.product_id(),
        usage_page: dev.usage_page(),
        usage: dev.usage(),
        bus,
        serial_number: dev.serial_number().map(str::to_owned),
        manufacturer: dev.manufacturer_string().map(str::to_owned),
        product_name: dev.product_string().map(str::to_owned),
        path: dev.path().to_string_lossy().into_owned(),
    }
}

/// An open hidapi device in non-blocking mode.
///
/// hidapi writes block without a deadline, so a write that takes longer
/// than the configured timeout is reported as
/// [`HidCommonError::Timeout`] after it returns. Drivers then retry it the
/// same way as a failed write.
pub struct HidapiTransport {
    device: HidDevice,
    info: HidDeviceInfo,
    write_timeout: Duration,
    connected: bool,
}

/// Index of the interface to open among `infos`: the first game-controller
/// collection matching `vid`/`pid`, else the first match of any usage.
pub fn pick_interface(infos: &[HidDeviceInfo], vid: u16, pid: u16) -> HidCommonResult<usize> {
    let matching = || {
        infos
            .iter()
            .enumerate()
            .filter(|(_, d)| d.vendor_id == vid && d.product_id == pid)
    };
    matching()
        .find(|(_, d)| d.is_game_controller())
        .or_else(|| matching().next())
        .map(|(i, _)| i)
        .ok_or_else(|| HidCommonError::DeviceNotFound(format!("VID=0x{vid:04X} PID=0x{pid:04X}")))
}

impl HidapiTransport {
    /// Opens the first interface matching `vid`/`pid`, preferring the one
    /// whose top-level collection is a game controller.
    pub fn open(api: &HidApi, vid: u16, pid: u16, write_timeout: Duration) -> Result<Self> {
        let devices: Vec<_> = api.device_list().collect();
        let infos: Vec<HidDeviceInfo> = devices.iter().map(|d| device_info(d)).collect();
        let index = pick_interface(&infos, vid, pid)?;
        let (Some(dev), Some(info)) = (devices.get(index), infos.get(index)) else {
            return Err(HidCommonError::DeviceNotFound(format!("VID=0x{vid:04X} PID=0x{pid:04X}")).into());
        };

        let device = dev
            .open_device(api)
            .map_err(|e| HidCommonError::OpenError(format!("{}: {e}", info.path)))?;
        device
            .set_blocking_mode(false)
            .context("Failed to set non-blocking mode")?;

        debug!(path = %info.path, bus = ?info.bus, "opened device");
        Ok(Self {
            device,
            info: info.clone(),
            write_timeout,
            connected: true,
        })
    }
}

impl DeviceWriter for HidapiTransport {
    fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        if !self.connected {
            return Err(HidCommonError::Disconnected);
        }
        let started = Instant::now();
        let n = self
            .device
            .write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))?;
        let took = started.elapsed();
        if took > self.write_timeout {
            let timeout_ms = millis(self.write_timeout);
            warn!(took_ms = millis(took), timeout_ms, "write exceeded timeout");
            return Err(HidCommonError::Timeout { timeout_ms });
        }
        Ok(n)
    }

    fn read_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize> {
        self.device
            .get_feature_report(buf)
            .map_err(|e| HidCommonError::ReadError(e.to_string()))
    }
}

impl HidTransport for HidapiTransport {
    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }

    fn read_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize> {
        if !self.connected {
            return Err(HidCommonError::Disconnected);
        }
        match self.device.read(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                debug!("read failed, treating device as gone: {}", e);
                self.connected = false;
                Err(HidCommonError::Disconnected)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(vid: u16, pid: u16, usage: u16, path: &str) -> HidDeviceInfo {
        HidDeviceInfo {
            vendor_id: vid,
            product_id: pid,
            usage_page: 0x01,
            usage,
            bus: BusType::Usb,
            serial_number: None,
            manufacturer: None,
            product_name: None,
            path: path.to_string(),
        }
    }

    #[test]
    fn test_pick_prefers_game_controller_collection() -> Result<(), Box<dyn std::error::Error>> {
        let infos = [
            info(0x054C, 0x09CC, 0x06, "kbd"),
            info(0x045E, 0x02E0, 0x05, "xbox"),
            info(0x054C, 0x09CC, 0x05, "pad"),
        ];
        assert_eq!(pick_interface(&infos, 0x054C, 0x09CC)?, 2);
        assert_eq!(pick_interface(&infos[..1], 0x054C, 0x09CC)?, 0);
        Ok(())
    }

    #[test]
    fn test_pick_reports_missing_device() {
        let infos = [info(0x054C, 0x09CC, 0x05, "pad")];
        let err = pick_interface(&infos, 0x057E, 0x2009);
        assert!(matches!(err, Err(HidCommonError::DeviceNotFound(ref what)) if what == "VID=0x057E PID=0x2009"));
    }
}
