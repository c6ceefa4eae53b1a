//! Transport boundary.
//!
//! Drivers only ever see a [`DeviceWriter`]: the handful of blocking
//! primitives they need to push handshakes, subcommands and rumble. The
//! engine additionally polls input through [`HidTransport`]. Write timeouts
//! are owned by the implementation and surface as
//! [`HidCommonError::Timeout`](crate::HidCommonError::Timeout).

use crate::{DescribedReport, HidCommonResult, HidDeviceInfo};

pub trait DeviceWriter {
    /// Writes one output report, report ID included.
    fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;

    /// Reads a feature report. `buf[0]` carries the requested report ID.
    fn read_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize>;
}

pub trait HidTransport: DeviceWriter {
    fn info(&self) -> &HidDeviceInfo;

    /// Non-blocking read of the next input report. `Ok(0)` means no data.
    fn read_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize>;

    /// Usages extracted from `report` using the device's own descriptor.
    fn describe_report(&self, _report: &[u8]) -> Option<DescribedReport> {
        None
    }

    fn is_connected(&self) -> bool {
        true
    }
}

pub mod mock {
    use super::*;
    use crate::HidCommonError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// In-memory device. Clones share the same queues, so a test can keep a
    /// handle while the engine owns another.
    #[derive(Clone)]
    pub struct MockHidDevice {
        info: HidDeviceInfo,
        read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
        write_history: Arc<Mutex<Vec<Vec<u8>>>>,
        feature_reply: Arc<Mutex<Option<Vec<u8>>>>,
        described: Arc<Mutex<Option<DescribedReport>>>,
        fail_writes: Arc<Mutex<bool>>,
        connected: Arc<Mutex<bool>>,
    }

    impl MockHidDevice {
        pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
            Self::with_info(HidDeviceInfo::new(vendor_id, product_id, path))
        }

        pub fn with_info(info: HidDeviceInfo) -> Self {
            Self {
                info,
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                write_history: Arc::new(Mutex::new(Vec::new())),
                feature_reply: Arc::new(Mutex::new(None)),
                described: Arc::new(Mutex::new(None)),
                fail_writes: Arc::new(Mutex::new(false)),
                connected: Arc::new(Mutex::new(true)),
            }
        }

        pub fn queue_read(&self, data: Vec<u8>) {
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(data);
        }

        pub fn pending_reads(&self) -> usize {
            self.read_queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .len()
        }

        pub fn get_write_history(&self) -> Vec<Vec<u8>> {
            let history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        pub fn clear_write_history(&self) {
            let mut history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.clear();
        }

        /// Bytes returned by the next feature-report reads. `None` makes
        /// them fail.
        pub fn set_feature_reply(&self, reply: Option<Vec<u8>>) {
            let mut slot = self.feature_reply.lock().unwrap_or_else(|e| e.into_inner());
            *slot = reply;
        }

        pub fn set_described_report(&self, report: DescribedReport) {
            let mut slot = self.described.lock().unwrap_or_else(|e| e.into_inner());
            *slot = Some(report);
        }

        pub fn set_fail_writes(&self, fail: bool) {
            let mut slot = self.fail_writes.lock().unwrap_or_else(|e| e.into_inner());
            *slot = fail;
        }

        pub fn disconnect(&self) {
            let mut connected = self.connected.lock().unwrap_or_else(|e| e.into_inner());
            *connected = false;
        }

        pub fn reconnect(&self) {
            let mut connected = self.connected.lock().unwrap_or_else(|e| e.into_inner());
            *connected = true;
        }

        fn connected(&self) -> bool {
            *self.connected.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    impl DeviceWriter for MockHidDevice {
        fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            if !self.connected() {
                return Err(HidCommonError::Disconnected);
            }
            if *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) {
                return Err(HidCommonError::Timeout { timeout_ms: 0 });
            }

            let mut history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(data.to_vec());
            Ok(data.len())
        }

        fn read_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize> {
            if !self.connected() {
                return Err(HidCommonError::Disconnected);
            }

            let reply = self.feature_reply.lock().unwrap_or_else(|e| e.into_inner());
            let data = reply
                .as_ref()
                .ok_or_else(|| HidCommonError::ReadError("feature report not supported".into()))?;
            let n = data.len().min(buf.len());
            if let (Some(dst), Some(src)) = (buf.get_mut(..n), data.get(..n)) {
                dst.copy_from_slice(src);
            }
            Ok(n)
        }
    }

    impl HidTransport for MockHidDevice {
        fn info(&self) -> &HidDeviceInfo {
            &self.info
        }

        fn read_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize> {
            if !self.connected() {
                return Err(HidCommonError::Disconnected);
            }

            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            let Some(data) = queue.pop_front() else {
                return Ok(0);
            };
            let n = data.len().min(buf.len());
            if let (Some(dst), Some(src)) = (buf.get_mut(..n), data.get(..n)) {
                dst.copy_from_slice(src);
            }
            Ok(n)
        }

        fn describe_report(&self, _report: &[u8]) -> Option<DescribedReport> {
            self.described
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        fn is_connected(&self) -> bool {
            self.connected()
        }
    }
}
