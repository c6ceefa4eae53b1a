//! Seam between the engine and the vendor drivers.

use crate::{ControllerEvent, DriverKind};
use openpad_hid_common::DeviceWriter;
use std::time::Instant;

/// A stateful vendor driver bound to one connected device.
///
/// Writes go through the supplied [`DeviceWriter`]; a failed write is logged
/// by the driver and never aborts decoding. Time is passed in so that timers
/// are driven by the caller's clock.
pub trait ControllerProtocol {
    fn kind(&self) -> DriverKind;

    /// Runs once right after the device is opened.
    fn initialize(&mut self, now: Instant, writer: &mut dyn DeviceWriter);

    /// Decodes one raw input report. Unknown, short or not-yet-expected
    /// reports yield `None`.
    fn handle_report(
        &mut self,
        now: Instant,
        report: &[u8],
        writer: &mut dyn DeviceWriter,
    ) -> Option<ControllerEvent>;

    /// Requests motor intensities. Drivers may defer the actual write.
    fn set_rumble(&mut self, now: Instant, low: u16, high: u16, writer: &mut dyn DeviceWriter);

    /// Advances timers; called on every poll whether or not a report arrived.
    fn service(&mut self, _now: Instant, _writer: &mut dyn DeviceWriter) {}
}

