//! Factory stick calibration stored in SPI flash.
//!
//! The 18-byte block at [`FACTORY_STICK_CAL_ADDR`](crate::ids::FACTORY_STICK_CAL_ADDR)
//! holds six packed pairs of 12-bit values:
//!
//! ```text
//! left:  bytes 0..3 max delta, 3..6 center, 6..9 min delta
//! right: bytes 9..12 center, 12..15 min delta, 15..18 max delta
//! ```
//!
//! Each pair packs X and Y little-endian into three bytes. `0x0FFF` marks an
//! erased cell and decodes as zero.

/// An erased flash cell.
pub const UNSET_CELL: u16 = 0x0FFF;

/// Fraction of the factory extents used as the initial range; leaves room
/// for sticks that cannot quite reach the factory extremes.
const EXTENT_SCALE: f32 = 0.9;

/// SPI read reply header: address (u32 LE) plus length.
pub const SPI_REPLY_HEADER_LEN: usize = 5;

/// Centre and observed range of one stick axis.
///
/// `min` and `max` are relative to `center`; samples are reported as
/// `raw - center` and widen the range as they arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisCalibration {
    pub min: i32,
    pub center: i32,
    pub max: i32,
}

impl AxisCalibration {
    pub const fn new(min: i32, center: i32, max: i32) -> Self {
        Self { min, center, max }
    }

    /// Calibration used for simple-mode reports before anything is known.
    pub const fn simple_default() -> Self {
        Self::new(i16::MIN as i32 / 2, 0x8000, i16::MAX as i32 / 2)
    }

    fn from_factory(min_delta: u16, center: u16, max_delta: u16) -> Self {
        Self {
            min: -scale_extent(min_delta),
            center: i32::from(center),
            max: scale_extent(max_delta),
        }
    }

    /// Widens the range to include `v`.
    pub fn expand(&mut self, v: i32) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }
}

fn scale_extent(delta: u16) -> i32 {
    (f32::from(delta) * EXTENT_SCALE).round_ties_even() as i32
}

/// Calibration for all four stick axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickCalibration {
    pub lx: AxisCalibration,
    pub ly: AxisCalibration,
    pub rx: AxisCalibration,
    pub ry: AxisCalibration,
}

impl StickCalibration {
    pub const fn simple_default() -> Self {
        let axis = AxisCalibration::simple_default();
        Self {
            lx: axis,
            ly: axis,
            rx: axis,
            ry: axis,
        }
    }
}

/// Unpacks two 12-bit values from three bytes at `offset`.
pub fn unpack_pair(data: &[u8], offset: usize) -> Option<(u16, u16)> {
    let b0 = u16::from(*data.get(offset)?);
    let b1 = u16::from(*data.get(offset.checked_add(1)?)?);
    let b2 = u16::from(*data.get(offset.checked_add(2)?)?);

    let v0 = ((b1 << 8) & 0x0F00) | b0;
    let v1 = (b2 << 4) | (b1 >> 4);

    let unset = |v: u16| if v == UNSET_CELL { 0 } else { v };
    Some((unset(v0), unset(v1)))
}

fn parse_stick(
    data: &[u8],
    min_offset: usize,
    center_offset: usize,
    max_offset: usize,
) -> Option<(AxisCalibration, AxisCalibration)> {
    let (xmin, ymin) = unpack_pair(data, min_offset)?;
    let (xc, yc) = unpack_pair(data, center_offset)?;
    let (xmax, ymax) = unpack_pair(data, max_offset)?;

    Some((
        AxisCalibration::from_factory(xmin, xc, xmax),
        AxisCalibration::from_factory(ymin, yc, ymax),
    ))
}

/// Parses the 18-byte factory block (without the SPI reply header).
pub fn parse_factory_calibration(data: &[u8]) -> Option<StickCalibration> {
    let (lx, ly) = parse_stick(data, 6, 3, 0)?;
    let (rx, ry) = parse_stick(data, 12, 9, 15)?;
    Some(StickCalibration { lx, ly, rx, ry })
}

/// Parses an SPI read reply payload: 5-byte header then flash data.
pub fn parse_spi_reply(payload: &[u8]) -> Option<StickCalibration> {
    parse_factory_calibration(payload.get(SPI_REPLY_HEADER_LEN..)?)
}
