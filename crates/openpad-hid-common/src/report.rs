//! Bounds-checked access to raw HID report bytes
//!
//! Vendor input reports are fixed layouts addressed by byte offset, so
//! [`ReportView`] reads at absolute offsets and answers `None` past the end
//! instead of panicking.

/// Borrowed, zero-copy view over a raw report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportView<'a> {
    data: &'a [u8],
}

impl<'a> ReportView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Returns the view only if it holds at least `len` bytes.
    pub fn require(data: &'a [u8], len: usize) -> Option<Self> {
        (data.len() >= len).then_some(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// First byte, which is the report ID for numbered reports.
    pub fn report_id(&self) -> Option<u8> {
        self.u8_at(0)
    }

    pub fn u8_at(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Byte at `offset`, or zero past the end of the report.
    pub fn u8_or_zero(&self, offset: usize) -> u8 {
        self.u8_at(offset).unwrap_or(0)
    }

    /// True when any bit of `mask` is set in the byte at `offset`.
    pub fn bit(&self, offset: usize, mask: u8) -> bool {
        self.u8_at(offset).is_some_and(|b| b & mask != 0)
    }

    pub fn u16_le_at(&self, offset: usize) -> Option<u16> {
        let lo = self.u8_at(offset)?;
        let hi = self.u8_at(offset.checked_add(1)?)?;
        Some(u16::from_le_bytes([lo, hi]))
    }

    pub fn i16_le_at(&self, offset: usize) -> Option<i16> {
        let lo = self.u8_at(offset)?;
        let hi = self.u8_at(offset.checked_add(1)?)?;
        Some(i16::from_le_bytes([lo, hi]))
    }

    /// Sub-view starting at `offset`; used to skip per-transport headers.
    pub fn offset(&self, offset: usize) -> Option<Self> {
        self.data.get(offset..).map(Self::new)
    }

    pub fn bytes(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        self.data.get(offset..offset.checked_add(len)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_reads_within_bounds() {
        let data = [0x30, 0x34, 0x12, 0xFF, 0x7F];
        let view = ReportView::new(&data);
        assert_eq!(view.report_id(), Some(0x30));
        assert_eq!(view.u16_le_at(1), Some(0x1234));
        assert_eq!(view.i16_le_at(3), Some(0x7FFF));
        assert!(view.bit(3, 0x80));
        assert!(!view.bit(0, 0x01));
    }

    #[test]
    fn test_view_is_total_past_the_end() {
        let data = [0x01, 0x02];
        let view = ReportView::new(&data);
        assert_eq!(view.u8_at(2), None);
        assert_eq!(view.u8_or_zero(9), 0);
        assert_eq!(view.u16_le_at(1), None);
        assert_eq!(view.u16_le_at(usize::MAX), None);
        assert!(!view.bit(5, 0xFF));
        assert_eq!(view.bytes(1, 4), None);
        assert!(view.offset(3).is_none());
        assert_eq!(view.offset(2).map(|v| v.len()), Some(0));
    }

    #[test]
    fn test_require_checks_length() {
        assert!(ReportView::require(&[0u8; 14], 14).is_some());
        assert!(ReportView::require(&[0u8; 13], 14).is_none());
    }
}
