//! Rescaling of raw samples into canonical ranges.
//!
//! Sticks end up in `[i16::MIN, i16::MAX]`, triggers and sliders in
//! `[0, 255]`. Rounding is round-half-to-even. Samples outside their declared
//! logical range are clamped first, so the output always satisfies
//! `min <= data <= max`.

use crate::Value;

const U16_TOP: f32 = 65535.0;
const U8_TOP: f32 = 255.0;

fn is_unset(v: &Value) -> bool {
    v.min == 0 && v.max == 0
}

/// Position of `data` inside `[min, max]` as a fraction in `[0, 1]`.
fn unit_position(v: &Value) -> f32 {
    let min = i32::from(v.min);
    let max = i32::from(v.max);
    let span = max - min;
    if span <= 0 {
        return 0.0;
    }
    let shifted = i32::from(v.data).clamp(min, max) - min;
    (shifted as f32 / span as f32).clamp(0.0, 1.0)
}

fn round_to_i32(x: f32) -> i32 {
    x.round_ties_even() as i32
}

fn saturate_i16(x: i32) -> i16 {
    x.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Unsigned logical range to the symmetric signed range.
///
/// With `invert` the axis is flipped so that the top of the logical range
/// maps to `i16::MIN`; HID reports Y growing downwards.
pub fn unsigned_to_signed16(v: &mut Value, invert: bool) {
    if is_unset(v) {
        return;
    }

    let d = round_to_i32(unit_position(v) * U16_TOP);
    let out = if invert { -(d - 32767) } else { d - 32768 };

    v.data = saturate_i16(out);
    v.min = i16::MIN;
    v.max = i16::MAX;
}

/// Signed logical range to the symmetric signed range, scaling each half
/// independently so an off-centre range still maps zero to zero.
pub fn signed_to_signed16(v: &mut Value) {
    if is_unset(v) {
        return;
    }

    let data = if v.min <= v.max {
        v.data.clamp(v.min, v.max)
    } else {
        v.data
    };

    let out = if data < 0 && v.min < 0 {
        let ratio = (f32::from(data) / f32::from(v.min)).clamp(0.0, 1.0);
        round_to_i32(ratio * f32::from(i16::MIN))
    } else if data > 0 && v.max > 0 {
        let ratio = (f32::from(data) / f32::from(v.max)).clamp(0.0, 1.0);
        round_to_i32(ratio * f32::from(i16::MAX))
    } else {
        0
    };

    v.data = saturate_i16(out);
    v.min = i16::MIN;
    v.max = i16::MAX;
}

/// Unsigned logical range to `[0, 255]`.
pub fn unsigned_to_u8(v: &mut Value) {
    if is_unset(v) {
        return;
    }

    let d = round_to_i32(unit_position(v) * U8_TOP);

    v.data = d.clamp(0, 255) as i16;
    v.min = 0;
    v.max = 255;
}

/// An 8-bit stick sample (`0..=255`, centre 128) in the signed range.
pub fn byte_stick(code: u16, raw: u8, invert: bool) -> Value {
    let mut v = Value::new(code, i16::from(raw), 0, i16::from(u8::MAX));
    unsigned_to_signed16(&mut v, invert);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage;

    fn value(data: i16, min: i16, max: i16) -> Value {
        Value::new(usage::X, data, min, max)
    }

    #[test]
    fn test_unsigned_byte_axis_boundaries() {
        let mut v = value(0, 0, 255);
        unsigned_to_signed16(&mut v, false);
        assert_eq!((v.data, v.min, v.max), (i16::MIN, i16::MIN, i16::MAX));

        let mut v = value(255, 0, 255);
        unsigned_to_signed16(&mut v, false);
        assert_eq!(v.data, i16::MAX);

        let mut v = value(0, 0, 255);
        unsigned_to_signed16(&mut v, true);
        assert_eq!(v.data, i16::MAX);

        let mut v = value(255, 0, 255);
        unsigned_to_signed16(&mut v, true);
        assert_eq!(v.data, i16::MIN);
    }

    #[test]
    fn test_unsigned_centre_is_near_zero() {
        let mut v = value(128, 0, 255);
        unsigned_to_signed16(&mut v, false);
        // 128/255 * 65535 = 32896.0 exactly
        assert_eq!(v.data, 128);

        let mut v = value(128, 0, 255);
        unsigned_to_signed16(&mut v, true);
        assert_eq!(v.data, -129);
    }

    #[test]
    fn test_negative_and_positive_min_shift() {
        let mut v = value(0, -127, 127);
        unsigned_to_signed16(&mut v, false);
        assert_eq!(v.data, 0);

        let mut v = value(10, 10, 20);
        unsigned_to_signed16(&mut v, false);
        assert_eq!(v.data, i16::MIN);
    }

    #[test]
    fn test_unset_range_is_untouched() {
        let mut v = value(42, 0, 0);
        unsigned_to_signed16(&mut v, true);
        assert_eq!(v, value(42, 0, 0));
        signed_to_signed16(&mut v);
        assert_eq!(v, value(42, 0, 0));
        unsigned_to_u8(&mut v);
        assert_eq!(v, value(42, 0, 0));
    }

    #[test]
    fn test_degenerate_range_does_not_panic() {
        let mut v = value(5, 5, 5);
        unsigned_to_signed16(&mut v, false);
        assert!(v.in_range());

        let mut v = value(7, 9, -9);
        unsigned_to_u8(&mut v);
        assert_eq!((v.data, v.min, v.max), (0, 0, 255));
    }

    #[test]
    fn test_out_of_range_sample_is_clamped() {
        let mut v = value(300, 0, 255);
        unsigned_to_u8(&mut v);
        assert_eq!(v.data, 255);

        let mut v = value(-3000, -1000, 1000);
        signed_to_signed16(&mut v);
        assert_eq!(v.data, i16::MIN);
    }

    #[test]
    fn test_signed_halves_scale_independently() {
        let mut v = value(-1000, -1000, 2000);
        signed_to_signed16(&mut v);
        assert_eq!(v.data, i16::MIN);

        let mut v = value(1000, -1000, 2000);
        signed_to_signed16(&mut v);
        // 0.5 * 32767 = 16383.5, ties to even
        assert_eq!(v.data, 16384);

        let mut v = value(0, -1000, 2000);
        signed_to_signed16(&mut v);
        assert_eq!(v.data, 0);
    }

    #[test]
    fn test_unsigned_to_u8() {
        let mut v = value(1023, 0, 1023);
        unsigned_to_u8(&mut v);
        assert_eq!((v.data, v.min, v.max), (255, 0, 255));

        let mut v = value(0, -512, 511);
        unsigned_to_u8(&mut v);
        // 512/1023 * 255 = 127.62
        assert_eq!(v.data, 128);
    }
}
