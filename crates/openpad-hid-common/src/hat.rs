//! D-pad octant encoding.
//!
//! Octants count clockwise from up: 0 = up, 1 = up-right, ..., 7 = up-left,
//! and [`DPAD_CENTER`] when nothing (or nothing meaningful) is held.

/// Value reported when no direction is held.
pub const DPAD_CENTER: u8 = 8;

/// Highest valid octant index.
pub const DPAD_MAX: u8 = 7;

/// Folds four direction bits into an octant.
///
/// Diagonals take precedence over single directions, checked in clockwise
/// order, so contradictory input such as up+down resolves to a single
/// direction rather than an invalid value.
pub fn dpad_from_bits(up: bool, right: bool, down: bool, left: bool) -> u8 {
    if up && right {
        1
    } else if right && down {
        3
    } else if down && left {
        5
    } else if left && up {
        7
    } else if up {
        0
    } else if right {
        2
    } else if down {
        4
    } else if left {
        6
    } else {
        DPAD_CENTER
    }
}

/// Clamps a hat value reported by the device; anything above 8 is centre.
pub fn clamp_hat(value: u8) -> u8 {
    if value > DPAD_CENTER {
        DPAD_CENTER
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sixteen_combinations() {
        // index bits: up=1, right=2, down=4, left=8
        let expected: [u8; 16] = [8, 0, 2, 1, 4, 0, 3, 1, 6, 7, 2, 1, 5, 5, 3, 1];
        for (bits, want) in expected.iter().enumerate() {
            let got = dpad_from_bits(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            assert_eq!(got, *want, "combination {bits:04b}");
            assert!(got <= DPAD_CENTER);
        }
    }

    #[test]
    fn test_clamp_hat() {
        assert_eq!(clamp_hat(0), 0);
        assert_eq!(clamp_hat(7), 7);
        assert_eq!(clamp_hat(8), 8);
        assert_eq!(clamp_hat(0x0F), 8);
    }
}
