//! Helper module for writing code points as UTF-16 code units.

/// The replacement character U+FFFD.
pub const REPLACEMENT: u16 = 0xfffd;

/// The first high surrogate.
pub const MIN_HIGH_SURROGATE: u16 = 0xd800;

/// The first low surrogate.
pub const MIN_LOW_SURROGATE: u16 = 0xdc00;

/// The first code point outside the basic multilingual plane.
pub const MIN_SUPPLEMENTARY: u32 = 0x1_0000;

/// The largest code point.
pub const MAX_CODE_POINT: u32 = 0x10_ffff;

/// Compute the high surrogate for a supplementary code point.
#[inline]
pub const fn high_surrogate(code_point: u32) -> u16 {
    (((code_point - MIN_SUPPLEMENTARY) >> 10) as u16) + MIN_HIGH_SURROGATE
}

/// Compute the low surrogate for a supplementary code point.
#[inline]
pub const fn low_surrogate(code_point: u32) -> u16 {
    ((code_point & 0x3ff) as u16) + MIN_LOW_SURROGATE
}

/// Determine whether the code unit is a high surrogate.
#[inline]
pub const fn is_high_surrogate(unit: u16) -> bool {
    MIN_HIGH_SURROGATE <= unit && unit < MIN_LOW_SURROGATE
}

/// Determine whether the code unit is a low surrogate.
#[inline]
pub const fn is_low_surrogate(unit: u16) -> bool {
    MIN_LOW_SURROGATE <= unit && unit <= 0xdfff
}

/// Combine a high and a low surrogate into the code point they represent.
///
/// The result is meaningless unless the arguments satisfy
/// [`is_high_surrogate`] and [`is_low_surrogate`], respectively.
#[inline]
pub const fn combine_surrogates(high: u16, low: u16) -> u32 {
    (((high - MIN_HIGH_SURROGATE) as u32) << 10) + ((low - MIN_LOW_SURROGATE) as u32)
        + MIN_SUPPLEMENTARY
}

/// Write the code point as one or two code units and return their number.
///
/// Code points below the surrogate range, which is the overwhelmingly common
/// case, and the remainder of the basic multilingual plane take one unit.
/// Supplementary code points take a surrogate pair. Values beyond
/// [`MAX_CODE_POINT`] are written as [`REPLACEMENT`]. The automaton never
/// produces such values, nor does it produce surrogate code points.
///
/// # Panics
///
/// If the output is too small for the code units.
#[inline]
pub fn write_code_point(code_point: u32, output: &mut [u16]) -> usize {
    if code_point < MIN_SUPPLEMENTARY {
        output[0] = code_point as u16;
        1
    } else if code_point <= MAX_CODE_POINT {
        assert!(2 <= output.len(), "surrogate pair requires two code units");
        output[0] = high_surrogate(code_point);
        output[1] = low_surrogate(code_point);
        2
    } else {
        output[0] = REPLACEMENT;
        1
    }
}

// ================================================================================================

#[cfg(test)]
mod test {
    use super::{
        combine_surrogates, high_surrogate, is_high_surrogate, is_low_surrogate, low_surrogate,
        write_code_point, REPLACEMENT,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Uniform};

    #[test]
    fn test_bmp() {
        let mut buffer = [0; 2];
        assert_eq!(write_code_point(0x41, &mut buffer), 1);
        assert_eq!(buffer[0], 0x41);
        assert_eq!(write_code_point(0xd7ff, &mut buffer), 1);
        assert_eq!(buffer[0], 0xd7ff);
        assert_eq!(write_code_point(0xe000, &mut buffer), 1);
        assert_eq!(buffer[0], 0xe000);
        assert_eq!(write_code_point(0xffff, &mut buffer), 1);
        assert_eq!(buffer[0], 0xffff);
    }

    #[test]
    fn test_boundaries() {
        let mut buffer = [0; 2];
        assert_eq!(write_code_point(0x1_0000, &mut buffer), 2);
        assert_eq!(buffer, [0xd800, 0xdc00]);
        assert_eq!(write_code_point(0x1_f600, &mut buffer), 2);
        assert_eq!(buffer, [0xd83d, 0xde00]);
        assert_eq!(write_code_point(0x10_ffff, &mut buffer), 2);
        assert_eq!(buffer, [0xdbff, 0xdfff]);
        assert_eq!(write_code_point(0x11_0000, &mut buffer), 1);
        assert_eq!(buffer[0], REPLACEMENT);
    }

    #[test]
    fn test_supplementary() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let planes = Uniform::new_inclusive(0x1_0000_u32, 0x10_ffff)
            .expect("range is not empty");
        let mut buffer = [0; 2];

        for code_point in planes.sample_iter(&mut rng).take(10_000) {
            assert_eq!(write_code_point(code_point, &mut buffer), 2);
            assert!(is_high_surrogate(buffer[0]));
            assert!(is_low_surrogate(buffer[1]));
            assert_eq!(buffer[0], high_surrogate(code_point));
            assert_eq!(buffer[1], low_surrogate(code_point));
            assert_eq!(combine_surrogates(buffer[0], buffer[1]), code_point);

            let c = char::from_u32(code_point).expect("supplementary code point is a char");
            let mut expected = [0; 2];
            assert_eq!(c.encode_utf16(&mut expected), buffer.as_slice());
        }
    }

    #[test]
    #[should_panic]
    fn test_too_small() {
        let mut buffer = [0; 1];
        write_code_point(0x1_f600, &mut buffer);
    }
}
