//! crates/logging/src/numbers.rs
//! Hand-rolled decimal rendering for header fields.
//!
//! Header fields are simple enough that writing digits by hand avoids the
//! general formatting machinery on every log call.

const DIGITS: &[u8; 10] = b"0123456789";

/// Writes `value` right-aligned into `buf[start..start + width]`.
///
/// Leading positions are filled with `pad`. A value with more than `width`
/// digits keeps only its lowest `width` digits; zero renders as all padding.
pub(crate) fn write_fixed_width(buf: &mut [u8], width: usize, start: usize, value: u64, pad: u8) {
    let field = &mut buf[start..start + width];
    let mut remaining = value;
    let mut index = width;
    while index > 0 && remaining > 0 {
        index -= 1;
        field[index] = DIGITS[(remaining % 10) as usize];
        remaining /= 10;
    }
    field[..index].fill(pad);
}

/// Writes `value` into `buf` starting at `start` with no leading zeros.
///
/// Digits are produced at the end of `buf` and then copied down, so the caller
/// only needs `buf` to be large enough for `start` plus the digit count.
/// Returns the number of digits written.
pub(crate) fn write_variable_width(buf: &mut [u8], start: usize, value: u64) -> usize {
    let mut remaining = value;
    let mut index = buf.len();
    loop {
        index -= 1;
        buf[index] = DIGITS[(remaining % 10) as usize];
        remaining /= 10;
        if remaining == 0 {
            break;
        }
    }
    let count = buf.len() - index;
    buf.copy_within(index.., start);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_width_pads_on_the_left() {
        let mut buf = [0u8; 16];
        write_fixed_width(&mut buf, 7, 1, 4321, b' ');
        assert_eq!(&buf[1..8], b"   4321");
    }

    #[test]
    fn fixed_width_zero_is_all_padding() {
        let mut buf = [0u8; 8];
        write_fixed_width(&mut buf, 7, 0, 0, b' ');
        assert_eq!(&buf[..7], b"       ");
    }

    #[test]
    fn fixed_width_truncates_to_low_digits() {
        let mut buf = [0u8; 8];
        write_fixed_width(&mut buf, 7, 0, 123_456_789, b' ');
        assert_eq!(&buf[..7], b"3456789");
    }

    #[test]
    fn fixed_width_leaves_neighbours_untouched() {
        let mut buf = [b'#'; 10];
        write_fixed_width(&mut buf, 3, 2, 7, b'0');
        assert_eq!(&buf, b"##007#####");
    }

    #[test]
    fn variable_width_zero() {
        let mut buf = [0u8; 64];
        let n = write_variable_width(&mut buf, 1, 0);
        assert_eq!(n, 1);
        assert_eq!(&buf[1..2], b"0");
    }

    #[test]
    fn variable_width_max_value() {
        let mut buf = [0u8; 64];
        let n = write_variable_width(&mut buf, 1, u64::MAX);
        assert_eq!(&buf[1..=n], b"18446744073709551615");
    }

    proptest! {
        #[test]
        fn variable_width_matches_decimal_display(value in any::<u64>(), start in 0usize..8) {
            let mut buf = [0u8; 64];
            let n = write_variable_width(&mut buf, start, value);
            let expected = value.to_string();
            prop_assert_eq!(&buf[start..start + n], expected.as_bytes());
        }

        #[test]
        fn fixed_width_matches_padded_display(value in 1u64..10_000_000) {
            let mut buf = [0u8; 8];
            write_fixed_width(&mut buf, 7, 1, value, b' ');
            let expected = format!("{value:>7}");
            prop_assert_eq!(&buf[1..8], expected.as_bytes());
        }
    }
}
