//! Screen geometry of the face and the offset arithmetic for its text layers.
//!
//! The hour numerals 10 and 12 are wider than the rest, so the text layers sit
//! further right for those hours. The digit `1` is narrower than the other
//! glyphs of the large font and each one in a text nudges it right to keep the
//! text visually aligned with the numeral.

use embedded_graphics::prelude::Size;

pub const SCREEN_SIZE: Size = Size::new(144, 168);
pub const TEXT_FRAME_SIZE: Size = Size::new(40, 40);

pub const MINUTES_Y: i32 = 23;
pub const SECONDARY_Y: i32 = 83;
pub const WEEKDAY_Y: i32 = 94;

const NARROW_HOUR_X: i32 = 53;
const WIDE_HOUR_X: i32 = 70;
const NARROW_GLYPH_SHIFT: i32 = 3;
const WEEKDAY_SHIFT: i32 = 5;

/// Left edge of the text layers for the given numeral.
pub const fn base_x(hour12: u8) -> i32 {
    match hour12 {
        10 | 12 => WIDE_HOUR_X,
        _ => NARROW_HOUR_X,
    }
}

/// Left edge of a digit text in the large font.
pub fn digits_x(hour12: u8, text: &str) -> i32 {
    let narrow = text.bytes().filter(|&b| b == b'1').count() as i32;
    base_x(hour12) + NARROW_GLYPH_SHIFT * narrow
}

/// Left edge of the weekday code in the small font.
pub const fn weekday_x(hour12: u8) -> i32 {
    base_x(hour12) + WEEKDAY_SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_numerals_push_text_right() {
        for hour in 1..=12u8 {
            let expected = if hour == 10 || hour == 12 { 70 } else { 53 };
            assert_eq!(base_x(hour), expected, "hour {hour}");
        }
    }

    #[test]
    fn each_narrow_one_adds_three() {
        assert_eq!(digits_x(2, "05"), 53);
        assert_eq!(digits_x(2, "10"), 56);
        assert_eq!(digits_x(2, "41"), 56);
        assert_eq!(digits_x(2, "11"), 59);
        assert_eq!(digits_x(12, "11"), 76);
        assert_eq!(digits_x(10, "31"), 73);
    }

    #[test]
    fn weekday_shift() {
        assert_eq!(weekday_x(3), 58);
        assert_eq!(weekday_x(10), 75);
    }
}
