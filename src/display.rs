use core::fmt::Write;

use embedded_graphics::prelude::Point;
use heapless::String;

use crate::clock::ClockSample;
use crate::config::FaceConfig;
use crate::layout;

/// Two ASCII characters, the only text the face ever shows.
pub type Text = String<2>;

/// Weekday codes indexed by day of the week, 0 = Sunday.
pub const WEEKDAY_CODES: [&str; 7] = ["ZO", "MA", "DI", "WO", "DO", "VR", "ZA"];
const FALLBACK_WEEKDAY_CODE: &str = "ZO";

/// Font of the secondary text layer. The minutes always use the large font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecondaryFont {
    Large,
    Small,
}

/// Everything the face shows for one second.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayState {
    /// Hour numeral, 1..=12.
    pub hour_index: u8,
    pub minute_text: Text,
    pub minute_x: i32,
    /// Seconds, day of month or weekday code.
    pub secondary_text: Text,
    pub secondary_font: SecondaryFont,
    pub secondary_x: i32,
    pub secondary_y: i32,
}

impl DisplayState {
    pub fn minute_origin(&self) -> Point {
        Point::new(self.minute_x, layout::MINUTES_Y)
    }

    pub fn secondary_origin(&self) -> Point {
        Point::new(self.secondary_x, self.secondary_y)
    }
}

/// Result of one reduction: the new state plus the side effects the host owes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub state: DisplayState,
    /// The hour numeral differs from what is on screen (or nothing is yet).
    pub reload_hour: bool,
    /// The hour turned over and the face wants a haptic pulse.
    pub hour_pulse: bool,
}

/// Weekday code for `weekday` (0 = Sunday). Unknown values fall back to Sunday's code.
pub fn weekday_code(weekday: u8) -> &'static str {
    WEEKDAY_CODES
        .get(usize::from(weekday))
        .copied()
        .unwrap_or(FALLBACK_WEEKDAY_CODE)
}

fn two_digits(value: u8) -> Text {
    let mut text = Text::new();
    write!(text, "{:02}", value % 100).ok();
    text
}

fn code_text(code: &str) -> Text {
    let mut text = Text::new();
    text.push_str(code).ok();
    text
}

/// Computes what the face shows for `sample`.
///
/// `previous` is the state currently on screen, `None` before the first render.
/// `day_toggle` picks between day of month (`false`) and weekday code (`true`)
/// when the date replaces the seconds.
pub fn compute(
    sample: &ClockSample,
    previous: Option<&DisplayState>,
    day_toggle: bool,
    config: &FaceConfig,
) -> Update {
    let hour = sample.hour12();

    let minute_text = two_digits(sample.minute());
    let minute_x = layout::digits_x(hour, &minute_text);

    let (secondary_text, secondary_font, secondary_x, secondary_y) =
        match (config.show_day, day_toggle) {
            (true, true) => (
                code_text(weekday_code(sample.weekday())),
                SecondaryFont::Small,
                layout::weekday_x(hour),
                layout::WEEKDAY_Y,
            ),
            (true, false) => {
                let text = two_digits(sample.day());
                let x = layout::digits_x(hour, &text);
                (text, SecondaryFont::Large, x, layout::SECONDARY_Y)
            }
            (false, _) => {
                let text = two_digits(sample.second());
                let x = layout::digits_x(hour, &text);
                (text, SecondaryFont::Large, x, layout::SECONDARY_Y)
            }
        };

    let hour_changed = previous.map(|p| p.hour_index != hour);

    Update {
        state: DisplayState {
            hour_index: hour,
            minute_text,
            minute_x,
            secondary_text,
            secondary_font,
            secondary_x,
            secondary_y,
        },
        reload_hour: hour_changed.unwrap_or(true),
        hour_pulse: config.vibe_on_hour && hour_changed.unwrap_or(false),
    }
}
