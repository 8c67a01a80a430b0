use core::ops::{BitOr, BitOrAssign};

use time::{Date, Duration, Month, PrimitiveDateTime, Time};

/// Maps a 24-hour value onto the face's 1..=12 numerals. Midnight and noon show 12.
pub const fn hour12(hour: u8) -> u8 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// Bitmask of the time units that changed between two samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeUnits(u8);

impl TimeUnits {
    pub const NONE: Self = Self(0);
    pub const SECOND: Self = Self(1 << 0);
    pub const MINUTE: Self = Self(1 << 1);
    pub const HOUR: Self = Self(1 << 2);
    pub const DAY: Self = Self(1 << 3);
    pub const MONTH: Self = Self(1 << 4);
    pub const YEAR: Self = Self(1 << 5);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TimeUnits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TimeUnits {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Wall-clock time truncated to whole seconds.
///
/// The firmware keeps one of these as its software clock and advances it from
/// the 1 Hz alarm with [`ClockSample::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockSample {
    at: PrimitiveDateTime,
}

impl ClockSample {
    pub fn new(at: PrimitiveDateTime) -> Self {
        Self {
            at: at.replace_nanosecond(0).unwrap_or(at),
        }
    }

    /// Builds a sample from calendar fields, `None` if any field is out of range.
    pub fn from_calendar(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        let date = Date::from_calendar_date(year, month, day).ok()?;
        let time = Time::from_hms(hour, minute, second).ok()?;
        Some(Self::new(PrimitiveDateTime::new(date, time)))
    }

    pub const fn as_primitive(&self) -> PrimitiveDateTime {
        self.at
    }

    /// Hour of the day, 0..=23.
    pub const fn hour(&self) -> u8 {
        self.at.hour()
    }

    pub const fn hour12(&self) -> u8 {
        hour12(self.at.hour())
    }

    pub const fn minute(&self) -> u8 {
        self.at.minute()
    }

    pub const fn second(&self) -> u8 {
        self.at.second()
    }

    /// Day of the week, 0 = Sunday.
    pub const fn weekday(&self) -> u8 {
        self.at.weekday().number_days_from_sunday()
    }

    /// Day of the month, 1..=31.
    pub const fn day(&self) -> u8 {
        self.at.day()
    }

    pub fn month(&self) -> u8 {
        u8::from(self.at.month())
    }

    pub const fn year(&self) -> i32 {
        self.at.year()
    }

    /// Advances one second. Returns the units that rolled over.
    ///
    /// At the end of the representable calendar the sample stays put and no
    /// units are reported.
    pub fn tick(&mut self) -> TimeUnits {
        let Some(next) = self.at.checked_add(Duration::SECOND) else {
            return TimeUnits::NONE;
        };
        let next = Self { at: next };
        let units = next.changed_since(self);
        *self = next;
        units
    }

    /// Units whose value differs between `earlier` and `self`.
    pub fn changed_since(&self, earlier: &Self) -> TimeUnits {
        let mut units = TimeUnits::NONE;
        if self.second() != earlier.second() {
            units |= TimeUnits::SECOND;
        }
        if self.minute() != earlier.minute() {
            units |= TimeUnits::MINUTE;
        }
        if self.hour() != earlier.hour() {
            units |= TimeUnits::HOUR;
        }
        if self.at.date() != earlier.at.date() {
            units |= TimeUnits::DAY;
        }
        if self.month() != earlier.month() || self.year() != earlier.year() {
            units |= TimeUnits::MONTH;
        }
        if self.year() != earlier.year() {
            units |= TimeUnits::YEAR;
        }
        units
    }
}

impl From<PrimitiveDateTime> for ClockSample {
    fn from(at: PrimitiveDateTime) -> Self {
        Self::new(at)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockSample {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        );
    }
}
