/// Face options that used to be compile-time switches.
///
/// [`FaceConfig::DEFAULT`] follows the `show-day` and `vibe-on-hour` Cargo
/// features so firmware builds pick their variant at build time, while hosts
/// and tests can construct any combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceConfig {
    /// Alternate day-of-month and weekday code in place of the seconds.
    pub show_day: bool,
    /// Ask for a haptic pulse whenever the hour numeral changes.
    pub vibe_on_hour: bool,
}

impl FaceConfig {
    pub const DEFAULT: Self = Self {
        show_day: cfg!(feature = "show-day"),
        vibe_on_hour: cfg!(feature = "vibe-on-hour"),
    };

    pub const fn with_show_day(mut self, show_day: bool) -> Self {
        self.show_day = show_day;
        self
    }

    pub const fn with_vibe_on_hour(mut self, vibe_on_hour: bool) -> Self {
        self.vibe_on_hour = vibe_on_hour;
        self
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
