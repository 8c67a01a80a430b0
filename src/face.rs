//! Applies display states to the platform layers.
//!
//! [`WatchFace`] owns the state currently on screen and the resident hour
//! bitmap. Each tick it reduces a fresh [`DisplayState`] and hands the
//! platform only what changed. At most one hour bitmap is loaded at a time:
//! the old one is always unloaded before the next is loaded.

use embedded_graphics::prelude::Point;

use crate::clock::{ClockSample, TimeUnits};
use crate::config::FaceConfig;
use crate::display::{self, DisplayState, SecondaryFont};

/// Text layers stacked on top of the hour bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    Minutes,
    Secondary,
}

/// Source of the twelve hour numerals.
pub trait HourBitmaps {
    type Bitmap;

    /// Loads the numeral for `hour`. Hours outside 1..=12 yield `None`.
    fn load(&mut self, hour: u8) -> Option<Self::Bitmap>;

    /// Releases a bitmap previously returned by [`HourBitmaps::load`].
    fn unload(&mut self, bitmap: Self::Bitmap);

    /// Points the bitmap layer at `bitmap`, or at nothing.
    fn show(&mut self, bitmap: Option<&Self::Bitmap>);
}

pub trait TextLayers {
    fn set_text(&mut self, layer: Layer, text: &str, font: SecondaryFont);

    /// Moves the frame of `layer` so its top-left corner is at `origin`.
    fn set_origin(&mut self, layer: Layer, origin: Point);
}

pub trait Haptics {
    fn pulse(&mut self);
}

/// One bit flipped every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayToggle(bool);

impl DayToggle {
    /// Returns the current value and flips.
    pub fn next(&mut self) -> bool {
        let current = self.0;
        self.0 = !current;
        current
    }
}

pub struct WatchFace<P: HourBitmaps> {
    platform: P,
    config: FaceConfig,
    shown: Option<DisplayState>,
    bitmap: Option<P::Bitmap>,
    day_toggle: DayToggle,
}

impl<P> WatchFace<P>
where
    P: HourBitmaps + TextLayers + Haptics,
{
    pub fn new(platform: P, config: FaceConfig) -> Self {
        Self {
            platform,
            config,
            shown: None,
            bitmap: None,
            day_toggle: DayToggle::default(),
        }
    }

    /// Renders the first frame. Does not consume the day toggle.
    pub fn init(&mut self, sample: &ClockSample) {
        let update = display::compute(sample, None, false, &self.config);
        self.shown = None;
        self.apply(update);
    }

    /// Handles one tick of the tick source.
    pub fn on_tick(&mut self, sample: &ClockSample, units: TimeUnits) {
        if units.is_empty() {
            return;
        }
        let day_toggle = self.day_toggle.next();
        let update = display::compute(sample, self.shown.as_ref(), day_toggle, &self.config);
        self.apply(update);
    }

    /// Releases the resident bitmap and forgets what is on screen.
    pub fn teardown(&mut self) {
        self.platform.show(None);
        if let Some(bitmap) = self.bitmap.take() {
            self.platform.unload(bitmap);
        }
        self.shown = None;
    }

    pub fn state(&self) -> Option<&DisplayState> {
        self.shown.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn apply(&mut self, update: display::Update) {
        let state = update.state;
        let previous = self.shown.take();

        if update.reload_hour {
            self.swap_hour(state.hour_index);
        }

        let minutes_changed = previous
            .as_ref()
            .map_or(true, |p| p.minute_text != state.minute_text);
        if minutes_changed {
            self.platform
                .set_text(Layer::Minutes, &state.minute_text, SecondaryFont::Large);
        }
        if previous.as_ref().map(DisplayState::minute_origin) != Some(state.minute_origin()) {
            self.platform.set_origin(Layer::Minutes, state.minute_origin());
        }

        let secondary_changed = previous.as_ref().map_or(true, |p| {
            p.secondary_text != state.secondary_text || p.secondary_font != state.secondary_font
        });
        if secondary_changed {
            self.platform
                .set_text(Layer::Secondary, &state.secondary_text, state.secondary_font);
        }
        if previous.as_ref().map(DisplayState::secondary_origin) != Some(state.secondary_origin())
        {
            self.platform.set_origin(Layer::Secondary, state.secondary_origin());
        }

        if update.hour_pulse {
            self.platform.pulse();
        }

        self.shown = Some(state);
    }

    fn swap_hour(&mut self, hour: u8) {
        if !(1..=12).contains(&hour) {
            return;
        }
        if let Some(old) = self.bitmap.take() {
            self.platform.show(None);
            self.platform.unload(old);
        }
        self.bitmap = self.platform.load(hour);
        self.platform.show(self.bitmap.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use std::string::String;
    use std::vec::Vec;

    use super::*;
    use time::macros::datetime;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Load(u8),
        Unload(u8),
        Show(Option<u8>),
        Text(Layer, String, SecondaryFont),
        Origin(Layer, Point),
        Pulse,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        resident: usize,
        max_resident: usize,
    }

    impl Recorder {
        fn drain(&mut self) -> Vec<Call> {
            core::mem::take(&mut self.calls)
        }
    }

    impl HourBitmaps for Recorder {
        type Bitmap = u8;

        fn load(&mut self, hour: u8) -> Option<u8> {
            self.calls.push(Call::Load(hour));
            self.resident += 1;
            self.max_resident = self.max_resident.max(self.resident);
            Some(hour)
        }

        fn unload(&mut self, bitmap: u8) {
            self.calls.push(Call::Unload(bitmap));
            self.resident -= 1;
        }

        fn show(&mut self, bitmap: Option<&u8>) {
            self.calls.push(Call::Show(bitmap.copied()));
        }
    }

    impl TextLayers for Recorder {
        fn set_text(&mut self, layer: Layer, text: &str, font: SecondaryFont) {
            self.calls.push(Call::Text(layer, text.into(), font));
        }

        fn set_origin(&mut self, layer: Layer, origin: Point) {
            self.calls.push(Call::Origin(layer, origin));
        }
    }

    impl Haptics for Recorder {
        fn pulse(&mut self) {
            self.calls.push(Call::Pulse);
        }
    }

    fn face(config: FaceConfig) -> WatchFace<Recorder> {
        WatchFace::new(Recorder::default(), config)
    }

    const SECONDS: FaceConfig = FaceConfig {
        show_day: false,
        vibe_on_hour: false,
    };

    #[test]
    fn init_renders_everything() {
        let mut face = face(SECONDS);
        face.init(&ClockSample::new(datetime!(2024-03-05 14:05:09)));
        assert_eq!(
            face.platform_mut().drain(),
            [
                Call::Load(2),
                Call::Show(Some(2)),
                Call::Text(Layer::Minutes, "05".into(), SecondaryFont::Large),
                Call::Origin(Layer::Minutes, Point::new(53, 23)),
                Call::Text(Layer::Secondary, "09".into(), SecondaryFont::Large),
                Call::Origin(Layer::Secondary, Point::new(53, 83)),
            ]
        );
    }

    #[test]
    fn tick_applies_only_changes() {
        let mut face = face(SECONDS);
        let mut sample = ClockSample::new(datetime!(2024-03-05 14:05:09));
        face.init(&sample);
        face.platform_mut().drain();

        let units = sample.tick();
        face.on_tick(&sample, units);
        assert_eq!(
            face.platform_mut().drain(),
            [
                Call::Text(Layer::Secondary, "10".into(), SecondaryFont::Large),
                Call::Origin(Layer::Secondary, Point::new(56, 83)),
            ]
        );

        let units = sample.tick();
        face.on_tick(&sample, units);
        assert_eq!(
            face.platform_mut().drain(),
            [
                Call::Text(Layer::Secondary, "11".into(), SecondaryFont::Large),
                Call::Origin(Layer::Secondary, Point::new(59, 83)),
            ]
        );
    }

    #[test]
    fn hour_swap_unloads_before_loading() {
        let mut face = face(SECONDS.with_vibe_on_hour(true));
        let mut sample = ClockSample::new(datetime!(2024-03-05 14:59:59));
        face.init(&sample);
        face.platform_mut().drain();

        let units = sample.tick();
        face.on_tick(&sample, units);
        let calls = face.platform_mut().drain();
        assert_eq!(
            calls[..4],
            [
                Call::Show(None),
                Call::Unload(2),
                Call::Load(3),
                Call::Show(Some(3)),
            ]
        );
        assert_eq!(calls.last(), Some(&Call::Pulse));
        assert_eq!(face.platform().max_resident, 1);
        assert_eq!(face.platform().resident, 1);
    }

    #[test]
    fn unchanged_hour_never_reloads() {
        let mut face = face(SECONDS);
        let mut sample = ClockSample::new(datetime!(2024-03-05 14:00:00));
        face.init(&sample);
        face.platform_mut().drain();
        for _ in 0..3599 {
            let units = sample.tick();
            face.on_tick(&sample, units);
        }
        let calls = face.platform_mut().drain();
        assert!(!calls.iter().any(|c| matches!(c, Call::Load(_) | Call::Unload(_))));
        assert!(!calls.contains(&Call::Pulse));
    }

    #[test]
    fn day_toggle_alternates_each_tick() {
        let mut face = face(SECONDS.with_show_day(true));
        let mut sample = ClockSample::new(datetime!(2024-03-21 09:15:00));
        face.init(&sample);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let units = sample.tick();
            face.on_tick(&sample, units);
            let state = face.state().expect("rendered");
            seen.push((String::from(state.secondary_text.as_str()), state.secondary_font));
        }
        assert_eq!(
            seen,
            [
                (String::from("21"), SecondaryFont::Large),
                (String::from("DO"), SecondaryFont::Small),
                (String::from("21"), SecondaryFont::Large),
                (String::from("DO"), SecondaryFont::Small),
            ]
        );
    }

    #[test]
    fn toggle_sequence() {
        let mut toggle = DayToggle::default();
        let seq = [toggle.next(), toggle.next(), toggle.next(), toggle.next()];
        assert_eq!(seq, [false, true, false, true]);
    }

    #[test]
    fn empty_tick_is_ignored() {
        let mut face = face(SECONDS.with_show_day(true));
        let sample = ClockSample::new(datetime!(2024-03-21 09:15:00));
        face.init(&sample);
        face.platform_mut().drain();
        face.on_tick(&sample, TimeUnits::NONE);
        assert!(face.platform_mut().drain().is_empty());
    }

    #[test]
    fn teardown_releases_bitmap_once() {
        let mut face = face(SECONDS);
        face.init(&ClockSample::new(datetime!(2024-03-05 14:05:09)));
        face.platform_mut().drain();

        face.teardown();
        assert_eq!(face.platform_mut().drain(), [Call::Show(None), Call::Unload(2)]);
        assert!(face.state().is_none());

        face.teardown();
        assert_eq!(face.platform_mut().drain(), [Call::Show(None)]);
        assert_eq!(face.platform().resident, 0);
    }
}
