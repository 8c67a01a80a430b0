//! Bold Hours: a watch face that shows the hour as one big numeral with the
//! minutes and seconds (or the date) laid over it.
//!
//! [`display::compute`] reduces a [`ClockSample`] to the [`DisplayState`] the
//! face should show. [`WatchFace`] applies those states to the platform once
//! per tick, and [`Canvas`] plus [`MemLcd`] put them on a Sharp memory LCD.
#![cfg_attr(not(test), no_std)]

pub mod canvas;
pub mod clock;
pub mod config;
pub mod display;
pub mod face;
pub mod layout;
pub mod memlcd;

pub use canvas::{Canvas, DrawError, HourNumeral};
pub use clock::{ClockSample, TimeUnits};
pub use config::FaceConfig;
pub use display::{DisplayState, SecondaryFont, Update};
pub use face::{Haptics, HourBitmaps, Layer, TextLayers, WatchFace};
pub use memlcd::{MemLcd, MemLcdError};
