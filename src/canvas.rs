//! Renders the face with embedded-graphics.
//!
//! [`Canvas`] is the retained layer tree the face adapter talks to: one hour
//! numeral and two text layers. It only records what the layers hold and
//! composes them into a [`DrawTarget`] on request.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use u8g2_fonts::types::{FontColor, HorizontalAlignment, VerticalPosition};
use u8g2_fonts::{fonts, FontRenderer};

use crate::display::{SecondaryFont, Text};
use crate::face::{Haptics, HourBitmaps, Layer, TextLayers};
use crate::layout;

const HOUR_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_logisoso92_tn>();
const LARGE_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_logisoso38_tn>();
const SMALL_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_helvB18_tr>();

/// Left edge and vertical center of the hour numeral.
const HOUR_ANCHOR: Point = Point::new(2, 84);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawError<E> {
    Display(E),
    Font,
}

impl<E> From<u8g2_fonts::Error<E>> for DrawError<E> {
    fn from(err: u8g2_fonts::Error<E>) -> Self {
        match err {
            u8g2_fonts::Error::DisplayError(e) => Self::Display(e),
            _ => Self::Font,
        }
    }
}

/// A loaded hour numeral. Owned by whoever loaded it until handed back.
#[derive(Debug, PartialEq, Eq)]
pub struct HourNumeral {
    hour: u8,
    digits: Text,
}

impl HourNumeral {
    pub fn hour(&self) -> u8 {
        self.hour
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextLayer {
    text: Text,
    font: SecondaryFont,
    origin: Point,
}

impl TextLayer {
    const fn new(origin: Point) -> Self {
        Self {
            text: Text::new(),
            font: SecondaryFont::Large,
            origin,
        }
    }

    fn draw<D>(&self, target: &mut D) -> Result<(), DrawError<D::Error>>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if self.text.is_empty() {
            return Ok(());
        }
        let font = match self.font {
            SecondaryFont::Large => &LARGE_FONT,
            SecondaryFont::Small => &SMALL_FONT,
        };
        // The fonts only draw transparently. Knock the glyph box out of the
        // numeral first so white text stays readable over white strokes.
        let dimensions = font
            .get_rendered_dimensions(self.text.as_str(), self.origin, VerticalPosition::Top)
            .map_err(|_| DrawError::Font)?;
        if let Some(area) = dimensions.bounding_box {
            target
                .fill_solid(&area, BinaryColor::Off)
                .map_err(DrawError::Display)?;
        }
        font.render(
            self.text.as_str(),
            self.origin,
            VerticalPosition::Top,
            FontColor::Transparent(BinaryColor::On),
            target,
        )?;
        Ok(())
    }
}

pub struct Canvas {
    hour: Option<Text>,
    resident: usize,
    minutes: TextLayer,
    secondary: TextLayer,
    dirty: bool,
    pulses: u8,
}

impl Canvas {
    pub const fn new() -> Self {
        Self {
            hour: None,
            resident: 0,
            minutes: TextLayer::new(Point::new(53, layout::MINUTES_Y)),
            secondary: TextLayer::new(Point::new(53, layout::SECONDARY_Y)),
            dirty: true,
            pulses: 0,
        }
    }

    /// Number of hour numerals loaded and not yet unloaded.
    pub fn resident(&self) -> usize {
        self.resident
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Whether a pulse was requested since the last call.
    pub fn take_pulse(&mut self) -> bool {
        core::mem::replace(&mut self.pulses, 0) > 0
    }

    pub fn text(&self, layer: Layer) -> &str {
        self.layer(layer).text.as_str()
    }

    pub fn origin(&self, layer: Layer) -> Point {
        self.layer(layer).origin
    }

    pub fn font(&self, layer: Layer) -> SecondaryFont {
        self.layer(layer).font
    }

    /// Digits of the numeral on the bitmap layer, if any.
    pub fn hour(&self) -> Option<&str> {
        self.hour.as_ref().map(|digits| digits.as_str())
    }

    /// Draws the whole face over `target`.
    ///
    /// A layer that fails to draw does not stop the layers above it; the
    /// first failure is returned once everything else is on the target.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), DrawError<D::Error>>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off).map_err(DrawError::Display)?;
        let numeral = match &self.hour {
            Some(digits) => HOUR_FONT
                .render_aligned(
                    digits.as_str(),
                    HOUR_ANCHOR,
                    VerticalPosition::Center,
                    HorizontalAlignment::Left,
                    FontColor::Transparent(BinaryColor::On),
                    target,
                )
                .map(|_| ())
                .map_err(DrawError::from),
            None => Ok(()),
        };
        let minutes = self.minutes.draw(target);
        let secondary = self.secondary.draw(target);
        numeral.and(minutes).and(secondary)
    }

    fn layer(&self, layer: Layer) -> &TextLayer {
        match layer {
            Layer::Minutes => &self.minutes,
            Layer::Secondary => &self.secondary,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut TextLayer {
        match layer {
            Layer::Minutes => &mut self.minutes,
            Layer::Secondary => &mut self.secondary,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl HourBitmaps for Canvas {
    type Bitmap = HourNumeral;

    fn load(&mut self, hour: u8) -> Option<HourNumeral> {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let mut digits = Text::new();
        write!(digits, "{hour}").ok()?;
        self.resident += 1;
        Some(HourNumeral { hour, digits })
    }

    fn unload(&mut self, _bitmap: HourNumeral) {
        self.resident = self.resident.saturating_sub(1);
    }

    fn show(&mut self, bitmap: Option<&HourNumeral>) {
        let next = bitmap.map(|b| b.digits.clone());
        if self.hour != next {
            self.hour = next;
            self.dirty = true;
        }
    }
}

impl TextLayers for Canvas {
    fn set_text(&mut self, layer: Layer, text: &str, font: SecondaryFont) {
        let target = self.layer_mut(layer);
        target.text.clear();
        target.text.push_str(text).ok();
        target.font = font;
        self.dirty = true;
    }

    fn set_origin(&mut self, layer: Layer, origin: Point) {
        let target = self.layer_mut(layer);
        if target.origin != origin {
            target.origin = origin;
            self.dirty = true;
        }
    }
}

impl Haptics for Canvas {
    fn pulse(&mut self) {
        self.pulses = self.pulses.saturating_add(1);
    }
}
