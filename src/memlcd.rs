//! Driver for a 144 x 168 Sharp memory LCD.
//!
//! The panel keeps its own image, so the driver holds a full 1-bpp
//! framebuffer and pushes every line on [`MemLcd::flush`]. Lit pixels
//! ([`BinaryColor::On`]) are white.
//!
//! Everything is sent MSB first, one frame per chip-select window:
//!
//! ```text
//! mode | (addr | 18 data bytes | 0x00) * lines | 0x00
//! ```
//!
//! The panel reads line addresses LSB first, so they go out bit-reversed.
//! The VCOM bit in the mode byte has to alternate or the liquid crystal
//! builds up a DC bias; every command flips it and [`MemLcd::toggle_vcom`]
//! exists for seconds where nothing is redrawn. Chip select is active high.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

pub const WIDTH: usize = 144;
pub const HEIGHT: usize = 168;
const LINE_BYTES: usize = WIDTH / 8;

struct Mode;

impl Mode {
    const WRITE: u8 = 0x80;
    const VCOM: u8 = 0x40;
    const CLEAR: u8 = 0x20;
}

const TRAILER: u8 = 0x00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemLcdError<SpiE, PinE> {
    Spi(SpiE),
    Pin(PinE),
}

pub struct MemLcd<SPI, CS> {
    spi: SPI,
    cs: CS,
    buffer: [[u8; LINE_BYTES]; HEIGHT],
    vcom: bool,
}

impl<SPI, CS> MemLcd<SPI, CS> {
    /// Creates the driver with an all-white framebuffer. Nothing is sent.
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self {
            spi,
            cs,
            buffer: [[0xFF; LINE_BYTES]; HEIGHT],
            vcom: false,
        }
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Color of the framebuffer pixel at `point`, `None` off screen.
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        let (x, y) = Self::index(point)?;
        let byte = self.buffer[y][x / 8];
        Some(BinaryColor::from(byte & Self::mask(x) != 0))
    }

    pub fn set_pixel(&mut self, point: Point, color: BinaryColor) {
        let Some((x, y)) = Self::index(point) else {
            return;
        };
        let byte = &mut self.buffer[y][x / 8];
        match color {
            BinaryColor::On => *byte |= Self::mask(x),
            BinaryColor::Off => *byte &= !Self::mask(x),
        }
    }

    fn index(point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < WIDTH && y < HEIGHT).then_some((x, y))
    }

    const fn mask(x: usize) -> u8 {
        0x80 >> (x % 8)
    }

    /// Mode byte for the next command. Flips VCOM.
    fn mode(&mut self, command: u8) -> u8 {
        let mode = if self.vcom { command | Mode::VCOM } else { command };
        self.vcom = !self.vcom;
        mode
    }
}

impl<SPI, CS, SpiE, PinE> MemLcd<SPI, CS>
where
    SPI: Write<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
{
    /// Sends the whole framebuffer.
    pub fn flush(&mut self) -> Result<(), MemLcdError<SpiE, PinE>> {
        let mode = self.mode(Mode::WRITE);
        self.transaction(|spi, buffer| {
            spi.write(&[mode])?;
            for (index, line) in buffer.iter().enumerate() {
                spi.write(&[line_address(index)])?;
                spi.write(line)?;
                spi.write(&[TRAILER])?;
            }
            spi.write(&[TRAILER])
        })
    }

    /// Clears the panel memory and the framebuffer to white.
    pub fn blank(&mut self) -> Result<(), MemLcdError<SpiE, PinE>> {
        self.buffer = [[0xFF; LINE_BYTES]; HEIGHT];
        let mode = self.mode(Mode::CLEAR);
        self.transaction(|spi, _| spi.write(&[mode, TRAILER]))
    }

    /// Flips VCOM without touching the image.
    pub fn toggle_vcom(&mut self) -> Result<(), MemLcdError<SpiE, PinE>> {
        let mode = self.mode(0);
        self.transaction(|spi, _| spi.write(&[mode, TRAILER]))
    }

    fn transaction<F>(&mut self, body: F) -> Result<(), MemLcdError<SpiE, PinE>>
    where
        F: FnOnce(&mut SPI, &[[u8; LINE_BYTES]; HEIGHT]) -> Result<(), SpiE>,
    {
        self.cs.set_high().map_err(MemLcdError::Pin)?;
        let result = body(&mut self.spi, &self.buffer).map_err(MemLcdError::Spi);
        self.cs.set_low().map_err(MemLcdError::Pin)?;
        result
    }
}

fn line_address(index: usize) -> u8 {
    // Lines are numbered from 1.
    ((index + 1) as u8).reverse_bits()
}

impl<SPI, CS> OriginDimensions for MemLcd<SPI, CS> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<SPI, CS> DrawTarget for MemLcd<SPI, CS> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buffer = [[fill; LINE_BYTES]; HEIGHT];
        Ok(())
    }
}
