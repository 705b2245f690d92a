//! Colors of the bi-color matrix.
//!
//! Monochrome matrices use [`BinaryColor`](embedded_graphics::pixelcolor::BinaryColor)
//! directly. The bi-color matrix has a red and a green LED behind every pixel,
//! which gives four colors encoded in two bits: bit 0 drives the red plane and
//! bit 1 the green plane.

use embedded_graphics::pixelcolor::raw::{RawData, RawU2};
use embedded_graphics::pixelcolor::{BinaryColor, PixelColor, Rgb888, RgbColor};

/// Color of one bi-color pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BiColor {
    /// Both LEDs off
    #[default]
    Off = 0,
    /// Red LED only
    Red = 1,
    /// Green LED only
    Green = 2,
    /// Both LEDs
    Yellow = 3,
}

impl BiColor {
    /// Build a color from its two-bit encoding; higher bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Off,
            1 => Self::Red,
            2 => Self::Green,
            _ => Self::Yellow,
        }
    }

    /// The two-bit encoding of this color.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Whether the red LED is lit.
    #[must_use]
    pub const fn red(self) -> bool {
        self.bits() & 0b01 != 0
    }

    /// Whether the green LED is lit.
    #[must_use]
    pub const fn green(self) -> bool {
        self.bits() & 0b10 != 0
    }
}

impl PixelColor for BiColor {
    type Raw = RawU2;
}

impl From<RawU2> for BiColor {
    fn from(raw: RawU2) -> Self {
        Self::from_bits(raw.into_inner())
    }
}

impl From<BiColor> for RawU2 {
    fn from(color: BiColor) -> Self {
        RawU2::new(color.bits())
    }
}

/// Only the exact primaries map to a lit pixel; every other color is off.
impl From<Rgb888> for BiColor {
    fn from(color: Rgb888) -> Self {
        match (color.r(), color.g(), color.b()) {
            (255, 0, 0) => Self::Red,
            (0, 255, 0) => Self::Green,
            (255, 255, 0) => Self::Yellow,
            _ => Self::Off,
        }
    }
}

impl From<BinaryColor> for BiColor {
    fn from(color: BinaryColor) -> Self {
        match color {
            BinaryColor::On => Self::Yellow,
            BinaryColor::Off => Self::Off,
        }
    }
}
