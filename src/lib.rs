//! Driver for LED matrices behind an HT16K33 controller.
//!
//! ## How the HT16K33 Works
//!
//! The HT16K33 is a RAM-mapped LED controller on an I²C bus. It holds 16 bytes
//! of display RAM and multiplexes the LEDs on its own, so unlike a scanned
//! panel the host only talks to it when the picture changes.
//!
//! ### Commands
//! - **System setup** (`0x21`) – starts the internal oscillator
//! - **Display setup** (`0x80 | rate << 1 | on`) – display on/off and one of
//!   four blink rates
//! - **Dimming** (`0xE0 | level`) – sixteen brightness levels
//! - **Display RAM** (register `0x00`) – two bytes per row, one bit per LED
//!
//! ### Buffer and flushing
//! The driver keeps a copy of the display RAM in memory: one padding byte
//! followed by the 16 data bytes. Drawing only touches this copy; a flush
//! writes all of it to the chip in one bus transaction. By default every
//! mutating call flushes before it returns ([`FlushMode::Eager`]). Switch to
//! [`FlushMode::Deferred`] to batch changes and flush with
//! [`PixelMatrix::show`].
//!
//! ## Topologies
//!
//! The same chip is wired to different LED grids. A [`Topology`] maps logical
//! (x, y) coordinates to a bit of display RAM:
//!
//! | Topology | Size | Color |
//! |---|---|---|
//! | [`Matrix8x8`] | 8 × 8 | [`BinaryColor`] |
//! | [`Matrix16x8`] | 16 × 8, two 8 × 8 grids side by side | [`BinaryColor`] |
//! | [`Backpack16x8`] | 16 × 8 | [`BinaryColor`] |
//! | [`Matrix8x8x2`] | 8 × 8, red and green | [`BiColor`] |
//!
//! ## Example
//! ```rust,ignore
//! use ht16k33_matrix::{BinaryColor, Matrix16x8, PixelMatrix, DEFAULT_ADDRESS};
//!
//! let mut matrix = PixelMatrix::<Matrix16x8, _>::new(i2c, DEFAULT_ADDRESS)?;
//! matrix.set_brightness(8)?;
//! matrix.set_pixel(0, 0, BinaryColor::On)?;
//! matrix.shift(4, 0, true)?;
//! ```
//!
//! Several matrices can share one bus through
//! [`embedded-hal-bus`](https://docs.rs/embedded-hal-bus) as long as each chip
//! has its own address.
//!
//! ## Available Feature Flags
//!
//! ### `defmt` Feature
//! Implements `defmt::Format` for the public types and routes the driver's
//! log messages to `defmt`.
//!
//! ### `log` Feature
//! Routes the driver's log messages to the `log` facade. Mutually exclusive
//! with `defmt`.
#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod color;
pub mod driver;
pub mod matrix;
pub mod shift;
pub mod topology;

#[cfg(test)]
mod mock;

pub use bus::{scan, BusChannel};
pub use color::BiColor;
pub use driver::{BlinkRate, FlushMode, Ht16k33, DEFAULT_ADDRESS};
pub use embedded_graphics::pixelcolor::BinaryColor;
pub use matrix::{ImageSource, PixelMatrix, Sampled};
pub use topology::{Backpack16x8, Matrix16x8, Matrix8x8, Matrix8x8x2, Topology};

/// Errors returned by the driver.
///
/// # Type Parameters
/// - `E` - the error type of the underlying bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus reported an error while talking to the chip
    Bus(E),
    /// An image did not have the size of the matrix; sizes are (width, height)
    DimensionMismatch {
        /// Size of the matrix
        expected: (usize, usize),
        /// Size of the image
        actual: (usize, usize),
    },
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus error: {e:?}"),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "image is {}x{} but the matrix is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}
