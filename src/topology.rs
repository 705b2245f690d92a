//! Coordinate mapping for the supported matrix wirings.
//!
//! The HT16K33 has 16 row outputs and 8 common outputs. Its display RAM holds
//! two bytes per common, and how those bits end up as pixels depends on how
//! the LED matrix is wired to the chip. Every wiring is a [`Topology`]:
//! - [`Matrix8x8`] - a single 8x8 backpack
//! - [`Matrix16x8`] - the 16x8 "wing", two 8x8 matrices chained on one chip
//! - [`Backpack16x8`] - a 16x8 backpack where one chip spans all 16 columns
//! - [`Matrix8x8x2`] - an 8x8 bi-color (red/green) backpack
//!
//! All of them reduce to the same raw grid of 16 columns by 8 rows, see
//! [`Cell::at`]. The mapping functions are pure and are exported so the
//! physical layout can be checked without a bus.

use embedded_graphics::pixelcolor::{BinaryColor, PixelColor};

use crate::color::BiColor;
use crate::driver::DisplayRam;

/// Number of columns of the raw grid.
pub const RAW_COLUMNS: usize = 16;
/// Number of rows of the raw grid.
pub const RAW_ROWS: usize = 8;

/// One LED bit inside the display buffer.
///
/// A cell can only be obtained from [`Cell::at`] or the `map_*` functions, so
/// its index always lies in 1..=16 and the padding byte is never addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    index: usize,
    mask: u8,
}

impl Cell {
    /// Cell of column `col` (0..16) and row `row` (0..8) of the raw grid, or
    /// `None` outside the grid.
    #[inline]
    #[must_use]
    pub const fn at(col: usize, row: usize) -> Option<Self> {
        if col >= RAW_COLUMNS || row >= RAW_ROWS {
            return None;
        }
        Some(Self::raw(col, row))
    }

    /// Byte index into the buffer, 1..=16 (byte 0 is padding).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Bit mask within that byte.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u8 {
        self.mask
    }

    const fn raw(col: usize, row: usize) -> Self {
        Self {
            index: 2 * row + col / 8 + 1,
            mask: 1 << (col % 8),
        }
    }
}

/// Map a pixel of a single 8x8 matrix.
///
/// The x coordinate is rotated by one column (`x' = (x - 1) mod 8`), so pixel
/// (1, 0) is the LED at raw column 0 and pixel (0, 0) the one at raw column 7.
/// Existing drawings depend on this placement.
#[must_use]
pub const fn map_matrix_8x8(x: usize, y: usize) -> Option<Cell> {
    if x >= 8 || y >= 8 {
        return None;
    }
    Some(Cell::raw((x + 7) % 8, y))
}

/// Map a pixel of the chained 16x8 matrix. The right half is folded under
/// the left one (x - 8, y + 8) and the axes are swapped.
#[must_use]
pub const fn map_matrix_16x8(x: usize, y: usize) -> Option<Cell> {
    if x >= 16 || y >= 8 {
        return None;
    }
    let (x, y) = if x >= 8 { (x - 8, y + 8) } else { (x, y) };
    Some(Cell::raw(y, x))
}

/// Map a pixel of the 16x8 backpack, which uses the raw grid as is.
#[must_use]
pub const fn map_backpack_16x8(x: usize, y: usize) -> Option<Cell> {
    if x >= 16 || y >= 8 {
        return None;
    }
    Some(Cell::raw(x, y))
}

/// Map a pixel of the bi-color matrix to its red and green plane cells.
#[must_use]
pub const fn map_bicolor_8x8(x: usize, y: usize) -> Option<(Cell, Cell)> {
    if x >= 8 || y >= 8 {
        return None;
    }
    Some((Cell::raw(y, x), Cell::raw(y + 8, x)))
}

/// A physical matrix wiring.
///
/// Implementors are marker types handed to
/// [`PixelMatrix`](crate::matrix::PixelMatrix) as a type argument; all methods
/// are associated functions operating on a [`DisplayRam`].
pub trait Topology {
    /// Number of pixel columns
    const COLUMNS: usize;
    /// Number of pixel rows
    const ROWS: usize;
    /// Color of one pixel
    type Color: PixelColor;
    /// The color of an unlit pixel
    const OFF: Self::Color;

    /// Read pixel `x`, `y`, or `None` if it is outside the matrix.
    fn get(ram: &DisplayRam, x: usize, y: usize) -> Option<Self::Color>;

    /// Write pixel `x`, `y`. Returns `false` without touching `ram` if the
    /// pixel is outside the matrix.
    fn set(ram: &mut DisplayRam, x: usize, y: usize, color: Self::Color) -> bool;

    /// Set every pixel to `color`.
    fn fill(ram: &mut DisplayRam, color: Self::Color);

    /// Size of the matrix as (columns, rows)
    #[inline]
    #[must_use]
    fn size() -> (usize, usize) {
        (Self::COLUMNS, Self::ROWS)
    }
}

/// A single 8x8 matrix.
pub struct Matrix8x8 {}

/// The 16x8 matrix wing: two 8x8 matrices chained on one chip.
pub struct Matrix16x8 {}

/// A 16x8 backpack. Drive two of them at different addresses to build a
/// 32x8 display.
pub struct Backpack16x8 {}

/// An 8x8 bi-color matrix.
pub struct Matrix8x8x2 {}

#[inline]
fn mono_get(ram: &DisplayRam, cell: Option<Cell>) -> Option<BinaryColor> {
    cell.map(|cell| {
        if ram.bit(cell) {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    })
}

#[inline]
fn mono_set(ram: &mut DisplayRam, cell: Option<Cell>, color: BinaryColor) -> bool {
    match cell {
        Some(cell) => {
            ram.set_bit(cell, color == BinaryColor::On);
            true
        }
        None => false,
    }
}

#[inline]
fn mono_fill(ram: &mut DisplayRam, color: BinaryColor) {
    ram.fill(if color == BinaryColor::On { 0xFF } else { 0x00 });
}

impl Topology for Matrix8x8 {
    const COLUMNS: usize = 8;
    const ROWS: usize = 8;
    type Color = BinaryColor;
    const OFF: BinaryColor = BinaryColor::Off;

    fn get(ram: &DisplayRam, x: usize, y: usize) -> Option<BinaryColor> {
        mono_get(ram, map_matrix_8x8(x, y))
    }

    fn set(ram: &mut DisplayRam, x: usize, y: usize, color: BinaryColor) -> bool {
        mono_set(ram, map_matrix_8x8(x, y), color)
    }

    fn fill(ram: &mut DisplayRam, color: BinaryColor) {
        mono_fill(ram, color);
    }
}

impl Topology for Matrix16x8 {
    const COLUMNS: usize = 16;
    const ROWS: usize = 8;
    type Color = BinaryColor;
    const OFF: BinaryColor = BinaryColor::Off;

    fn get(ram: &DisplayRam, x: usize, y: usize) -> Option<BinaryColor> {
        mono_get(ram, map_matrix_16x8(x, y))
    }

    fn set(ram: &mut DisplayRam, x: usize, y: usize, color: BinaryColor) -> bool {
        mono_set(ram, map_matrix_16x8(x, y), color)
    }

    fn fill(ram: &mut DisplayRam, color: BinaryColor) {
        mono_fill(ram, color);
    }
}

impl Topology for Backpack16x8 {
    const COLUMNS: usize = 16;
    const ROWS: usize = 8;
    type Color = BinaryColor;
    const OFF: BinaryColor = BinaryColor::Off;

    fn get(ram: &DisplayRam, x: usize, y: usize) -> Option<BinaryColor> {
        mono_get(ram, map_backpack_16x8(x, y))
    }

    fn set(ram: &mut DisplayRam, x: usize, y: usize, color: BinaryColor) -> bool {
        mono_set(ram, map_backpack_16x8(x, y), color)
    }

    fn fill(ram: &mut DisplayRam, color: BinaryColor) {
        mono_fill(ram, color);
    }
}

impl Topology for Matrix8x8x2 {
    const COLUMNS: usize = 8;
    const ROWS: usize = 8;
    type Color = BiColor;
    const OFF: BiColor = BiColor::Off;

    fn get(ram: &DisplayRam, x: usize, y: usize) -> Option<BiColor> {
        let (red, green) = map_bicolor_8x8(x, y)?;
        Some(BiColor::from_bits(
            u8::from(ram.bit(red)) | (u8::from(ram.bit(green)) << 1),
        ))
    }

    fn set(ram: &mut DisplayRam, x: usize, y: usize, color: BiColor) -> bool {
        let Some((red, green)) = map_bicolor_8x8(x, y) else {
            return false;
        };
        ram.set_bit(red, color.red());
        ram.set_bit(green, color.green());
        true
    }

    fn fill(ram: &mut DisplayRam, color: BiColor) {
        // the red plane is the first byte of every row, green the second
        let plane = |lit: bool| if lit { 0xFF } else { 0x00 };
        ram.fill_rows(plane(color.red()), plane(color.green()));
    }
}
