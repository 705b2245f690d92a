//! Logical pixel matrix on top of one HT16K33.
//!
//! [`PixelMatrix`] combines a [`Ht16k33`] driver with a [`Topology`] and
//! exposes pixels by (x, y). Coordinates outside the matrix are ignored on
//! write and read back as `None`.
//!
//! # Example
//! ```rust,ignore
//! use embedded_graphics::pixelcolor::BinaryColor;
//! use ht16k33_matrix::matrix::PixelMatrix;
//! use ht16k33_matrix::topology::Matrix16x8;
//!
//! let mut matrix = PixelMatrix::<Matrix16x8, _>::new(i2c, 0x70)?;
//! matrix.fill(BinaryColor::Off)?;
//! matrix.set_pixel(0, 0, BinaryColor::On)?;
//! matrix.set_pixel(15, 7, BinaryColor::On)?;
//! ```
//!
//! The matrix is also an `embedded-graphics` [`DrawTarget`]; a whole drawing
//! is flushed once per `draw` call:
//! ```rust,ignore
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::{Line, PrimitiveStyle};
//!
//! Line::new(Point::new(0, 0), Point::new(7, 7))
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut matrix)?;
//! ```

use core::marker::PhantomData;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::image::GetPixel;
use embedded_graphics::prelude::{OriginDimensions, Point, Size};
use embedded_graphics::Pixel;

use crate::bus::BusChannel;
use crate::driver::{FlushMode, Ht16k33};
use crate::topology::Topology;
use crate::Error;

/// A rectangular source of pixel colors for [`PixelMatrix::load_image`].
///
/// Implemented for `[[C; WIDTH]; HEIGHT]` arrays (indexed `[y][x]`); wrap an
/// `embedded-graphics` image in [`Sampled`] to load it directly.
pub trait ImageSource {
    /// Color of one source pixel
    type Color;

    /// Size as (width, height)
    fn size(&self) -> (usize, usize);

    /// Color at `x`, `y`, or `None` if the source has no pixel there.
    fn pixel(&self, x: usize, y: usize) -> Option<Self::Color>;
}

impl<C: Copy, const WIDTH: usize, const HEIGHT: usize> ImageSource for [[C; WIDTH]; HEIGHT] {
    type Color = C;

    fn size(&self) -> (usize, usize) {
        (WIDTH, HEIGHT)
    }

    fn pixel(&self, x: usize, y: usize) -> Option<C> {
        self.get(y).and_then(|row| row.get(x)).copied()
    }
}

/// Adapter that samples any `embedded-graphics` image with a known size,
/// for example an [`ImageRaw`](embedded_graphics::image::ImageRaw).
pub struct Sampled<'a, I>(pub &'a I);

impl<I: GetPixel + OriginDimensions> ImageSource for Sampled<'_, I> {
    type Color = I::Color;

    fn size(&self) -> (usize, usize) {
        let size = self.0.size();
        (size.width as usize, size.height as usize)
    }

    fn pixel(&self, x: usize, y: usize) -> Option<I::Color> {
        let x = i32::try_from(x).ok()?;
        let y = i32::try_from(y).ok()?;
        self.0.pixel(Point::new(x, y))
    }
}

/// A matrix of pixels driven by one HT16K33.
///
/// # Type Parameters
/// - `T` - the wiring, one of the [`topology`](crate::topology) markers
/// - `B` - the bus, anything implementing [`BusChannel`]
pub struct PixelMatrix<T, B> {
    driver: Ht16k33<B>,
    _topology: PhantomData<T>,
}

impl<T: Topology, B: BusChannel> PixelMatrix<T, B> {
    /// Number of pixel columns
    pub const COLUMNS: usize = T::COLUMNS;
    /// Number of pixel rows
    pub const ROWS: usize = T::ROWS;

    /// Create and initialize a matrix on the chip at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the chip does not accept the setup commands.
    pub fn new(bus: B, address: u8) -> Result<Self, Error<B::Error>> {
        let mut driver = Ht16k33::new(bus, address);
        driver.initialize()?;
        Ok(Self::from_driver(driver))
    }

    /// Wrap a driver that has already been set up. Nothing is sent.
    pub const fn from_driver(driver: Ht16k33<B>) -> Self {
        Self {
            driver,
            _topology: PhantomData,
        }
    }

    /// Number of pixel columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        T::COLUMNS
    }

    /// Number of pixel rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        T::ROWS
    }

    /// Color of pixel `x`, `y`, or `None` if it is outside the matrix.
    #[must_use]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<T::Color> {
        T::get(self.driver.ram(), x, y)
    }

    /// Color of the pixel at `point`, or `None` if it is outside the matrix.
    #[must_use]
    pub fn get(&self, point: Point) -> Option<T::Color> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        self.get_pixel(x, y)
    }

    /// Set pixel `x`, `y` and flush. Pixels outside the matrix are ignored
    /// and nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush fails. The pixel is already set
    /// in the buffer and goes out with the next successful flush.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: T::Color) -> Result<(), Error<B::Error>> {
        if T::set(self.driver.ram_mut(), x, y, color) {
            self.driver.commit()
        } else {
            Ok(())
        }
    }

    /// Set every pixel to `color`, then flush once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush fails.
    pub fn fill(&mut self, color: T::Color) -> Result<(), Error<B::Error>> {
        T::fill(self.driver.ram_mut(), color);
        self.driver.commit()
    }

    /// Copy `image` onto the matrix, then flush once.
    ///
    /// Source pixels that the image cannot provide are written as off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the image is not exactly the
    /// size of the matrix; the buffer is left untouched. Returns
    /// [`Error::Bus`] if the flush fails.
    pub fn load_image<I>(&mut self, image: &I) -> Result<(), Error<B::Error>>
    where
        I: ImageSource + ?Sized,
        I::Color: Into<T::Color>,
    {
        let actual = image.size();
        if actual != T::size() {
            warn!(
                "image is {}x{}, matrix is {}x{}",
                actual.0,
                actual.1,
                T::COLUMNS,
                T::ROWS
            );
            return Err(Error::DimensionMismatch {
                expected: T::size(),
                actual,
            });
        }
        let ram = self.driver.ram_mut();
        for x in 0..T::COLUMNS {
            for y in 0..T::ROWS {
                let color = image.pixel(x, y).map_or(T::OFF, Into::into);
                T::set(ram, x, y, color);
            }
        }
        self.driver.commit()
    }

    /// Write the buffer to the chip now, whatever the flush mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the write fails.
    pub fn show(&mut self) -> Result<(), Error<B::Error>> {
        self.driver.flush()
    }

    /// Set the brightness, 0-15.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the command write fails.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error<B::Error>> {
        self.driver.set_brightness(level)
    }

    /// Set the blink rate, 0-3.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the command write fails.
    pub fn set_blink_rate(&mut self, rate: impl Into<u8>) -> Result<(), Error<B::Error>> {
        self.driver.set_blink_rate(rate)
    }

    /// Choose between flushing after every change and flushing only on
    /// [`show`](Self::show).
    pub fn set_flush_mode(&mut self, mode: FlushMode) {
        self.driver.set_flush_mode(mode);
    }

    /// The underlying driver.
    #[must_use]
    pub const fn driver(&self) -> &Ht16k33<B> {
        &self.driver
    }

    /// The underlying driver, mutably.
    pub fn driver_mut(&mut self) -> &mut Ht16k33<B> {
        &mut self.driver
    }

    /// Give the bus back.
    pub fn release(self) -> B {
        self.driver.release()
    }

    /// Flush after a batch of buffer changes, honoring the flush mode.
    pub(crate) fn commit(&mut self) -> Result<(), Error<B::Error>> {
        self.driver.commit()
    }

    pub(crate) fn ram_mut(&mut self) -> &mut crate::driver::DisplayRam {
        self.driver.ram_mut()
    }
}

impl<T: Topology, B: BusChannel> OriginDimensions for PixelMatrix<T, B> {
    fn size(&self) -> Size {
        Size::new(T::COLUMNS as u32, T::ROWS as u32)
    }
}

impl<T: Topology, B: BusChannel> DrawTarget for PixelMatrix<T, B> {
    type Color = T::Color;
    type Error = Error<B::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let ram = self.driver.ram_mut();
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                T::set(ram, x, y, color);
            }
        }
        self.driver.commit()
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color)
    }
}

impl<T, B> core::fmt::Debug for PixelMatrix<T, B>
where
    T: Topology,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelMatrix")
            .field("columns", &T::COLUMNS)
            .field("rows", &T::ROWS)
            .field("driver", &self.driver)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<T: Topology, B> defmt::Format for PixelMatrix<T, B> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "PixelMatrix<{}x{}> {}",
            T::COLUMNS,
            T::ROWS,
            self.driver
        );
    }
}
