//! Scrolling the whole picture.
//!
//! A shift moves every pixel by whole steps. Positive steps go right or down
//! (toward the higher index), negative steps left or up. With `wrap` the pixels
//! pushed off one edge come back in on the opposite edge; without it the
//! vacated edge is switched off.
//!
//! Each unit step is flushed on its own, so a shift by several steps shows as
//! a short scroll animation in [`FlushMode::Eager`](crate::driver::FlushMode).

use crate::bus::BusChannel;
use crate::driver::DisplayRam;
use crate::matrix::PixelMatrix;
use crate::topology::Topology;
use crate::Error;

impl<T: Topology, B: BusChannel> PixelMatrix<T, B> {
    /// Shift by `dx` columns, then by `dy` rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a flush fails. Steps already taken stay in
    /// the buffer; the remaining steps are not applied.
    pub fn shift(&mut self, dx: i32, dy: i32, wrap: bool) -> Result<(), Error<B::Error>> {
        trace!("shift dx={} dy={} wrap={}", dx, dy, wrap);
        for _ in 0..dx.unsigned_abs() {
            step_columns::<T>(self.ram_mut(), dx > 0, wrap);
            self.commit()?;
        }
        for _ in 0..dy.unsigned_abs() {
            step_rows::<T>(self.ram_mut(), dy > 0, wrap);
            self.commit()?;
        }
        Ok(())
    }

    /// Shift one column to the right.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush fails.
    pub fn shift_right(&mut self, wrap: bool) -> Result<(), Error<B::Error>> {
        self.shift(1, 0, wrap)
    }

    /// Shift one column to the left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush fails.
    pub fn shift_left(&mut self, wrap: bool) -> Result<(), Error<B::Error>> {
        self.shift(-1, 0, wrap)
    }

    /// Shift one row up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush fails.
    pub fn shift_up(&mut self, wrap: bool) -> Result<(), Error<B::Error>> {
        self.shift(0, -1, wrap)
    }

    /// Shift one row down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush fails.
    pub fn shift_down(&mut self, wrap: bool) -> Result<(), Error<B::Error>> {
        self.shift(0, 1, wrap)
    }
}

/// Move every row one column toward the higher (`forward`) or lower x.
fn step_columns<T: Topology>(ram: &mut DisplayRam, forward: bool, wrap: bool) {
    let last = T::COLUMNS - 1;
    for y in 0..T::ROWS {
        let pixel = |ram: &DisplayRam, x| T::get(ram, x, y).unwrap_or(T::OFF);
        if forward {
            let fallen = pixel(ram, last);
            for x in (1..=last).rev() {
                let color = pixel(ram, x - 1);
                T::set(ram, x, y, color);
            }
            T::set(ram, 0, y, if wrap { fallen } else { T::OFF });
        } else {
            let fallen = pixel(ram, 0);
            for x in 0..last {
                let color = pixel(ram, x + 1);
                T::set(ram, x, y, color);
            }
            T::set(ram, last, y, if wrap { fallen } else { T::OFF });
        }
    }
}

/// Move every column one row toward the higher (`forward`) or lower y.
fn step_rows<T: Topology>(ram: &mut DisplayRam, forward: bool, wrap: bool) {
    let last = T::ROWS - 1;
    for x in 0..T::COLUMNS {
        let pixel = |ram: &DisplayRam, y| T::get(ram, x, y).unwrap_or(T::OFF);
        if forward {
            let fallen = pixel(ram, last);
            for y in (1..=last).rev() {
                let color = pixel(ram, y - 1);
                T::set(ram, x, y, color);
            }
            T::set(ram, x, 0, if wrap { fallen } else { T::OFF });
        } else {
            let fallen = pixel(ram, 0);
            for y in 0..last {
                let color = pixel(ram, y + 1);
                T::set(ram, x, y, color);
            }
            T::set(ram, x, last, if wrap { fallen } else { T::OFF });
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_hal::i2c::ErrorKind;

    use crate::color::BiColor;
    use crate::driver::FlushMode;
    use crate::matrix::PixelMatrix;
    use crate::mock::RecordingBus;
    use crate::topology::{Backpack16x8, Matrix16x8, Matrix8x8, Matrix8x8x2, Topology};
    use crate::Error;

    fn matrix<T: Topology>() -> PixelMatrix<T, RecordingBus> {
        let mut matrix = PixelMatrix::new(RecordingBus::new(), 0x70).unwrap();
        matrix.driver_mut().bus_mut().clear();
        matrix
    }

    fn lit<T: Topology<Color = BinaryColor>, B: crate::bus::BusChannel>(
        m: &PixelMatrix<T, B>,
    ) -> std::vec::Vec<(usize, usize)> {
        let mut out = std::vec::Vec::new();
        for y in 0..T::ROWS {
            for x in 0..T::COLUMNS {
                if m.get_pixel(x, y) == Some(BinaryColor::On) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_shift_right_moves_pixel() {
        let mut m = matrix::<Matrix8x8>();
        m.set_pixel(2, 3, BinaryColor::On).unwrap();
        m.shift_right(false).unwrap();
        assert_eq!(lit(&m), [(3, 3)]);
        m.shift_left(false).unwrap();
        assert_eq!(lit(&m), [(2, 3)]);
    }

    #[test]
    fn test_shift_down_is_positive_y() {
        let mut m = matrix::<Matrix16x8>();
        m.set_pixel(10, 0, BinaryColor::On).unwrap();
        m.shift_down(false).unwrap();
        assert_eq!(lit(&m), [(10, 1)]);
        m.shift_up(false).unwrap();
        m.shift_up(false).unwrap();
        assert!(lit(&m).is_empty());
    }

    #[test]
    fn test_non_wrapping_shift_clears_edge() {
        let mut m = matrix::<Backpack16x8>();
        m.fill(BinaryColor::On).unwrap();
        m.shift(2, 0, false).unwrap();
        for y in 0..8 {
            assert_eq!(m.get_pixel(0, y), Some(BinaryColor::Off));
            assert_eq!(m.get_pixel(1, y), Some(BinaryColor::Off));
            for x in 2..16 {
                assert_eq!(m.get_pixel(x, y), Some(BinaryColor::On));
            }
        }

        m.shift(0, -3, false).unwrap();
        for x in 2..16 {
            assert_eq!(m.get_pixel(x, 4), Some(BinaryColor::On));
            assert_eq!(m.get_pixel(x, 5), Some(BinaryColor::Off));
        }
    }

    #[test]
    fn test_wrapping_shift_carries_pixel_around() {
        let mut m = matrix::<Matrix8x8>();
        m.set_pixel(7, 0, BinaryColor::On).unwrap();
        m.shift_right(true).unwrap();
        assert_eq!(lit(&m), [(0, 0)]);
        m.shift_up(true).unwrap();
        assert_eq!(lit(&m), [(0, 7)]);
    }

    #[test]
    fn test_full_wrap_restores_grid() {
        let mut m = matrix::<Matrix16x8>();
        for (x, y) in [(0, 0), (3, 1), (8, 2), (15, 7), (9, 5)] {
            m.set_pixel(x, y, BinaryColor::On).unwrap();
        }
        let before = *m.driver().ram();

        m.shift(16, 0, true).unwrap();
        assert_eq!(m.driver().ram(), &before);
        m.shift(0, -8, true).unwrap();
        assert_eq!(m.driver().ram(), &before);
        m.shift(-5, 3, true).unwrap();
        m.shift(5, -3, true).unwrap();
        assert_eq!(m.driver().ram(), &before);
    }

    #[test]
    fn test_one_flush_per_step() {
        let mut m = matrix::<Matrix8x8>();
        m.shift(3, -2, true).unwrap();
        assert_eq!(m.driver().bus().flushes(), 5);
    }

    #[test]
    fn test_zero_shift_is_noop() {
        let mut m = matrix::<Matrix8x8>();
        m.set_pixel(1, 1, BinaryColor::On).unwrap();
        let before = *m.driver().ram();
        m.driver_mut().bus_mut().clear();

        m.shift(0, 0, false).unwrap();
        assert_eq!(m.driver().ram(), &before);
        assert!(m.driver().bus().writes().is_empty());
    }

    #[test]
    fn test_deferred_shift_does_not_flush() {
        let mut m = matrix::<Matrix8x8>();
        m.set_flush_mode(FlushMode::Deferred);
        m.set_pixel(0, 0, BinaryColor::On).unwrap();
        m.shift(4, 4, false).unwrap();
        assert_eq!(lit(&m), [(4, 4)]);
        assert!(m.driver().bus().writes().is_empty());
    }

    #[test]
    fn test_shift_stops_on_bus_error() {
        let mut m = matrix::<Matrix8x8>();
        m.set_pixel(0, 0, BinaryColor::On).unwrap();
        m.driver_mut().bus_mut().fail_next(ErrorKind::Bus);

        assert_eq!(m.shift(3, 0, false), Err(Error::Bus(ErrorKind::Bus)));
        // the first step is in the buffer, the other two were never taken
        assert_eq!(lit(&m), [(1, 0)]);
    }

    #[test]
    fn test_bicolor_shift() {
        let mut m = matrix::<Matrix8x8x2>();
        m.set_pixel(0, 0, BiColor::Red).unwrap();
        m.set_pixel(1, 0, BiColor::Green).unwrap();
        m.set_pixel(7, 0, BiColor::Yellow).unwrap();

        m.shift_right(true).unwrap();
        assert_eq!(m.get_pixel(0, 0), Some(BiColor::Yellow));
        assert_eq!(m.get_pixel(1, 0), Some(BiColor::Red));
        assert_eq!(m.get_pixel(2, 0), Some(BiColor::Green));
        assert_eq!(m.get_pixel(7, 0), Some(BiColor::Off));

        m.shift_down(false).unwrap();
        assert_eq!(m.get_pixel(0, 0), Some(BiColor::Off));
        assert_eq!(m.get_pixel(0, 1), Some(BiColor::Yellow));
        assert_eq!(m.get_pixel(2, 1), Some(BiColor::Green));
    }
}
