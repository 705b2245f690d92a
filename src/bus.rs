//! The two-wire bus as seen by the driver.
//!
//! The driver only ever needs to push bytes at a device: single command bytes
//! and the display RAM payload. [`BusChannel`] captures exactly that surface
//! and is implemented for every [`embedded_hal::i2c::I2c`], so any HAL bus (or
//! a shared-bus adapter such as `embedded-hal-bus`'s `RefCellDevice`) can be
//! handed straight to a [`Ht16k33`](crate::driver::Ht16k33).

use embedded_hal::i2c::{I2c, Operation};

/// First 7-bit address probed by [`scan`]; lower addresses are reserved.
pub const SCAN_FIRST: u8 = 0x08;
/// Last 7-bit address probed by [`scan`]; higher addresses are reserved.
pub const SCAN_LAST: u8 = 0x77;

/// Minimal write-only transport to devices on a two-wire bus.
pub trait BusChannel {
    /// Transport error, handed back to the caller unchanged.
    type Error: core::fmt::Debug;

    /// Write `bytes` to the device at `address`.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the device does not acknowledge or the
    /// bus fails.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Write `register` followed by `bytes` to the device at `address` as one
    /// bus transaction.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the device does not acknowledge or the
    /// bus fails.
    fn write_register(&mut self, address: u8, register: u8, bytes: &[u8])
        -> Result<(), Self::Error>;
}

impl<I: I2c> BusChannel for I {
    type Error = I::Error;

    #[inline]
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        I2c::write(self, address, bytes)
    }

    #[inline]
    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        bytes: &[u8],
    ) -> Result<(), Self::Error> {
        // adjacent writes are sent without a repeated start
        self.transaction(
            address,
            &mut [Operation::Write(&[register]), Operation::Write(bytes)],
        )
    }
}

/// Iterator over the addresses that answered a [`scan`].
pub struct Scan<'a, B> {
    bus: &'a mut B,
    next: u8,
}

impl<B: BusChannel> Iterator for Scan<'_, B> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.next <= SCAN_LAST {
            let address = self.next;
            self.next += 1;
            if self.bus.write(address, &[]).is_ok() {
                trace!("scan: device at {:#x}", address);
                return Some(address);
            }
        }
        None
    }
}

/// Probe every non-reserved 7-bit address with an empty write and yield the
/// ones that acknowledge.
///
/// This is a diagnostic aid only; nothing else in the crate depends on it.
///
/// # Example
/// ```rust,ignore
/// let found = ht16k33_matrix::bus::scan(&mut i2c).next();
/// ```
pub fn scan<B: BusChannel>(bus: &mut B) -> Scan<'_, B> {
    Scan {
        bus,
        next: SCAN_FIRST,
    }
}
