use core::convert::Infallible;

use embedded_hal::i2c::{ErrorType, I2c, Operation};

/// Bus that accepts every transaction and drops the bytes.
pub struct NullBus;

impl ErrorType for NullBus {
    type Error = Infallible;
}

impl I2c for NullBus {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        std::hint::black_box(operations);
        Ok(())
    }
}
