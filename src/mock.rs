//! Recording I2C bus used by the unit tests.
//!
//! Unlike `embedded-hal-mock` it does not need every transfer spelled out up
//! front, which keeps tests that touch many pixels (and so flush many times)
//! readable.

extern crate std;

use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

#[derive(Debug, Default)]
pub(crate) struct RecordingBus {
    writes: Vec<(u8, Vec<u8>)>,
    devices: Option<Vec<u8>>,
    fail_next: Option<ErrorKind>,
}

impl RecordingBus {
    /// A bus where every address acknowledges.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A bus where only `devices` acknowledge.
    pub(crate) fn with_devices(devices: &[u8]) -> Self {
        Self {
            devices: Some(devices.to_vec()),
            ..Self::default()
        }
    }

    /// Fail the next transaction with `error`.
    pub(crate) fn fail_next(&mut self, error: ErrorKind) {
        self.fail_next = Some(error);
    }

    pub(crate) fn writes(&self) -> &[(u8, Vec<u8>)] {
        &self.writes
    }

    /// Writes that carried a display RAM payload (register byte + 16 bytes).
    pub(crate) fn flushes(&self) -> usize {
        self.writes.iter().filter(|(_, bytes)| is_flush(bytes)).count()
    }

    /// The 17 bytes sent by the most recent flush. Byte 0 is the register.
    pub(crate) fn last_flush(&self) -> Option<&[u8]> {
        self.writes
            .iter()
            .rev()
            .find(|(_, bytes)| is_flush(bytes))
            .map(|(_, bytes)| bytes.as_slice())
    }

    pub(crate) fn clear(&mut self) {
        self.writes.clear();
    }
}

fn is_flush(bytes: &[u8]) -> bool {
    bytes.len() == 17 && bytes[0] == 0x00
}

impl ErrorType for RecordingBus {
    type Error = ErrorKind;
}

impl I2c for RecordingBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        if let Some(devices) = &self.devices {
            if !devices.contains(&address) {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
        }
        let mut bytes = Vec::new();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(data) => bytes.extend_from_slice(data),
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        self.writes.push((address, bytes));
        Ok(())
    }
}
