//! Driver for a single HT16K33 controller chip.
//!
//! The chip holds 16 bytes of display RAM plus blink and dimming registers
//! and keeps the LEDs lit on its own, so the host only talks to it when
//! something changes. This module keeps an in-memory copy of the display RAM
//! and pushes it to the chip on [`Ht16k33::flush`].
//!
//! # Command words
//! Every setting is a single command byte whose high nibble selects the
//! register:
//! - `0010_000S` - system setup, `S` turns the oscillator on
//! - `1000_0BBD` - display setup, `BB` blink rate, `D` display on
//! - `1110_PPPP` - dimming, `PPPP` brightness 0-15
//!
//! # Buffer layout
//! The in-memory buffer is [`BUFFER_LEN`] bytes long. Byte 0 is always zero
//! and is sent as padding in front of the 16 data bytes; bytes 1..=16 hold
//! two bytes per row. Byte 0 doubles as the display RAM register address
//! (`0x00`), so a flush puts the whole buffer on the wire as one write.

use bitfield::bitfield;

use crate::bus::BusChannel;
use crate::topology::Cell;
use crate::Error;

/// Address of a backpack with no address jumpers bridged.
pub const DEFAULT_ADDRESS: u8 = 0x70;
/// Number of display RAM bytes on the chip.
pub const DISPLAY_RAM_LEN: usize = 16;
/// Length of the in-memory buffer: one padding byte plus the display RAM.
pub const BUFFER_LEN: usize = DISPLAY_RAM_LEN + 1;
/// Highest brightness level.
pub const MAX_BRIGHTNESS: u8 = 0x0F;
/// Highest blink rate value.
pub const MAX_BLINK_RATE: u8 = 0x03;

const DISPLAY_RAM_REGISTER: u8 = 0x00;
const SYSTEM_SETUP_BASE: u8 = 0b0010_0000;
const DISPLAY_SETUP_BASE: u8 = 0b1000_0000;
const DIMMING_BASE: u8 = 0b1110_0000;

bitfield! {
    /// System setup command.
    ///
    /// The bit layout is as follows:
    /// - Bits 7-4: `0010` command selector
    /// - Bit 0: Oscillator on
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    struct SystemSetup(u8);
    impl Debug;
    pub _, set_oscillator: 0;
}

impl SystemSetup {
    const fn new() -> Self {
        Self(SYSTEM_SETUP_BASE)
    }
}

bitfield! {
    /// Display setup command.
    ///
    /// The bit layout is as follows:
    /// - Bits 7-4: `1000` command selector
    /// - Bits 2-1: Blink rate
    /// - Bit 0: Display on
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    struct DisplaySetup(u8);
    impl Debug;
    pub _, set_blink: 2, 1;
    pub _, set_display_on: 0;
}

impl DisplaySetup {
    const fn new() -> Self {
        Self(DISPLAY_SETUP_BASE)
    }
}

bitfield! {
    /// Dimming command.
    ///
    /// The bit layout is as follows:
    /// - Bits 7-4: `1110` command selector
    /// - Bits 3-0: Brightness level
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    struct Dimming(u8);
    impl Debug;
    pub _, set_level: 3, 0;
}

impl Dimming {
    const fn new() -> Self {
        Self(DIMMING_BASE)
    }
}

/// Named blink rates accepted by [`Ht16k33::set_blink_rate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkRate {
    /// Steady display
    Off = 0,
    /// 2 Hz
    TwoHz = 1,
    /// 1 Hz
    OneHz = 2,
    /// 0.5 Hz
    HalfHz = 3,
}

impl From<BlinkRate> for u8 {
    fn from(rate: BlinkRate) -> Self {
        rate as u8
    }
}

/// When pixel writes reach the chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushMode {
    /// Every mutating call flushes before it returns. Single pixel writes
    /// flush once each, batch operations once at the end.
    #[default]
    Eager,
    /// Nothing is flushed implicitly; call [`Ht16k33::flush`] when ready.
    Deferred,
}

/// In-memory copy of the display RAM, including the leading padding byte.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct DisplayRam([u8; BUFFER_LEN]);

impl DisplayRam {
    /// All LEDs off.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; BUFFER_LEN])
    }

    /// Read the bit at `cell`.
    #[inline]
    #[must_use]
    pub fn bit(&self, cell: Cell) -> bool {
        self.0[cell.index()] & cell.mask() != 0
    }

    /// Set or clear the bit at `cell`.
    #[inline]
    pub fn set_bit(&mut self, cell: Cell, value: bool) {
        if value {
            self.0[cell.index()] |= cell.mask();
        } else {
            self.0[cell.index()] &= !cell.mask();
        }
    }

    /// Set every data byte to `value`. The padding byte is left alone.
    pub fn fill(&mut self, value: u8) {
        self.0[1..].fill(value);
    }

    /// Set the first byte of every row to `first` and the second to `second`.
    pub fn fill_rows(&mut self, first: u8, second: u8) {
        for row in self.0[1..].chunks_exact_mut(2) {
            row[0] = first;
            row[1] = second;
        }
    }

    /// The whole buffer, padding byte first. This is exactly what a flush
    /// puts on the wire.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.0
    }

    /// The 16 data bytes, without the padding byte.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.0[1..]
    }
}

impl Default for DisplayRam {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for DisplayRam {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("DisplayRam").field(&&self.0[1..]).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayRam {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "DisplayRam({=[u8]:#x})", &self.0[1..]);
    }
}

/// One HT16K33 chip on a bus.
///
/// # Example
/// ```rust,ignore
/// use ht16k33_matrix::driver::{Ht16k33, DEFAULT_ADDRESS};
///
/// let mut chip = Ht16k33::new(i2c, DEFAULT_ADDRESS);
/// chip.initialize()?;
/// chip.set_brightness(4)?;
/// ```
pub struct Ht16k33<B> {
    bus: B,
    address: u8,
    ram: DisplayRam,
    blink_rate: u8,
    brightness: u8,
    flush_mode: FlushMode,
}

impl<B: BusChannel> Ht16k33<B> {
    /// Create a driver for the chip at `address`. This does not touch the bus;
    /// call [`initialize`](Self::initialize) before using the display.
    pub const fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            ram: DisplayRam::new(),
            blink_rate: 0,
            brightness: MAX_BRIGHTNESS,
            flush_mode: FlushMode::Eager,
        }
    }

    /// Start the oscillator, switch the display on without blinking and set
    /// full brightness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if any of the three command writes fails.
    pub fn initialize(&mut self) -> Result<(), Error<B::Error>> {
        debug!("ht16k33 {:#x}: initialize", self.address);
        let mut setup = SystemSetup::new();
        setup.set_oscillator(true);
        self.write_command(setup.0)?;
        self.set_blink_rate(BlinkRate::Off)?;
        self.set_brightness(MAX_BRIGHTNESS)
    }

    /// Bus address of the chip.
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Last blink rate written.
    #[must_use]
    pub const fn blink_rate(&self) -> u8 {
        self.blink_rate
    }

    /// Last brightness written.
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Current flush mode.
    #[must_use]
    pub const fn flush_mode(&self) -> FlushMode {
        self.flush_mode
    }

    /// Switch between eager and deferred flushing. Switching does not flush.
    pub fn set_flush_mode(&mut self, mode: FlushMode) {
        debug!("ht16k33 {:#x}: flush mode eager={}", self.address, mode == FlushMode::Eager);
        self.flush_mode = mode;
    }

    /// Set the blink rate. Only the lowest two bits are used; see
    /// [`BlinkRate`] for the named values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the command write fails. The stored rate is
    /// updated regardless.
    pub fn set_blink_rate(&mut self, rate: impl Into<u8>) -> Result<(), Error<B::Error>> {
        let rate = rate.into() & MAX_BLINK_RATE;
        self.blink_rate = rate;
        debug!("ht16k33 {:#x}: blink rate {}", self.address, rate);
        let mut command = DisplaySetup::new();
        command.set_display_on(true);
        command.set_blink(rate);
        self.write_command(command.0)
    }

    /// Set the brightness, 0-15. Only the lowest four bits are used; level 0
    /// is dim but not off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the command write fails. The stored level is
    /// updated regardless.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error<B::Error>> {
        let level = level & MAX_BRIGHTNESS;
        self.brightness = level;
        debug!("ht16k33 {:#x}: brightness {}", self.address, level);
        let mut command = Dimming::new();
        command.set_level(level);
        self.write_command(command.0)
    }

    /// Write the 16 data bytes to the chip's display RAM, starting at
    /// register `0x00`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the write fails. The in-memory buffer keeps
    /// its contents, so flushing again later resynchronises the chip.
    pub fn flush(&mut self) -> Result<(), Error<B::Error>> {
        trace!("ht16k33 {:#x}: flush", self.address);
        self.bus
            .write_register(self.address, DISPLAY_RAM_REGISTER, self.ram.data())
            .map_err(|e| {
                warn!("ht16k33 {:#x}: flush failed", self.address);
                Error::Bus(e)
            })
    }

    /// Flush if the driver is in [`FlushMode::Eager`].
    pub(crate) fn commit(&mut self) -> Result<(), Error<B::Error>> {
        match self.flush_mode {
            FlushMode::Eager => self.flush(),
            FlushMode::Deferred => Ok(()),
        }
    }

    /// Read one bit of the buffer.
    #[must_use]
    pub fn read_bit(&self, cell: Cell) -> bool {
        self.ram.bit(cell)
    }

    /// Write one bit of the buffer, then flush (in eager mode).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush fails; the bit is already stored.
    pub fn write_bit(&mut self, cell: Cell, value: bool) -> Result<(), Error<B::Error>> {
        self.ram.set_bit(cell, value);
        self.commit()
    }

    /// Set all 16 data bytes to `value` without flushing.
    pub fn fill_raw(&mut self, value: u8) {
        self.ram.fill(value);
    }

    /// The in-memory buffer.
    #[must_use]
    pub const fn ram(&self) -> &DisplayRam {
        &self.ram
    }

    pub(crate) fn ram_mut(&mut self) -> &mut DisplayRam {
        &mut self.ram
    }

    /// Give the bus back.
    pub fn release(self) -> B {
        self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus(&self) -> &B {
        &self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn write_command(&mut self, command: u8) -> Result<(), Error<B::Error>> {
        self.bus.write(self.address, &[command]).map_err(Error::Bus)
    }
}

impl<B> core::fmt::Debug for Ht16k33<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ht16k33")
            .field("address", &self.address)
            .field("blink_rate", &self.blink_rate)
            .field("brightness", &self.brightness)
            .field("flush_mode", &self.flush_mode)
            .field("ram", &self.ram)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "defmt")]
impl<B> defmt::Format for Ht16k33<B> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Ht16k33 {{ address: {=u8:#x}, blink_rate: {}, brightness: {}, flush_mode: {}, ram: {} }}",
            self.address,
            self.blink_rate,
            self.brightness,
            self.flush_mode,
            self.ram
        );
    }
}
