//! Two-wire link to the drum controller.
//!
//! The controller speaks the Wii extension protocol. Bringing it up takes
//! two register writes that disable payload encryption, after which the
//! button byte can be fetched by latching register `0x05` and reading one
//! byte back.
//!
//! Every step is its own transaction with a stop condition in between.
//! The controller does not accept a repeated-start write-read.

use crate::error::{BusError, Error};
use embedded_hal::i2c::{Error as _, I2c};

/// 7-bit bus address of Wii extension controllers (0xA4 as a write address).
pub const CONTROLLER_ADDRESS: u8 = 0x52;

/// First init write: `0x55` to register `0xF0`.
pub const UNLOCK_SEQUENCE: [u8; 2] = [0xF0, 0x55];

/// Second init write: `0x00` to register `0xFB`.
pub const MODE_SELECT_SEQUENCE: [u8; 2] = [0xFB, 0x00];

/// Register holding the button status byte.
pub const STATUS_REGISTER: u8 = 0x05;

/// Owns the bus handle and the controller's address.
pub struct ControllerLink<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> ControllerLink<I2C> {
    /// Link to a controller at the standard address.
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, CONTROLLER_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Send the unlock and mode-select sequences.
    ///
    /// Both writes are always attempted, even if the first one is not
    /// acked. Nothing is read back; the first failure (if any) is returned.
    pub fn initialize(&mut self) -> Result<(), Error> {
        let unlock = self.write(&UNLOCK_SEQUENCE);
        let mode_select = self.write(&MODE_SELECT_SEQUENCE);
        unlock.and(mode_select)
    }

    /// Latch the status register, then read one byte (NAK'd, terminal).
    pub fn read_status_byte(&mut self) -> Result<u8, Error> {
        self.write(&[STATUS_REGISTER])?;

        let mut status = [0u8; 1];
        self.i2c
            .read(self.address, &mut status)
            .map_err(|e| BusError::from(e.kind()))?;
        Ok(status[0])
    }

    /// Give the bus back (e.g. to share it or in tests).
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write<const N: usize>(&mut self, bytes: &[u8; N]) -> Result<(), Error> {
        // Staged on the stack: DMA-backed drivers (nRF TWIM) cannot send from flash.
        let frame = *bytes;
        self.i2c
            .write(self.address, &frame)
            .map_err(|e| Error::Bus(e.kind().into()))
    }
}
