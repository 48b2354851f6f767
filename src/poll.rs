//! One controller poll per loop iteration.
//!
//! [`DrumPoller`] reads the status byte, runs it through the configured
//! [`StatusFilter`] and keeps a count of consecutive bus failures. When a
//! read fails nothing is handed to the switch bank, so the switches hold
//! their last known state instead of acting on a garbage byte.

use crate::controller::ControllerLink;
use crate::debounce::{Passthrough, StatusFilter};
use crate::error::Error;
use crate::switches::SwitchBank;
use embedded_hal::i2c::I2c;

pub struct DrumPoller<I2C, F = Passthrough> {
    link: ControllerLink<I2C>,
    filter: F,
    consecutive_failures: u32,
}

impl<I2C: I2c> DrumPoller<I2C, Passthrough> {
    /// Poller that applies every read unfiltered.
    pub fn new(link: ControllerLink<I2C>) -> Self {
        Self::with_filter(link, Passthrough)
    }
}

impl<I2C: I2c, F: StatusFilter> DrumPoller<I2C, F> {
    pub fn with_filter(link: ControllerLink<I2C>, filter: F) -> Self {
        Self {
            link,
            filter,
            consecutive_failures: 0,
        }
    }

    /// Run the controller's init handshake.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.link.initialize()
    }

    /// Read and filter one status byte.
    pub fn read(&mut self) -> Result<u8, Error> {
        match self.link.read_status_byte() {
            Ok(raw) => {
                self.consecutive_failures = 0;
                Ok(self.filter.filter(raw))
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                Err(e)
            }
        }
    }

    /// Read one status byte and apply it to `bank`.
    ///
    /// On error the bank is left untouched.
    pub fn poll(&mut self, bank: &mut SwitchBank) -> Result<(), Error> {
        let status = self.read()?;
        bank.update(status);
        Ok(())
    }

    /// Number of failed reads since the last successful one.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn into_link(self) -> ControllerLink<I2C> {
        self.link
    }
}
