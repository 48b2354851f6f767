//! Unified error type for tatacon2usb.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

use embedded_hal::i2c::ErrorKind;

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Two-wire bus
    /// A transaction with the drum controller failed.
    Bus(BusError),

    // USB
    /// USB endpoint write failed or the endpoint is disabled.
    Usb,
}

/// Subset of I²C failures we distinguish (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Address or data byte was not acknowledged (controller absent or busy).
    NoAcknowledge,
    /// Another master won arbitration.
    ArbitrationLoss,
    /// Misplaced start/stop condition or similar bus-level fault.
    Bus,
    /// Receive buffer overrun in the bus peripheral.
    Overrun,
    /// Anything the HAL could not classify.
    Other,
}

// Convenience conversions

impl From<ErrorKind> for BusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(_) => BusError::NoAcknowledge,
            ErrorKind::ArbitrationLoss => BusError::ArbitrationLoss,
            ErrorKind::Bus => BusError::Bus,
            ErrorKind::Overrun => BusError::Overrun,
            _ => BusError::Other,
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}
