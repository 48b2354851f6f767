//! Application-wide constants and compile-time configuration.
//!
//! Pin assignments, timing parameters, USB identity and the drum key
//! mapping live here so they can be tuned in one place.

use crate::hid::keyboard::KeyCode;
use crate::hid::synthesizer::KeyMapping;

// Drum controller

/// Interval between controller polls (ms). Matches the 1 ms USB frame.
pub const POLL_INTERVAL_MS: u64 = 1;

/// I²C bus clock (kHz). Wii extension controllers are specified for 100 kHz
/// but tolerate 400 kHz.
pub const I2C_FREQUENCY_KHZ: u32 = 100;

/// Consecutive identical reads required before a zone change is accepted
/// (only used with the `debounce` feature).
pub const DEBOUNCE_POLLS: u8 = 3;

/// Key sent for each drum zone, in slot order
/// (CenterLeft, RimLeft, CenterRight, RimRight).
///
/// Taiko simulators commonly bind don to X / `.` and ka to Z / `/`.
pub const KEY_MAPPING: KeyMapping =
    KeyMapping::new([KeyCode::X, KeyCode::Z, KeyCode::Period, KeyCode::Slash]);

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "tatacon2usb";
pub const USB_PRODUCT: &str = "Taiko Drum Keyboard";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms). 1 ms = 1000 Hz for lowest latency.
pub const USB_HID_POLL_MS: u8 = 1;

/// Bus power draw declared to the host (mA). Covers the drum controller.
pub const USB_MAX_POWER_MA: u16 = 100;

// GPIO pin assignments (nRF52840-DK defaults)
//
// The actual `embassy_nrf::peripherals::*` pins are picked in `main.rs`.
//
//   I²C SDA (drum data)   → P0.26
//   I²C SCL (drum clock)  → P0.27
