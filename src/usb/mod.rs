//! USB Device subsystem - presents the drum to the host as a keyboard.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The device has a single HID interface:
//!
//! - Interface 0: Keyboard (boot protocol), interrupt IN + OUT
//!
//! The poll loop in `main.rs` writes reports to the IN endpoint; host
//! reports and HID class requests are answered from the shared
//! [`tatacon2usb::DrumBridge`].

pub mod hid_device;
