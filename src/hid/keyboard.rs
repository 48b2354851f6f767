//! Boot-protocol keyboard report carrying the four drum slots.
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0:   Modifier bitfield  - always 0, the drum has no modifiers
//! Byte 1:   Reserved           - always 0
//! Byte 2-5: Drum slots         - CenterLeft, RimLeft, CenterRight, RimRight
//! Byte 6-7: Unused key slots   - always 0
//! ```
//!
//! Each drum zone owns a fixed slot, so simultaneous hits never collide
//! and a release only ever clears its own byte.

use crate::switches::SWITCH_COUNT;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Number of key-code slots in a boot keyboard report.
pub const KEY_SLOTS: usize = 6;

/// USB HID keyboard usages (Usage Page 0x07) usable in a key mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeyCode {
    /// Reserved "no event" usage, sent for released slots.
    None = 0x00,
    A = 0x04,
    D = 0x07,
    F = 0x09,
    J = 0x0D,
    K = 0x0E,
    S = 0x16,
    X = 0x1B,
    Z = 0x1D,
    Enter = 0x28,
    Space = 0x2C,
    Semicolon = 0x33,
    Comma = 0x36,
    /// `.` and `>`.
    Period = 0x37,
    /// `/` and `?`.
    Slash = 0x38,
    RightArrow = 0x4F,
    LeftArrow = 0x50,
    DownArrow = 0x51,
    UpArrow = 0x52,
}

impl KeyCode {
    /// Raw usage ID as written into a report slot.
    pub const fn usage(self) -> u8 {
        self as u8
    }
}

impl From<KeyCode> for u8 {
    fn from(key: KeyCode) -> u8 {
        key.usage()
    }
}

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Key-code slots; the first [`SWITCH_COUNT`] belong to the drum.
    pub keycodes: [u8; KEY_SLOTS],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; KEY_SLOTS],
        }
    }

    /// The drum slots, in switch order.
    pub fn drum_slots(&self) -> &[u8] {
        &self.keycodes[..SWITCH_COUNT]
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (8), or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..KEYBOARD_REPORT_SIZE].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// Wire representation of the report.
    pub fn to_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        self.serialize(&mut buf);
        buf
    }

    /// Returns `true` if no keys are pressed (release event).
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

/// USB HID Report Descriptor for a boot-protocol keyboard.
///
/// Input: 8 modifier bits, 1 reserved byte, 6 key-code bytes.
/// Output: 5 LED bits plus 3 bits padding. The drum has no LEDs but hosts
/// expect the output report on anything claiming boot keyboard support.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    0xC0, // End Collection
];
