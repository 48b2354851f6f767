//! Optional pre-filter for raw status bytes.
//!
//! The baseline firmware feeds every bus read straight into the switch
//! bank, so a single glitched read shows up as a hit. [`Debouncer`] holds
//! each zone's accepted value until the bus has returned the same new value
//! for `threshold` consecutive polls. Zones are filtered independently so a
//! bouncing rim never delays a clean center hit.
//!
//! Only bits 6..3 are filtered; the rest of the byte passes through.

use crate::switches::{SwitchId, STATUS_IDLE, STATUS_MASK, SWITCH_COUNT};

/// Transforms a raw status byte before it reaches the switch bank.
pub trait StatusFilter {
    fn filter(&mut self, raw: u8) -> u8;
}

/// No filtering - the byte read is the byte applied.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl StatusFilter for Passthrough {
    fn filter(&mut self, raw: u8) -> u8 {
        raw
    }
}

/// Per-zone consecutive-read debouncer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    /// Accepted switch bits (other bits unused).
    stable: u8,
    /// How many polls in a row each zone has disagreed with `stable`.
    pending: [u8; SWITCH_COUNT],
    threshold: u8,
}

impl Debouncer {
    /// `threshold` is the number of identical reads needed to accept a
    /// change. 0 and 1 both mean "accept immediately".
    pub const fn new(threshold: u8) -> Self {
        Self {
            stable: STATUS_IDLE,
            pending: [0; SWITCH_COUNT],
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Currently accepted switch bits.
    pub fn stable(&self) -> u8 {
        self.stable
    }
}

impl StatusFilter for Debouncer {
    fn filter(&mut self, raw: u8) -> u8 {
        for id in SwitchId::ALL {
            let mask = id.mask();
            let count = &mut self.pending[id.index()];

            if (raw ^ self.stable) & mask == 0 {
                *count = 0;
                continue;
            }

            *count += 1;
            if *count >= self.threshold {
                self.stable = (self.stable & !mask) | (raw & mask);
                *count = 0;
            }
        }

        (raw & !STATUS_MASK) | (self.stable & STATUS_MASK)
    }
}
