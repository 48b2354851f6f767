//! Switch bank -> keyboard report.
//!
//! A report is only produced when the bank is dirty. Producing one is
//! also what advances each switch's `last_reported` value, so the bank and
//! the host never disagree about what was sent.

use super::keyboard::{KeyCode, KeyboardReport, KEYBOARD_REPORT_SIZE};
use crate::switches::{SwitchBank, SwitchId, SWITCH_COUNT};

/// Key code emitted for each drum zone, in slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMapping([KeyCode; SWITCH_COUNT]);

impl KeyMapping {
    pub const fn new(keys: [KeyCode; SWITCH_COUNT]) -> Self {
        Self(keys)
    }

    pub const fn key(&self, id: SwitchId) -> KeyCode {
        self.0[id.index()]
    }

    pub fn keys(&self) -> &[KeyCode; SWITCH_COUNT] {
        &self.0
    }
}

/// Result of asking for a new input report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportOutcome {
    /// Nothing changed; the HID layer applies its own policy.
    Unchanged,
    /// State changed; this report must be transmitted.
    ForceSend(KeyboardReport),
}

impl ReportOutcome {
    pub fn is_force_send(&self) -> bool {
        matches!(self, ReportOutcome::ForceSend(_))
    }

    pub fn report(&self) -> Option<&KeyboardReport> {
        match self {
            ReportOutcome::ForceSend(report) => Some(report),
            ReportOutcome::Unchanged => None,
        }
    }

    /// Bytes to put on the wire (0 when unchanged).
    pub fn len(&self) -> usize {
        match self {
            ReportOutcome::ForceSend(_) => KEYBOARD_REPORT_SIZE,
            ReportOutcome::Unchanged => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds keyboard reports from a [`SwitchBank`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportSynthesizer {
    mapping: KeyMapping,
    report: KeyboardReport,
}

impl ReportSynthesizer {
    pub const fn new(mapping: KeyMapping) -> Self {
        Self {
            mapping,
            report: KeyboardReport::empty(),
        }
    }

    pub fn mapping(&self) -> &KeyMapping {
        &self.mapping
    }

    /// The report buffer as of the last synthesis.
    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }

    /// Produce a report if any switch changed since the last one.
    ///
    /// On success every switch's `last_reported` is synced to its state and
    /// the bank's dirty flag is cleared.
    pub fn create_report(&mut self, bank: &mut SwitchBank) -> ReportOutcome {
        if !bank.is_changed() {
            return ReportOutcome::Unchanged;
        }

        for id in SwitchId::ALL {
            self.report.keycodes[id.index()] = if bank.is_pressed(id) {
                self.mapping.key(id).usage()
            } else {
                KeyCode::None.usage()
            };
        }
        bank.commit_report();

        ReportOutcome::ForceSend(self.report)
    }

    /// Host-to-device (LED) reports. The drum has no indicators, so the
    /// payload is ignored whatever its length or contents.
    pub fn consume_host_report(&mut self, _report: &[u8]) {}
}
