//! Send policy between the synthesizer and the interrupt IN endpoint.
//!
//! Mirrors what a HID class driver does with a "previous report" buffer:
//! a forced report always goes out and replaces the buffer; otherwise the
//! buffered report is only repeated when the host-selected idle period
//! runs out. An idle period of 0 means "only on change".

use super::keyboard::KeyboardReport;
use super::synthesizer::ReportOutcome;

/// HID 1.11 default idle rate for boot keyboards.
pub const DEFAULT_IDLE_MS: u32 = 500;

/// SET_IDLE carries the duration in 4 ms units in one byte.
pub const MAX_IDLE_MS: u32 = 255 * 4;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportGate {
    previous: KeyboardReport,
    idle_ms: u32,
    idle_remaining_ms: u32,
}

impl ReportGate {
    pub const fn new(idle_ms: u32) -> Self {
        Self {
            previous: KeyboardReport::empty(),
            idle_ms,
            idle_remaining_ms: idle_ms,
        }
    }

    /// Last report handed to the endpoint (answers GET_REPORT).
    pub fn previous(&self) -> &KeyboardReport {
        &self.previous
    }

    pub fn idle_ms(&self) -> u32 {
        self.idle_ms
    }

    /// Apply a SET_IDLE request. Restarts the idle countdown.
    pub fn set_idle_ms(&mut self, idle_ms: u32) {
        self.idle_ms = idle_ms.min(MAX_IDLE_MS);
        self.idle_remaining_ms = self.idle_ms;
    }

    /// Advance the idle countdown.
    pub fn elapse(&mut self, elapsed_ms: u32) {
        self.idle_remaining_ms = self.idle_remaining_ms.saturating_sub(elapsed_ms);
    }

    /// Decide what, if anything, to transmit for this synthesis outcome.
    pub fn offer(&mut self, outcome: ReportOutcome) -> Option<KeyboardReport> {
        match outcome {
            ReportOutcome::ForceSend(report) => {
                self.previous = report;
                self.idle_remaining_ms = self.idle_ms;
                Some(report)
            }
            ReportOutcome::Unchanged if self.idle_ms != 0 && self.idle_remaining_ms == 0 => {
                self.idle_remaining_ms = self.idle_ms;
                Some(self.previous)
            }
            ReportOutcome::Unchanged => None,
        }
    }
}

impl Default for ReportGate {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_MS)
    }
}
