//! Everything the poll loop and the USB callbacks share, in one value.
//!
//! The firmware keeps a single [`DrumBridge`] behind a critical-section
//! mutex: the poll loop feeds it status bytes and drains reports, the HID
//! request handler reads the last report and idle rate from it. Neither
//! side holds the lock across a bus transaction or an `.await`.

use crate::hid::gate::{ReportGate, DEFAULT_IDLE_MS};
use crate::hid::keyboard::KeyboardReport;
use crate::hid::synthesizer::{KeyMapping, ReportSynthesizer};
use crate::switches::SwitchBank;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrumBridge {
    bank: SwitchBank,
    synthesizer: ReportSynthesizer,
    gate: ReportGate,
}

impl DrumBridge {
    pub const fn new(mapping: KeyMapping) -> Self {
        Self {
            bank: SwitchBank::new(),
            synthesizer: ReportSynthesizer::new(mapping),
            gate: ReportGate::new(DEFAULT_IDLE_MS),
        }
    }

    /// Apply one (already filtered) status byte.
    pub fn update(&mut self, status: u8) {
        self.bank.update(status);
    }

    /// Advance time by `elapsed_ms` and return the report to transmit, if any.
    pub fn service(&mut self, elapsed_ms: u32) -> Option<KeyboardReport> {
        self.gate.elapse(elapsed_ms);
        let outcome = self.synthesizer.create_report(&mut self.bank);
        self.gate.offer(outcome)
    }

    /// Output/feature report from the host.
    pub fn process_host_report(&mut self, data: &[u8]) {
        self.synthesizer.consume_host_report(data);
    }

    /// The host (re)selected our configuration.
    ///
    /// Idle rate goes back to the class default and the current switch
    /// state is queued so the host starts from a known report.
    pub fn on_configured(&mut self) {
        self.gate.set_idle_ms(DEFAULT_IDLE_MS);
        self.bank.mark_changed();
    }

    /// Last report handed to the endpoint.
    pub fn last_report(&self) -> &KeyboardReport {
        self.gate.previous()
    }

    pub fn idle_ms(&self) -> u32 {
        self.gate.idle_ms()
    }

    pub fn set_idle_ms(&mut self, idle_ms: u32) {
        self.gate.set_idle_ms(idle_ms);
    }

    pub fn bank(&self) -> &SwitchBank {
        &self.bank
    }
}
