//! Host-testable library for tatacon2usb.
//!
//! Everything that does not touch the nRF52840 lives here: the I²C
//! protocol spoken to the drum controller, switch decoding, report
//! synthesis and the HID send policy. The bus is abstracted behind
//! `embedded_hal::i2c::I2c`, so the same code runs against the TWIM
//! peripheral on target and against scripted stubs on the host.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

pub mod bridge;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod hid;
pub mod poll;
pub mod switches;

#[cfg(test)]
mod bus_stub;

pub use bridge::DrumBridge;
pub use controller::ControllerLink;
pub use error::{BusError, Error};
pub use poll::DrumPoller;
pub use switches::{SwitchBank, SwitchId};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::bus_stub::{BusStub, Transfer};
    use super::controller::*;
    use super::debounce::Debouncer;
    use super::error::{BusError, Error};
    use super::poll::DrumPoller;
    use super::switches::*;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    /// Status byte with the given zones hit (active-low), low bits set.
    fn hits(ids: &[SwitchId]) -> u8 {
        ids.iter().fold(0xFF, |b, id| b & !id.mask())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Controller Link Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn initialize_sends_two_separate_writes() {
        let mut link = ControllerLink::new(BusStub::new());
        link.initialize().unwrap();

        let bus = link.release();
        assert_eq!(
            bus.log,
            vec![
                vec![Transfer::Write(0x52, vec![0xF0, 0x55])],
                vec![Transfer::Write(0x52, vec![0xFB, 0x00])],
            ]
        );
    }

    #[test]
    fn read_status_latches_register_then_reads_one_byte() {
        let mut link = ControllerLink::new(BusStub::new().with_reads(&[0x3A]));
        assert_eq!(link.read_status_byte().unwrap(), 0x3A);

        let bus = link.release();
        assert_eq!(
            bus.log,
            vec![
                vec![Transfer::Write(0x52, vec![0x05])],
                vec![Transfer::Read(0x52, 1)],
            ]
        );
    }

    #[test]
    fn controller_address_is_wii_extension_address() {
        // 0xA4 is the 8-bit write address of the same device.
        assert_eq!(CONTROLLER_ADDRESS << 1, 0xA4);
        let link = ControllerLink::new(BusStub::new());
        assert_eq!(link.address(), CONTROLLER_ADDRESS);
    }

    #[test]
    fn custom_address_is_used_on_the_wire() {
        let mut link = ControllerLink::with_address(BusStub::new(), 0x10);
        link.read_status_byte().unwrap();
        let bus = link.release();
        assert_eq!(bus.log[0], vec![Transfer::Write(0x10, vec![0x05])]);
        assert_eq!(bus.log[1], vec![Transfer::Read(0x10, 1)]);
    }

    #[test]
    fn initialize_reports_missing_controller() {
        let mut bus = BusStub::new();
        bus.set_absent(true);
        let mut link = ControllerLink::new(bus);

        assert_eq!(
            link.initialize(),
            Err(Error::Bus(BusError::NoAcknowledge))
        );
        // Both writes are still attempted.
        assert_eq!(link.release().log.len(), 2);
    }

    #[test]
    fn initialize_sends_mode_select_after_unlock_nak() {
        let mut bus = BusStub::new();
        bus.nack_next_writes(1);
        let mut link = ControllerLink::new(bus);

        assert_eq!(
            link.initialize(),
            Err(Error::Bus(BusError::NoAcknowledge))
        );
        assert_eq!(
            link.release().log,
            vec![
                vec![Transfer::Write(0x52, vec![0xF0, 0x55])],
                vec![Transfer::Write(0x52, vec![0xFB, 0x00])],
            ]
        );
    }

    #[test]
    fn read_status_reports_read_failure() {
        let mut bus = BusStub::new();
        bus.push_read_error(ErrorKind::ArbitrationLoss);
        let mut link = ControllerLink::new(bus);

        assert_eq!(
            link.read_status_byte(),
            Err(Error::Bus(BusError::ArbitrationLoss))
        );
    }

    #[test]
    fn bus_error_kinds_map() {
        assert_eq!(
            BusError::from(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)),
            BusError::NoAcknowledge
        );
        assert_eq!(BusError::from(ErrorKind::Bus), BusError::Bus);
        assert_eq!(BusError::from(ErrorKind::Overrun), BusError::Overrun);
        assert_eq!(BusError::from(ErrorKind::Other), BusError::Other);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Switch Decoding Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn bit_positions_follow_slot_order() {
        assert_eq!(SwitchId::CenterLeft.bit(), 6);
        assert_eq!(SwitchId::RimLeft.bit(), 5);
        assert_eq!(SwitchId::CenterRight.bit(), 4);
        assert_eq!(SwitchId::RimRight.bit(), 3);
        let all = SwitchId::ALL.iter().fold(0, |m, id| m | id.mask());
        assert_eq!(all, STATUS_MASK);
    }

    #[test]
    fn cleared_bit_decodes_as_pressed() {
        for id in SwitchId::ALL {
            assert!(id.decode(!id.mask()));
            assert!(!id.decode(id.mask()));
        }
    }

    #[test]
    fn each_zone_decodes_to_its_own_slot() {
        for id in SwitchId::ALL {
            let mut bank = SwitchBank::new();
            bank.update(hits(&[id]));
            for other in SwitchId::ALL {
                assert_eq!(bank.is_pressed(other), other == id);
            }
            assert!(bank.is_changed());
        }
    }

    #[test]
    fn new_bank_is_released_and_clean() {
        let bank = SwitchBank::new();
        assert!(!bank.is_changed());
        assert_eq!(bank.pressed_mask(), 0);
        for s in bank.switches() {
            assert!(!s.is_pressed());
            assert!(!s.last_reported());
        }
    }

    #[test]
    fn idle_byte_leaves_clean_bank_clean() {
        let mut bank = SwitchBank::new();
        bank.update(STATUS_IDLE);
        bank.update(0xFF);
        assert!(!bank.is_changed());
        assert_eq!(bank.pressed_mask(), 0);
    }

    #[test]
    fn low_bits_are_ignored() {
        let mut bank = SwitchBank::new();
        bank.update(STATUS_IDLE & 0b1111_1000);
        bank.update(STATUS_IDLE | 0b1000_0111);
        assert!(!bank.is_changed());
    }

    #[test]
    fn update_does_not_touch_last_reported() {
        let mut bank = SwitchBank::new();
        bank.update(hits(&[SwitchId::RimLeft]));
        assert!(bank.is_pressed(SwitchId::RimLeft));
        assert!(!bank.switch(SwitchId::RimLeft).last_reported());
    }

    #[test]
    fn press_then_release_before_report_keeps_dirty_flag() {
        let mut bank = SwitchBank::new();
        bank.update(hits(&[SwitchId::CenterRight]));
        bank.update(STATUS_IDLE);
        // Released again matches last_reported, so state stays pressed until
        // a report goes out.
        assert!(bank.is_pressed(SwitchId::CenterRight));
        assert!(bank.is_changed());
    }

    #[test]
    fn pressed_mask_uses_slot_bits() {
        let mut bank = SwitchBank::new();
        bank.update(hits(&[SwitchId::CenterLeft, SwitchId::RimRight]));
        assert_eq!(bank.pressed_mask(), 0b1001);
    }

    #[test]
    fn mark_changed_sets_dirty_flag() {
        let mut bank = SwitchBank::new();
        bank.mark_changed();
        assert!(bank.is_changed());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Poller Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn poll_applies_status_to_bank() {
        let bus = BusStub::new().with_reads(&[hits(&[SwitchId::RimRight])]);
        let mut poller = DrumPoller::new(ControllerLink::new(bus));
        let mut bank = SwitchBank::new();

        poller.poll(&mut bank).unwrap();
        assert!(bank.is_pressed(SwitchId::RimRight));
        assert_eq!(poller.consecutive_failures(), 0);
    }

    #[test]
    fn failed_poll_holds_last_known_state() {
        let mut bus = BusStub::new().with_reads(&[hits(&[SwitchId::CenterLeft])]);
        bus.push_read_error(ErrorKind::Bus);
        bus.push_read_error(ErrorKind::Bus);
        let mut poller = DrumPoller::new(ControllerLink::new(bus));
        let mut bank = SwitchBank::new();

        poller.poll(&mut bank).unwrap();
        let before = bank.clone();

        assert_eq!(poller.poll(&mut bank), Err(Error::Bus(BusError::Bus)));
        assert_eq!(poller.poll(&mut bank), Err(Error::Bus(BusError::Bus)));
        assert_eq!(bank, before);
        assert_eq!(poller.consecutive_failures(), 2);

        // Queue is empty now: idle bus reads 0xFF and the counter resets.
        poller.poll(&mut bank).unwrap();
        assert_eq!(poller.consecutive_failures(), 0);
    }

    #[test]
    fn poller_initialize_runs_handshake() {
        let mut poller = DrumPoller::new(ControllerLink::new(BusStub::new()));
        poller.initialize().unwrap();
        assert_eq!(poller.into_link().release().log.len(), 2);
    }

    #[test]
    fn debounced_poller_ignores_single_glitch() {
        let glitch = hits(&[SwitchId::RimLeft]);
        let bus = BusStub::new().with_reads(&[glitch, STATUS_IDLE, glitch, glitch]);
        let link = ControllerLink::new(bus);
        let mut poller = DrumPoller::with_filter(link, Debouncer::new(2));
        let mut bank = SwitchBank::new();

        poller.poll(&mut bank).unwrap();
        poller.poll(&mut bank).unwrap();
        poller.poll(&mut bank).unwrap();
        assert!(!bank.is_changed());

        poller.poll(&mut bank).unwrap();
        assert!(bank.is_pressed(SwitchId::RimLeft));
        assert_eq!(poller.filter().threshold(), 2);
    }
}
