//! Drum switch state - decodes the controller's status byte into four
//! logical buttons and tracks which of them changed since the last report.
//!
//! The controller reports the drum zones in bits 6..3 of its status byte,
//! active-low:
//!
//! ```text
//! bit:    7   6    5    4    3    2..0
//!         -   CL   RL   CR   RR   (ignored)
//! ```
//!
//! A cleared bit means the zone is being hit.

/// Number of drum zones / switches.
pub const SWITCH_COUNT: usize = 4;

/// Status-byte bit carrying each switch, indexed by slot.
pub const BIT_POSITIONS: [u8; SWITCH_COUNT] = [6, 5, 4, 3];

/// Bits of the status byte that carry switch data.
pub const STATUS_MASK: u8 = 0b0111_1000;

/// Status byte with every zone released.
pub const STATUS_IDLE: u8 = STATUS_MASK;

/// The four drum zones, in report slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchId {
    CenterLeft,
    RimLeft,
    CenterRight,
    RimRight,
}

impl SwitchId {
    /// All switches in slot order.
    pub const ALL: [SwitchId; SWITCH_COUNT] = [
        SwitchId::CenterLeft,
        SwitchId::RimLeft,
        SwitchId::CenterRight,
        SwitchId::RimRight,
    ];

    /// Slot index in the bank and in the HID report.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Status-byte bit position for this switch.
    pub const fn bit(self) -> u8 {
        BIT_POSITIONS[self.index()]
    }

    /// Status-byte mask for this switch.
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }

    /// Decode this switch from a raw status byte (`true` = pressed).
    pub const fn decode(self, status: u8) -> bool {
        status & self.mask() == 0
    }
}

/// One physical drum zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Switch {
    /// Current reading accepted from the bus.
    state: bool,
    /// Value carried by the most recently synthesized report.
    last_reported: bool,
}

impl Switch {
    pub const fn new() -> Self {
        Self {
            state: false,
            last_reported: false,
        }
    }

    /// Current (debounced) state.
    pub fn is_pressed(&self) -> bool {
        self.state
    }

    /// State included in the last synthesized report.
    pub fn last_reported(&self) -> bool {
        self.last_reported
    }
}

/// Fixed bank of the four drum switches plus the shared dirty flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchBank {
    switches: [Switch; SWITCH_COUNT],
    changed: bool,
}

impl SwitchBank {
    /// All switches released, nothing pending.
    pub const fn new() -> Self {
        Self {
            switches: [Switch::new(); SWITCH_COUNT],
            changed: false,
        }
    }

    /// Apply one status byte read from the controller.
    ///
    /// A switch only moves when its decoded value differs from what was last
    /// reported to the host. Reading the same value again after it has been
    /// reported is a no-op, so the dirty flag tracks report deltas rather
    /// than raw poll-to-poll changes.
    pub fn update(&mut self, status: u8) {
        for id in SwitchId::ALL {
            let raw = id.decode(status);
            let switch = &mut self.switches[id.index()];
            if raw != switch.last_reported {
                switch.state = raw;
                self.changed = true;
            }
        }
    }

    /// `true` if a report must be synthesized.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Force the next synthesis to emit a report even if nothing moved.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub fn switch(&self, id: SwitchId) -> &Switch {
        &self.switches[id.index()]
    }

    pub fn switches(&self) -> &[Switch; SWITCH_COUNT] {
        &self.switches
    }

    pub fn is_pressed(&self, id: SwitchId) -> bool {
        self.switch(id).is_pressed()
    }

    /// Pressed switches as a bitmask, bit `n` = slot `n`.
    pub fn pressed_mask(&self) -> u8 {
        self.switches
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state)
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    /// Record that the current states have been put on the wire.
    pub(crate) fn commit_report(&mut self) {
        for switch in self.switches.iter_mut() {
            switch.last_reported = switch.state;
        }
        self.changed = false;
    }
}
