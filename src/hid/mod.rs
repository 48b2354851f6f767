//! HID report types, synthesis and send policy.

pub mod gate;
pub mod keyboard;
pub mod synthesizer;


pub use gate::ReportGate;
pub use keyboard::{KeyCode, KeyboardReport};
pub use synthesizer::{KeyMapping, ReportOutcome, ReportSynthesizer};
