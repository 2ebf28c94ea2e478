//! Runtime panel configuration.
//!
//! Board capabilities that used to be compile-time switches are plain data
//! here, so both code paths exist and are testable without recompiling.

use crate::ui::integrator::PeakDecay;

#[derive(Debug, Clone, Copy)]
pub struct PanelConfig {
    /// A rotary encoder is fitted. Without one, page cycling falls back to
    /// the invisible edge wipe buttons and the encoder entry field opens
    /// the numeric keypad instead.
    pub has_encoder: bool,
    /// Peak-hold decay policy for bargraphs.
    pub peak_decay: PeakDecay,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            has_encoder: false,
            peak_decay: PeakDecay::Exponential,
        }
    }
}
