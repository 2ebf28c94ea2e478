//! Persistent instrument settings.
//!
//! A flat record serialized with postcard behind the [`SettingsStore`]
//! trait; the firmware backs it with a flash page, tests with memory. The
//! core loads once at startup and writes back only on the SAVE button.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    /// No settings record present (first boot or erased flash).
    #[error("no settings record present")]
    Missing,
    #[error("settings encoding failed")]
    Encode,
    #[error("settings record corrupt")]
    Decode,
    #[error("settings storage unavailable")]
    Storage,
}

/// Number of ADC scaling slots (one per measurement range).
pub const SCALING_COUNT: usize = 10;
/// General-purpose config slots exposed on the setup pages.
pub const CONFIG_SLOTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Active current range index into the range table.
    pub amp_range_idx: u8,
    /// Active voltage range index into the range table.
    pub volt_range_idx: u8,
    /// High current range relay engaged.
    pub amp_hi_range_on: bool,
    /// Per-range ADC scale factors, trimmed via the scaling menu.
    pub adc_scalings: [f32; SCALING_COUNT],
    /// Raw ADC offset corrections, in counts.
    pub adc_raw_offset_amps: i16,
    pub adc_raw_offset_volts: i16,
    /// Key click / confirmation beeps.
    pub beep_enabled: bool,
    pub config_int: [i32; CONFIG_SLOTS],
    pub config_float: [f32; CONFIG_SLOTS],
    pub config_bool: [bool; CONFIG_SLOTS],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            amp_range_idx: 2,
            volt_range_idx: 7,
            amp_hi_range_on: false,
            adc_scalings: [1.0; SCALING_COUNT],
            adc_raw_offset_amps: 0,
            adc_raw_offset_volts: 0,
            beep_enabled: true,
            config_int: [0; CONFIG_SLOTS],
            config_float: [0.0, 0.0, 0.0, 0.0, 0.5, 0.775],
            config_bool: [false; CONFIG_SLOTS],
        }
    }
}

impl Settings {
    /// Bargraph setpoint marker for the current channel.
    pub fn marker_amps(&self) -> f32 {
        self.config_float[4]
    }

    pub fn set_marker_amps(&mut self, v: f32) {
        self.config_float[4] = v;
    }

    /// Bargraph setpoint marker for the voltage channel.
    pub fn marker_volts(&self) -> f32 {
        self.config_float[5]
    }

    pub fn set_marker_volts(&mut self, v: f32) {
        self.config_float[5] = v;
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SettingsError> {
        postcard::to_allocvec(self).map_err(|_| SettingsError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SettingsError> {
        postcard::from_bytes(bytes).map_err(|_| SettingsError::Decode)
    }
}

/// Storage backend for the settings record.
pub trait SettingsStore {
    fn load(&mut self) -> Result<Settings, SettingsError>;
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postcard_round_trip() {
        let mut s = Settings::default();
        s.amp_range_idx = 4;
        s.adc_scalings[3] = 1.25;
        s.adc_raw_offset_amps = -17;
        s.config_bool[1] = true;
        s.set_marker_volts(0.9);
        let bytes = s.to_bytes().unwrap();
        let back = Settings::from_bytes(&bytes).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn corrupt_record_is_rejected() {
        assert!(matches!(
            Settings::from_bytes(&[0xFF, 0x00, 0x13]),
            Err(SettingsError::Decode)
        ));
    }

    #[test]
    fn memory_store_round_trip() {
        use crate::mocks::MemoryStore;
        use crate::settings::SettingsStore;
        let mut store = MemoryStore::new();
        assert!(matches!(store.load(), Err(SettingsError::Missing)));
        let s = Settings::default();
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), s);
        assert_eq!(store.save_count, 1);
    }
}
