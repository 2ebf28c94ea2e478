//! Flash-backed settings store.
//!
//! One postcard-encoded settings record behind a small magic + length
//! header, written to a reserved data partition offset. Flash errors map
//! to the storage variant of the core error type; a missing or corrupt
//! record is reported as such and the caller falls back to defaults.

extern crate alloc;

use alloc::vec;

use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;
use log::{debug, warn};
use panelmeter_core::settings::{Settings, SettingsError, SettingsStore};

/// Record header: magic tag plus payload length.
const MAGIC: u32 = 0x504D_3246; // "PM2F"
const HEADER_LEN: usize = 8;
/// Maximum accepted payload, sanity bound for the length field.
const MAX_PAYLOAD: usize = 512;

pub struct FlashStore {
    flash: FlashStorage,
    offset: u32,
}

impl FlashStore {
    /// `offset` addresses a flash region reserved for settings, outside
    /// the application image.
    pub fn new(offset: u32) -> Self {
        Self {
            flash: FlashStorage::new(),
            offset,
        }
    }
}

impl SettingsStore for FlashStore {
    fn load(&mut self) -> Result<Settings, SettingsError> {
        let mut header = [0u8; HEADER_LEN];
        self.flash
            .read(self.offset, &mut header)
            .map_err(|_| SettingsError::Storage)?;
        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        if magic != MAGIC || len == 0 || len > MAX_PAYLOAD {
            return Err(SettingsError::Missing);
        }
        let mut payload = vec![0u8; len];
        self.flash
            .read(self.offset + HEADER_LEN as u32, &mut payload)
            .map_err(|_| SettingsError::Storage)?;
        let settings = Settings::from_bytes(&payload)?;
        debug!("settings loaded, {} bytes", len);
        Ok(settings)
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        let payload = settings.to_bytes()?;
        if payload.len() > MAX_PAYLOAD {
            warn!("settings record too large: {} bytes", payload.len());
            return Err(SettingsError::Encode);
        }
        let mut record = vec![0u8; HEADER_LEN + payload.len()];
        record[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        record[4..8].copy_from_slice(&(payload.len() as u32).to_le_bytes());
        record[HEADER_LEN..].copy_from_slice(&payload);
        self.flash
            .write(self.offset, &record)
            .map_err(|_| SettingsError::Storage)?;
        debug!("settings saved, {} bytes", payload.len());
        Ok(())
    }
}
