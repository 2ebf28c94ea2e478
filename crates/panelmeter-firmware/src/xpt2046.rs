//! XPT2046 resistive touch controller driver.
//!
//! Polled over its own SPI bus; one [`read`](panelmeter_core::ui::TouchDigitizer::read)
//! performs a pressure check and, when touched, a coordinate conversion
//! from raw digitizer counts to screen pixels using the stored linear
//! calibration. Any bus error reports "not pressed" — the panel treats an
//! unresponsive digitizer as no touch, never as a fault.

use embedded_hal::spi::SpiDevice;
use panelmeter_core::ui::{TouchDigitizer, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

/// 12-bit differential channel select commands.
const CMD_READ_X: u8 = 0x90;
const CMD_READ_Y: u8 = 0xD0;
const CMD_READ_Z1: u8 = 0xB0;
const CMD_READ_Z2: u8 = 0xC0;

/// Minimum pressure reading that counts as a touch.
const PRESSURE_THRESHOLD: i32 = 400;

/// Raw count window of the digitizer, factory-typical values used until
/// a calibration is stored.
pub const RAW_X_MIN: u16 = 200;
pub const RAW_X_MAX: u16 = 3900;
pub const RAW_Y_MIN: u16 = 200;
pub const RAW_Y_MAX: u16 = 3900;

/// Linear raw-to-screen mapping.
#[derive(Debug, Clone, Copy)]
pub struct TouchCalibration {
    pub x0: u16,
    pub y0: u16,
    pub width: f32,
    pub height: f32,
}

impl Default for TouchCalibration {
    fn default() -> Self {
        Self {
            x0: RAW_X_MIN,
            y0: RAW_Y_MIN,
            width: (RAW_X_MAX - RAW_X_MIN) as f32,
            height: (RAW_Y_MAX - RAW_Y_MIN) as f32,
        }
    }
}

pub struct Xpt2046<SPI> {
    spi: SPI,
    cal: TouchCalibration,
}

impl<SPI: SpiDevice> Xpt2046<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            cal: TouchCalibration::default(),
        }
    }

    pub fn set_calibration(&mut self, cal: TouchCalibration) {
        self.cal = cal;
    }

    /// One 12-bit channel conversion.
    fn read_channel(&mut self, cmd: u8) -> Result<u16, SPI::Error> {
        let mut buf = [cmd, 0, 0];
        self.spi.transfer_in_place(&mut buf)?;
        Ok(((buf[1] as u16) << 5) | ((buf[2] as u16) >> 3))
    }

    fn pressure(&mut self) -> Result<i32, SPI::Error> {
        let z1 = self.read_channel(CMD_READ_Z1)? as i32;
        let z2 = self.read_channel(CMD_READ_Z2)? as i32;
        Ok(z1 + 4095 - z2)
    }
}

impl<SPI: SpiDevice> TouchDigitizer for Xpt2046<SPI> {
    fn read(&mut self) -> Option<(u16, u16)> {
        let pressed = self.pressure().ok()? > PRESSURE_THRESHOLD;
        if !pressed {
            return None;
        }
        let raw_x = self.read_channel(CMD_READ_X).ok()?;
        let raw_y = self.read_channel(CMD_READ_Y).ok()?;

        // clamp below the calibration window, then scale to the panel
        let raw_x = raw_x.max(self.cal.x0);
        let raw_y = raw_y.max(self.cal.y0);
        let mut x =
            (DISPLAY_WIDTH_PX as f32 * (raw_x - self.cal.x0) as f32 / self.cal.width) as u16;
        let mut y =
            (DISPLAY_HEIGHT_PX as f32 * (raw_y - self.cal.y0) as f32 / self.cal.height) as u16;
        if x >= DISPLAY_WIDTH_PX {
            x = DISPLAY_WIDTH_PX - 1;
        }
        if y >= DISPLAY_HEIGHT_PX {
            y = DISPLAY_HEIGHT_PX - 1;
        }
        Some((x, y))
    }
}
