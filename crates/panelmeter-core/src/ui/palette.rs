//! Instrument color palette.
//!
//! RGB565 constants shared by all widgets. The grey ramp matches the classic
//! TFT panel look; widget-specific accents are picked at init time.

use embedded_graphics::pixelcolor::Rgb565;

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
pub const RED: Rgb565 = Rgb565::new(31, 0, 0);
pub const GREEN: Rgb565 = Rgb565::new(0, 63, 0);
pub const BLUE: Rgb565 = Rgb565::new(0, 0, 31);
pub const CYAN: Rgb565 = Rgb565::new(0, 63, 31);
pub const MAGENTA: Rgb565 = Rgb565::new(31, 0, 31);
pub const YELLOW: Rgb565 = Rgb565::new(31, 63, 0);
pub const ORANGE: Rgb565 = Rgb565::new(31, 45, 0);
pub const DARK_GREEN: Rgb565 = Rgb565::new(0, 31, 0);

/// Bezel grey (0x5AEB in packed form).
pub const GREY: Rgb565 = Rgb565::new(11, 23, 11);
pub const DARK_GREY: Rgb565 = Rgb565::new(15, 31, 15);
pub const LIGHT_GREY: Rgb565 = Rgb565::new(26, 52, 26);
pub const MED_GREY: Rgb565 = Rgb565::new(14, 29, 14);

/// Button face fill.
pub const BTN_GREY: Rgb565 = Rgb565::new(8, 17, 8);
/// Setup-page window background.
pub const WINDOW_GREY: Rgb565 = Rgb565::new(16, 33, 16);
/// Modal dialog background.
pub const DIALOG_GREY: Rgb565 = Rgb565::new(12, 25, 12);

/// Scope plot background, a very dark green CRT tint.
pub const SCOPE_BG: Rgb565 = Rgb565::new(0, 15, 3);
pub const SCOPE_GRID: Rgb565 = Rgb565::new(0, 31, 0);
