//! Modal numeric keypad.
//!
//! 4x4 touch pad with backspace, optional decimal point and sign keys and
//! a blinking cursor. Entry editing lives in [`KeypadEntry`], a plain
//! state machine, so the semantics (first press clears the seed value,
//! backspace-to-zero restarts, one decimal point only) are testable
//! without a display. With an encoder fitted, detents step the value.
//!
//! [`NumericKeypad::entry`] returns `None` on cancel or an empty entry;
//! the caller keeps its previous value in that case.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::widget::Widget;
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui};
use crate::widgets::PushButton;

const PAD_GAP: i32 = 10;
const ENTRY_TOP: i32 = 28;
const CANCEL_W: i32 = 50;
const CANCEL_H: i32 = 18;
const ENTRY_TEXT_COLOR: Rgb565 = palette::YELLOW;

/// Key legends; empty strings are dead cells.
const KEYPAD: [[&str; 4]; 4] = [
    ["1", "2", "3", "<<"],
    ["4", "5", "6", ""],
    ["7", "8", "9", "+/-"],
    ["", "0", ".", "OK"],
];

// ---------------------------------------------------------------------------
// Entry editor
// ---------------------------------------------------------------------------

/// Editable numeric entry string.
pub struct KeypadEntry {
    buf: String<16>,
    first_press: bool,
    use_decimal: bool,
}

impl KeypadEntry {
    /// Seed with the previous value, formatted to `decimals` places.
    /// `decimals == 0` selects integer entry and hides the decimal key.
    pub fn new(initial: f32, decimals: usize) -> Self {
        let mut buf: String<16> = String::new();
        if decimals > 0 {
            let _ = write!(buf, "{:.*}", decimals, initial);
        } else {
            let _ = write!(buf, "{}", libm::rintf(initial) as i64);
        }
        Self {
            buf,
            first_press: true,
            use_decimal: decimals > 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The first keypress replaces a plain "0" seed instead of appending.
    fn note_press(&mut self) {
        if self.first_press {
            self.first_press = false;
            if self.buf.as_str() == "0" {
                self.buf.clear();
            }
        }
    }

    /// Append a digit or the decimal point. A second decimal point, or a
    /// decimal point in integer mode, is ignored.
    pub fn push_key(&mut self, key: &str) {
        self.note_press();
        if key == "." || key == "," {
            if !self.use_decimal || self.buf.contains('.') || self.buf.contains(',') {
                return;
            }
        }
        for ch in key.chars() {
            let _ = self.buf.push(ch);
        }
    }

    /// Remove the last character; an emptied entry restarts at "0".
    pub fn backspace(&mut self) {
        self.buf.pop();
        if self.buf.is_empty() {
            let _ = self.buf.push('0');
            self.first_press = true;
        }
    }

    pub fn toggle_sign(&mut self) {
        if let Some(stripped) = self.buf.strip_prefix('-') {
            let mut new: String<16> = String::new();
            let _ = new.push_str(stripped);
            self.buf = new;
        } else {
            let mut new: String<16> = String::new();
            let _ = new.push('-');
            let _ = new.push_str(&self.buf);
            self.buf = new;
        }
    }

    pub fn value(&self) -> f32 {
        self.buf.parse().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Keypad widget
// ---------------------------------------------------------------------------

pub struct NumericKeypad {
    rect: Rect,
    bg: Rgb565,
    key_border: Rgb565,
    pad_x: i32,
    pad_y: i32,
    key_w: i32,
    key_h: i32,
    entry_rect: Rect,
    entry_center_y: i32,
    seed_value: f32,
}

impl NumericKeypad {
    pub fn new() -> Self {
        Self {
            rect: Rect::default(),
            bg: palette::WINDOW_GREY,
            key_border: palette::WHITE,
            pad_x: 0,
            pad_y: 0,
            key_w: 0,
            key_h: 0,
            entry_rect: Rect::default(),
            entry_center_y: 0,
            seed_value: 0.0,
        }
    }

    pub fn init(&mut self, rect: Rect, bg: Rgb565) {
        self.rect = rect;
        self.bg = bg;
        self.key_border = alpha_blend(128, palette::WHITE, bg);
        self.pad_x = rect.x + PAD_GAP;
        self.pad_y = rect.y + PAD_GAP + rect.h / 4;
        let pad_h = rect.h - PAD_GAP - rect.h / 4;
        let pad_w = rect.w - PAD_GAP * 2;
        self.key_h = pad_h / 4 - PAD_GAP;
        self.key_w = pad_w / 4 - PAD_GAP;
        let entry_h = rect.h / 8;
        self.entry_rect = Rect::new(rect.x + PAD_GAP, rect.y + ENTRY_TOP, rect.w - PAD_GAP * 2, entry_h);
        self.entry_center_y = self.entry_rect.y + entry_h / 2;
    }

    /// Previous value shown when the pad opens.
    pub fn set_entry_value(&mut self, value: f32) {
        self.seed_value = value;
    }

    fn key_rect(&self, row: usize, col: usize) -> Rect {
        let mut w = self.key_w;
        if col == 3 {
            w += PAD_GAP; // wider action column
        }
        Rect::new(
            self.pad_x + col as i32 * (self.key_w + PAD_GAP),
            self.pad_y + row as i32 * (self.key_h + PAD_GAP),
            w,
            self.key_h,
        )
    }

    fn key_contains(&self, x: i32, y: i32, row: usize, col: usize) -> bool {
        let r = Rect::new(
            self.pad_x + col as i32 * (self.key_w + PAD_GAP),
            self.pad_y + row as i32 * (self.key_h + PAD_GAP),
            self.key_w,
            self.key_h,
        );
        x >= r.x && x < r.x + r.w && y >= r.y && y <= r.y + r.h
    }

    fn draw_key(
        &self,
        gfx: &mut impl Gfx,
        label: &str,
        pressed: bool,
        row: usize,
        col: usize,
        use_decimal: bool,
        use_plusminus: bool,
    ) {
        if label.is_empty() {
            return;
        }
        if !use_decimal && (label == "." || label == ",") {
            return;
        }
        if !use_plusminus && label == "+/-" {
            return;
        }
        let face = if pressed {
            palette::WHITE
        } else {
            palette::BTN_GREY
        };
        let r = self.key_rect(row, col);
        gfx.fill_round_rect(r, 3, face);
        gfx.draw_text(
            label,
            r.x + r.w / 2 + 1,
            r.y + r.h / 2,
            FontId::Body,
            Datum::MiddleCentre,
            if pressed { palette::BLACK } else { palette::WHITE },
            Some(face),
        );
        gfx.draw_round_rect(r, 3, palette::WHITE);
        gfx.draw_round_rect(Rect::new(r.x - 1, r.y - 1, r.w + 2, r.h + 2), 3, self.key_border);
    }

    fn draw_entry(&self, gfx: &mut impl Gfx, entry: &KeypadEntry) {
        gfx.fill_rect(self.entry_rect.inset(1), palette::BLACK);
        gfx.draw_text(
            entry.text(),
            self.entry_rect.x + 5,
            self.entry_center_y,
            FontId::Heading,
            Datum::MiddleLeft,
            ENTRY_TEXT_COLOR,
            Some(palette::BLACK),
        );
    }

    /// Run the keypad until OK or CANCEL.
    ///
    /// Returns the entered value, or `None` for cancel/empty entry. The
    /// covered screen area is blanked on exit; the caller redraws its
    /// page.
    pub fn entry<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        title: &str,
        decimal_digits: usize,
        use_plusminus: bool,
    ) -> Option<f32> {
        ui.touch.wait_released(&ui.clock);
        let use_decimal = decimal_digits > 0;
        let mut entry = KeypadEntry::new(self.seed_value, decimal_digits);

        gfx_frame(&mut ui.gfx, self.rect, self.bg, title);
        ui.gfx.draw_rect(self.entry_rect, palette::WHITE);

        let mut btn_cancel = PushButton::new();
        btn_cancel.init(
            Rect::new(
                self.rect.x + self.rect.w - CANCEL_W - PAD_GAP,
                self.rect.y + 5,
                CANCEL_W,
                CANCEL_H,
            ),
            palette::WHITE,
            palette::RED,
            palette::BLACK,
            1,
            FontId::Small,
        );
        btn_cancel.set_label("CANCEL");
        btn_cancel.redraw(ui, true);

        self.draw_entry(&mut ui.gfx, &entry);
        for (row, keys) in KEYPAD.iter().enumerate() {
            for (col, label) in keys.iter().enumerate() {
                self.draw_key(&mut ui.gfx, label, false, row, col, use_decimal, use_plusminus);
            }
        }

        let mut cancelled = false;
        let mut enter_ok = false;
        let mut blink_time = ui.clock.now_ms();
        let mut blink = false;
        while !enter_ok {
            ui.gfx.present();
            if ui.config.has_encoder {
                let delta = ui.touch.enc_delta(false);
                if delta != 0 {
                    // encoder steps in whole units, dropping any decimals
                    let stepped = entry.value() + delta as f32;
                    entry = KeypadEntry::new(stepped, 0);
                    self.draw_entry(&mut ui.gfx, &entry);
                }
            }
            if ui.touch.check_within(self.rect) {
                if btn_cancel.check_pressed(ui, true) {
                    cancelled = true;
                    break;
                }
                let snap = ui.touch.snapshot();
                'pad: for (row, keys) in KEYPAD.iter().enumerate() {
                    for (col, label) in keys.iter().enumerate() {
                        if !self.key_contains(snap.x, snap.y, row, col) || label.is_empty() {
                            continue;
                        }
                        if !use_decimal && (*label == "." || *label == ",") {
                            continue;
                        }
                        if !use_plusminus && *label == "+/-" {
                            continue;
                        }
                        self.draw_key(&mut ui.gfx, label, true, row, col, use_decimal, use_plusminus);
                        match (row, col) {
                            (3, 3) => {
                                enter_ok = true;
                            }
                            (0, 3) => entry.backspace(),
                            (2, 3) => entry.toggle_sign(),
                            _ => entry.push_key(label),
                        }
                        self.draw_entry(&mut ui.gfx, &entry);
                        ui.clock.delay_ms(100);
                        ui.touch.wait_released(&ui.clock);
                        self.draw_key(&mut ui.gfx, label, false, row, col, use_decimal, use_plusminus);
                        blink = true;
                        break 'pad;
                    }
                }
            }
            // blinking cursor after the entry text
            let now = ui.clock.now_ms();
            if now.wrapping_sub(blink_time) > 250 {
                blink_time = now;
                blink = !blink;
                let text_w = ui.gfx.text_width(entry.text(), FontId::Heading);
                let text_h = FontId::Heading.char_size().1 - 2;
                ui.gfx.fill_rect(
                    Rect::new(
                        self.entry_rect.x + text_w + 6,
                        self.entry_center_y - text_h / 2,
                        7,
                        text_h,
                    ),
                    if blink { ENTRY_TEXT_COLOR } else { palette::BLACK },
                );
            }
        }

        ui.clock.delay_ms(100);
        ui.touch.wait_released(&ui.clock);
        ui.gfx.fill_rect(self.rect, palette::BLACK);
        ui.gfx.present();

        if cancelled || entry.is_empty() {
            None
        } else {
            self.seed_value = entry.value();
            Some(entry.value())
        }
    }
}

impl Default for NumericKeypad {
    fn default() -> Self {
        Self::new()
    }
}

fn gfx_frame(gfx: &mut impl Gfx, rect: Rect, bg: Rgb565, title: &str) {
    gfx.draw_rect(rect, palette::WHITE);
    gfx.fill_rect(rect.inset(1), bg);
    gfx.draw_text(
        title,
        rect.x + PAD_GAP + 2,
        rect.y + 6,
        FontId::Body,
        Datum::TopLeft,
        palette::WHITE,
        Some(bg),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_press_replaces_zero_seed() {
        let mut e = KeypadEntry::new(0.0, 0);
        assert_eq!(e.text(), "0");
        e.push_key("7");
        assert_eq!(e.text(), "7");
        e.push_key("3");
        assert_eq!(e.text(), "73");
        assert_eq!(e.value(), 73.0);
    }

    #[test]
    fn nonzero_seed_is_appended_to() {
        let mut e = KeypadEntry::new(1.5, 2);
        assert_eq!(e.text(), "1.50");
        e.push_key("9");
        assert_eq!(e.text(), "1.509");
    }

    #[test]
    fn single_decimal_point_only() {
        let mut e = KeypadEntry::new(0.0, 3);
        e.push_key("1");
        e.push_key(".");
        e.push_key("5");
        e.push_key("."); // ignored
        e.push_key("5");
        assert_eq!(e.text(), "1.55");
    }

    #[test]
    fn decimal_point_ignored_in_integer_mode() {
        let mut e = KeypadEntry::new(0.0, 0);
        e.push_key("4");
        e.push_key(".");
        assert_eq!(e.text(), "4");
    }

    #[test]
    fn backspace_to_empty_restarts_at_zero() {
        let mut e = KeypadEntry::new(0.0, 0);
        e.push_key("8");
        e.backspace();
        assert_eq!(e.text(), "0");
        // the restart behaves like a fresh seed
        e.push_key("5");
        assert_eq!(e.text(), "5");
    }

    #[test]
    fn sign_toggles_both_ways() {
        let mut e = KeypadEntry::new(12.0, 0);
        e.toggle_sign();
        assert_eq!(e.text(), "-12");
        assert_eq!(e.value(), -12.0);
        e.toggle_sign();
        assert_eq!(e.text(), "12");
    }
}
