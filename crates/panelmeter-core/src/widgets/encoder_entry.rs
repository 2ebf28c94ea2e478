//! Integer entry field driven by the rotary encoder.
//!
//! A touch arms the field: it inverts, then encoder detents adjust the
//! value between the configured limits while the border blinks. Another
//! touch commits and emits the value. On panels without an encoder the
//! field just emits a press event; the application responds by opening
//! the numeric keypad.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

use core::fmt::Write;
use heapless::String;

pub struct EncoderEntry {
    core: WidgetCore,
    value: i32,
    min: i32,
    max: i32,
}

impl EncoderEntry {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            value: 0,
            min: 0,
            max: 999,
        }
    }

    pub fn init(
        &mut self,
        rect: Rect,
        border: Rgb565,
        bg: Rgb565,
        text: Rgb565,
        border_width: i32,
        font: FontId,
    ) {
        self.core.rect = rect;
        self.core.colors.border = border;
        self.core.colors.bg = bg;
        self.core.colors.text = text;
        self.core.border_width = border_width;
        self.core.font = font;
        self.core.label_datum = Datum::TopCentre;
        self.value = 0;
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
    }

    pub fn set_label(&mut self, label: &str) {
        self.core.set_label(label);
    }

    pub fn set_limits(&mut self, min: i32, max: i32) {
        self.min = min;
        self.max = max;
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set_value(&mut self, gfx: &mut impl Gfx, value: i32, redraw: bool) {
        self.value = value.clamp(self.min, self.max);
        if redraw {
            self.draw(gfx, false);
        }
    }

    fn draw_frame(&self, gfx: &mut impl Gfx, color: Rgb565) {
        for i in 0..self.core.border_width {
            gfx.draw_rect(self.core.rect.inset(i), color);
        }
    }

    fn draw(&mut self, gfx: &mut impl Gfx, inverse: bool) {
        if !self.core.can_draw() {
            return;
        }
        let (mut text_c, mut bg_c, border_c) = if self.core.active {
            (
                self.core.colors.text,
                self.core.colors.bg,
                self.core.colors.border,
            )
        } else {
            (palette::DARK_GREY, palette::BLACK, palette::GREY)
        };
        if inverse {
            core::mem::swap(&mut text_c, &mut bg_c);
        }
        let r = self.core.rect;
        self.draw_frame(gfx, border_c);
        gfx.fill_rect(r.inset(self.core.border_width), bg_c);

        if !self.core.label.is_empty() {
            let (cx, cy) = r.center();
            match self.core.label_datum {
                Datum::TopCentre => gfx.draw_text(
                    &self.core.label,
                    cx + self.core.label_dx,
                    r.y + self.core.label_dy - 2,
                    FontId::Body,
                    Datum::BottomCentre,
                    border_c,
                    Some(palette::BLACK),
                ),
                Datum::BottomCentre => gfx.draw_text(
                    &self.core.label,
                    cx + self.core.label_dx,
                    r.y + self.core.label_dy + r.h + 2,
                    FontId::Body,
                    Datum::TopCentre,
                    border_c,
                    Some(palette::BLACK),
                ),
                datum => gfx.draw_text(
                    &self.core.label,
                    r.x + self.core.label_dx - 2,
                    cy + self.core.label_dy,
                    FontId::Body,
                    datum,
                    border_c,
                    Some(palette::BLACK),
                ),
            }
        }

        let mut text: String<12> = String::new();
        let _ = write!(text, "{}", self.value);
        gfx.draw_text(
            &text,
            r.x + self.core.border_width + 4,
            r.y + r.h / 2 - 1,
            self.core.font,
            Datum::MiddleLeft,
            text_c,
            Some(bg_c),
        );
    }
}

impl Default for EncoderEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for EncoderEntry {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        self.draw(&mut ui.gfx, false);
    }

    fn check_pressed<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        wait_released: bool,
    ) -> bool {
        if !self.core.enabled {
            return false;
        }
        let snap = ui.touch.snapshot();
        if !(self.core.accepts_touch() && snap.pressed && self.core.contains(snap.x, snap.y)) {
            return false;
        }

        if !ui.config.has_encoder {
            // keypad fallback handled by the application
            if let Some(tag) = self.core.tag {
                ui.events.push(UiEvent::Pressed { tag });
            }
            if wait_released {
                ui.touch.wait_released(&ui.clock);
            }
            return true;
        }

        // Encoder adjustment sub-loop: owns the input until the next touch.
        self.draw(&mut ui.gfx, true);
        ui.clock.delay_ms(50);
        ui.touch.wait_released(&ui.clock);
        ui.touch.reset_enc_delta();
        let mut blink = false;
        let mut blink_time = ui.clock.now_ms();
        loop {
            let delta = ui.touch.enc_delta(false);
            if delta != 0 {
                self.value = (self.value + delta).clamp(self.min, self.max);
                self.draw(&mut ui.gfx, true);
            }
            let now = ui.clock.now_ms();
            if now.wrapping_sub(blink_time) > 250 {
                blink_time = now;
                let frame = if blink {
                    self.core.colors.border
                } else {
                    palette::BLACK
                };
                self.draw_frame(&mut ui.gfx, frame);
                blink = !blink;
            }
            ui.gfx.present();
            if ui.touch.poll().pressed {
                break;
            }
            ui.clock.delay_ms(10);
        }
        self.draw(&mut ui.gfx, false);
        ui.touch.wait_released(&ui.clock);
        if let Some(tag) = self.core.tag {
            ui.events.push(UiEvent::ValueChanged {
                tag,
                value: self.value,
            });
        }
        true
    }
}
