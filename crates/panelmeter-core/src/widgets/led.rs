//! Panel indicator LED.
//!
//! Round, square or wide-rectangle styles with an optional blink driven by
//! the periodic `update()` pass and the injected clock. State changes are
//! latched so a steady LED is not repainted every tick.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::gfx::{alpha_blend, Datum, Rect};
use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedShape {
    Round,
    Square,
    Rect,
}

pub struct Led {
    core: WidgetCore,
    shape: LedShape,
    color: Rgb565,
    size: i32,
    blink_ms: u32,
    blinking: bool,
    is_on: bool,
    last_state: bool,
    toggle: bool,
    last_toggle_ms: u32,
}

impl Led {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            shape: LedShape::Round,
            color: palette::RED,
            size: 16,
            blink_ms: 333,
            blinking: false,
            is_on: false,
            last_state: false,
            toggle: false,
            last_toggle_ms: 0,
        }
    }

    /// `cx`/`cy` are the LED center, matching how the indicators are laid
    /// out along the bottom strip.
    pub fn init_center(&mut self, cx: i32, cy: i32, size: i32, color: Rgb565, shape: LedShape) {
        // rect kept centered for the (unused) touch hit test
        self.core.rect = Rect::new(cx - size / 2, cy - size / 2, size, size);
        self.size = size;
        self.color = color;
        self.shape = shape;
        self.core.label_datum = Datum::TopCentre;
        self.is_on = false;
        self.blinking = false;
        self.toggle = false;
    }

    pub fn set_label(&mut self, label: &str) {
        self.core.set_label(label);
    }

    pub fn set_blink_ms(&mut self, ms: u32) {
        self.blink_ms = ms;
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Set on/off and blinking; only repaints when forced, the periodic
    /// update pass picks up unforced changes.
    pub fn set_state(&mut self, gfx: &mut impl Gfx, on: bool, blinking: bool, force_redraw: bool) {
        self.is_on = on;
        self.core.checked = on;
        self.blinking = blinking;
        if force_redraw {
            self.draw(gfx);
            self.last_state = on;
        }
    }

    fn center(&self) -> (i32, i32) {
        self.core.rect.center()
    }

    fn draw(&mut self, gfx: &mut impl Gfx) {
        if !self.core.can_draw() {
            return;
        }
        let (cx, cy) = self.center();
        let size = self.size;

        // label first, it sits outside the LED body
        if !self.core.label.is_empty() {
            let text_c = if self.core.active {
                palette::WHITE
            } else {
                palette::GREY
            };
            let (lx, ly, datum) = match self.core.label_datum {
                Datum::TopCentre => (
                    cx + self.core.label_dx + 2,
                    cy + self.core.label_dy - size - 2,
                    Datum::BottomCentre,
                ),
                Datum::BottomCentre => (
                    cx + self.core.label_dx + 2,
                    cy + self.core.label_dy + size + 2,
                    Datum::TopCentre,
                ),
                datum => (cx + self.core.label_dx + size + 2, cy + self.core.label_dy, datum),
            };
            gfx.draw_text(
                &self.core.label,
                lx,
                ly,
                self.core.font,
                datum,
                text_c,
                Some(palette::BLACK),
            );
        }

        let lit = self.is_on && self.toggle;
        let (inner, outer, bright) = if self.core.active {
            if lit {
                (
                    self.color,
                    alpha_blend(190, self.color, palette::DARK_GREY),
                    alpha_blend(110, palette::WHITE, self.color),
                )
            } else {
                let dim = alpha_blend(60, self.color, palette::DARK_GREY);
                (dim, alpha_blend(40, self.color, palette::DARK_GREY), dim)
            }
        } else {
            (palette::DARK_GREY, palette::GREY, palette::DARK_GREY)
        };
        let (outline_c, bezel_c) = if self.core.active {
            (palette::WHITE, palette::LIGHT_GREY)
        } else {
            (palette::GREY, palette::DARK_GREY)
        };

        match self.shape {
            LedShape::Round => {
                let radius = size / 2;
                gfx.fill_circle(cx, cy, radius - 1, outer);
                gfx.fill_circle(cx, cy, radius / 2 + 1, inner);
                gfx.fill_circle(cx, cy, 2, bright);
                gfx.draw_circle(cx, cy, radius - 1, outline_c);
                gfx.draw_circle(cx, cy, radius, bezel_c);
            }
            LedShape::Square => {
                let half = size / 2;
                let body = Rect::new(cx - half, cy - half, size, size);
                gfx.fill_rect(body, outer);
                gfx.fill_rect(Rect::new(cx - half / 2, cy - half / 2, half, half), inner);
                gfx.fill_rect(Rect::new(cx - 1, cy - 1, 2, 2), bright);
                gfx.draw_rect(body.inset(1), outline_c);
                gfx.draw_rect(body, bezel_c);
            }
            LedShape::Rect => {
                let w = size * 4 / 3;
                let h = size * 3 / 4;
                let body = Rect::new(cx - w / 2, cy - h / 2, w, h);
                gfx.fill_rect(body, outer);
                gfx.fill_rect(Rect::new(cx - w / 4, cy - h / 4, w / 2, h / 2), inner);
                gfx.fill_rect(Rect::new(cx - 2, cy - 1, 4, 2), bright);
                gfx.draw_rect(body.inset(1), outline_c);
                gfx.draw_rect(body, bezel_c);
            }
        }
    }
}

impl Default for Led {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Led {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        self.draw(&mut ui.gfx);
        self.last_state = self.is_on;
    }

    fn check_pressed<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        _ui: &mut Ui<G, T, C>,
        _wait_released: bool,
    ) -> bool {
        false // indicators ignore touch
    }

    fn update<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>) {
        if !self.core.can_draw() {
            return;
        }
        if self.blinking {
            let now = ui.clock.now_ms();
            if now.wrapping_sub(self.last_toggle_ms) >= self.blink_ms {
                self.last_toggle_ms = now;
                self.toggle = !self.toggle;
                self.draw(&mut ui.gfx);
            }
        } else {
            self.toggle = true;
            if self.last_state != self.is_on {
                self.draw(&mut ui.gfx);
            }
        }
        self.last_state = self.is_on;
    }
}
