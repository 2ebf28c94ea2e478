//! Single checkbox with a side label.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

pub struct Checkbox {
    core: WidgetCore,
    size: i32,
}

impl Checkbox {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            size: 20,
        }
    }

    pub fn init(
        &mut self,
        x: i32,
        y: i32,
        size: i32,
        border: Rgb565,
        bg: Rgb565,
        checked_color: Rgb565,
        border_width: i32,
        font: FontId,
    ) {
        self.size = size;
        self.core.rect = Rect::new(x, y, size, size);
        self.core.colors.border = border;
        self.core.colors.bg = bg;
        self.core.colors.text = border;
        // slightly dimmed mark so the checked fill does not glare
        self.core.colors.checked = alpha_blend(200, checked_color, palette::BLACK);
        self.core.border_width = border_width;
        self.core.font = font;
        self.core.label_datum = Datum::MiddleLeft;
        self.core.checked = false;
        self.core.last_pressed = false;
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
    }

    pub fn set_label(&mut self, label: &str) {
        self.core.set_label(label);
        // widen the touch target to cover the label text
        self.core.rect.w = self.size + self.size / 4 + 2 + 6 * label.len() as i32;
    }

    pub fn is_checked(&self) -> bool {
        self.core.checked
    }

    pub fn set_state(&mut self, gfx: &mut impl Gfx, checked: bool, redraw: bool) {
        self.core.checked = checked;
        if redraw {
            self.draw(gfx);
        }
    }

    fn draw(&mut self, gfx: &mut impl Gfx) {
        if !self.core.can_draw() {
            return;
        }
        let (text_c, check_c, border_c, bg_c) = if self.core.active {
            (
                self.core.colors.text,
                self.core.colors.checked,
                self.core.colors.border,
                self.core.colors.bg,
            )
        } else {
            (
                palette::GREY,
                palette::GREY,
                palette::DARK_GREY,
                palette::BLACK,
            )
        };
        let s = self.size;
        let bw = self.core.border_width;
        let bw2 = bw * 2;
        let r = Rect::new(self.core.rect.x, self.core.rect.y, s, s);

        gfx.fill_rect(r, bg_c);
        for i in 0..bw {
            gfx.draw_rect(r.inset(i), border_c);
        }
        let inner = Rect::new(r.x + bw + 2, r.y + bw + 2, s - bw2 - 4, s - bw2 - 4);
        if self.core.checked {
            gfx.fill_rect(inner, check_c);
            gfx.draw_wide_line(
                inner.x,
                inner.y,
                r.x + s - bw2 - 1,
                r.y + s - bw2 - 1,
                bw as u32,
                border_c,
            );
            gfx.draw_wide_line(
                inner.x,
                r.y + s - bw2 - 1,
                r.x + s - bw2 - 1,
                inner.y,
                bw as u32,
                border_c,
            );
        } else {
            gfx.fill_rect(inner, alpha_blend(150, check_c, palette::BLACK));
        }

        if self.core.label.is_empty() {
            return;
        }
        let text_x = match self.core.label_datum {
            Datum::MiddleLeft => r.x + self.core.label_dx + s + s / 4 + 2,
            Datum::MiddleRight => r.x + self.core.label_dx - s / 4 - 2,
            _ => r.x + self.core.label_dx,
        };
        gfx.draw_text(
            &self.core.label,
            text_x,
            r.y + s / 2 + self.core.label_dy + 2,
            self.core.font,
            self.core.label_datum,
            text_c,
            Some(bg_c),
        );
    }
}

impl Default for Checkbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Checkbox {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        self.draw(&mut ui.gfx);
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
        let mut toggled = false;
        if self.core.accepts_touch() && snap.pressed && self.core.contains(snap.x, snap.y) {
            if !self.core.last_pressed {
                let state = !self.core.checked;
                self.set_state(&mut ui.gfx, state, true);
                if let Some(tag) = self.core.tag {
                    ui.events.push(UiEvent::Toggled { tag, on: state });
                }
                toggled = true;
            }
            self.core.last_pressed = true;
            ui.clock.delay_ms(20); // debounce
            if wait_released {
                ui.touch.wait_released(&ui.clock);
                self.core.last_pressed = false;
            }
        } else {
            self.core.last_pressed = false;
        }
        toggled
    }
}
