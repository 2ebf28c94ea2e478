//! Slide on/off switch.
//!
//! The thumb snaps between the two ends of the track; the off state dims
//! the thumb color instead of swapping it out.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

pub struct SlideSwitch {
    core: WidgetCore,
    thumb_travel: i32,
    thumb_start: i32,
    thumb_width: i32,
    thumb_height: i32,
    thumb_y: i32,
    is_on: bool,
}

impl SlideSwitch {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            thumb_travel: 0,
            thumb_start: 0,
            thumb_width: 0,
            thumb_height: 0,
            thumb_y: 0,
            is_on: false,
        }
    }

    pub fn init(
        &mut self,
        rect: Rect,
        border: Rgb565,
        thumb: Rgb565,
        text: Rgb565,
        border_width: i32,
        font: FontId,
    ) {
        self.core.rect = rect;
        self.core.colors.border = border;
        self.core.colors.thumb = thumb;
        self.core.colors.text = text;
        self.core.colors.fill = alpha_blend(128, border, palette::BLACK);
        self.core.border_width = border_width;
        self.core.font = font;
        self.core.label_datum = Datum::TopCentre;
        self.is_on = false;
        self.core.last_pressed = false;

        let bw = border_width;
        self.thumb_y = rect.y + bw + 2;
        self.thumb_width = rect.h - bw * 2;
        self.thumb_height = self.thumb_width - 4;
        self.thumb_travel = rect.w - self.thumb_width - bw * 2 - 4;
        self.thumb_start = rect.x + self.thumb_width / 2 + bw + 2;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn init_center(
        &mut self,
        cx: i32,
        cy: i32,
        w: i32,
        h: i32,
        border: Rgb565,
        thumb: Rgb565,
        text: Rgb565,
        border_width: i32,
        font: FontId,
    ) {
        self.init(
            Rect::new(cx - w / 2, cy - h / 2, w, h),
            border,
            thumb,
            text,
            border_width,
            font,
        );
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
    }

    pub fn set_label(&mut self, label: &str) {
        self.core.set_label(label);
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn set_state(&mut self, gfx: &mut impl Gfx, on: bool, redraw: bool) {
        self.is_on = on;
        self.core.checked = on;
        if redraw {
            self.draw(gfx, on, true);
        }
    }

    fn draw(&mut self, gfx: &mut impl Gfx, on: bool, draw_border: bool) {
        if !self.core.can_draw() {
            return;
        }
        let (border_c, thumb_c, text_c, fill_c) = if self.core.active {
            let thumb_c = if on {
                self.core.colors.thumb
            } else {
                alpha_blend(120, self.core.colors.thumb, palette::BLACK)
            };
            (
                self.core.colors.border,
                thumb_c,
                self.core.colors.text,
                self.core.colors.fill,
            )
        } else {
            (
                palette::DARK_GREY,
                palette::DARK_GREY,
                palette::DARK_GREY,
                palette::BLACK,
            )
        };

        let r = self.core.rect;
        let bw = self.core.border_width;
        let radius = r.w.min(r.h) / 4;
        if bw > 0 && draw_border {
            for i in 0..bw {
                gfx.draw_round_rect(r.inset(i), radius, border_c);
            }
        }
        gfx.fill_round_rect(r.inset(bw), radius - bw, fill_c);

        let delta = if on { self.thumb_travel } else { 0 };
        let knob_x = self.thumb_start + delta - self.thumb_width / 2;
        let knob_cx = knob_x + self.thumb_width / 2;
        gfx.fill_round_rect(
            Rect::new(knob_x, self.thumb_y, self.thumb_width, self.thumb_height),
            radius,
            thumb_c,
        );
        // grip grooves
        let groove_y = self.thumb_y + 3;
        let groove_len = self.thumb_height - 6;
        gfx.draw_vline(knob_cx - 5, groove_y, groove_len, border_c);
        gfx.draw_vline(knob_cx, groove_y, groove_len, border_c);
        gfx.draw_vline(knob_cx + 5, groove_y, groove_len, border_c);

        if self.core.label.is_empty() {
            return;
        }
        let (cx, cy) = r.center();
        match self.core.label_datum {
            Datum::TopCentre => gfx.draw_text(
                &self.core.label,
                cx + self.core.label_dx,
                r.y + self.core.label_dy - 2,
                self.core.font,
                Datum::BottomCentre,
                text_c,
                Some(palette::BLACK),
            ),
            Datum::BottomCentre => gfx.draw_text(
                &self.core.label,
                cx + self.core.label_dx,
                r.y + self.core.label_dy + r.h + 2,
                self.core.font,
                Datum::TopCentre,
                text_c,
                Some(palette::BLACK),
            ),
            datum => gfx.draw_text(
                &self.core.label,
                r.x + self.core.label_dx,
                cy + self.core.label_dy,
                self.core.font,
                datum,
                text_c,
                Some(palette::BLACK),
            ),
        }
    }
}

impl Default for SlideSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for SlideSwitch {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        let on = self.is_on;
        self.draw(&mut ui.gfx, on, true);
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
        if self.core.accepts_touch() && snap.pressed && self.core.contains(snap.x, snap.y) {
            if !self.core.last_pressed {
                let state = !self.is_on;
                self.set_state(&mut ui.gfx, state, true);
                if let Some(tag) = self.core.tag {
                    ui.events.push(UiEvent::Toggled { tag, on: state });
                }
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
        self.is_on
    }
}
