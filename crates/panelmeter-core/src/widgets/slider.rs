//! Draggable slider, horizontal or vertical.
//!
//! A press inside the track enters a blocking drag loop: re-poll, map the
//! touch coordinate to a fractional level, low-pass it, repaint the thumb
//! and emit the level — every iteration, until release. The first sample
//! of a drag bypasses the filter so the thumb does not spring in from its
//! previous position.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::integrator::LEVEL_ALPHA;
use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

pub struct Slider {
    core: WidgetCore,
    orientation: Orientation,
    level: f32,
    level_integrator: f32,
    thumb_travel: i32,
    thumb_start: i32,
    thumb_width: i32,
    thumb_height: i32,
    thumb_cross: i32,
}

impl Slider {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            core: WidgetCore::new(),
            orientation,
            level: 0.5,
            level_integrator: 0.5,
            thumb_travel: 0,
            thumb_start: 0,
            thumb_width: 0,
            thumb_height: 0,
            thumb_cross: 0,
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
        self.core.last_pressed = false;
        self.level = 0.5;
        self.level_integrator = 0.5;

        let bw = border_width;
        match self.orientation {
            Orientation::Horizontal => {
                self.thumb_cross = rect.y + bw + 2;
                self.thumb_width = rect.h - bw * 2;
                self.thumb_height = self.thumb_width - 4;
                self.thumb_travel = rect.w - self.thumb_width - bw * 2 - 4;
                self.thumb_start = rect.x + self.thumb_width / 2 + bw + 2;
            }
            Orientation::Vertical => {
                self.thumb_cross = rect.x + bw + 2;
                self.thumb_width = rect.w - bw * 2;
                self.thumb_height = self.thumb_width - 4;
                self.thumb_travel = rect.h - self.thumb_width - bw * 2 - 4;
                self.thumb_start = rect.y + self.thumb_width / 2 + bw + 2;
            }
        }
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
    }

    pub fn set_label(&mut self, label: &str) {
        self.core.set_label(label);
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn set_level(&mut self, gfx: &mut impl Gfx, level: f32, redraw: bool) {
        self.level = level;
        self.level_integrator = level;
        if redraw {
            self.draw(gfx, level, true);
        }
    }

    /// Fractional position of a touch coordinate along the track.
    fn level_from_touch(&self, x: i32, y: i32) -> f32 {
        let raw = match self.orientation {
            Orientation::Horizontal => (x - self.thumb_start) as f32 / self.thumb_travel as f32,
            // vertical sliders grow upward
            Orientation::Vertical => {
                1.0 - (y - self.thumb_start) as f32 / self.thumb_travel as f32
            }
        };
        raw.clamp(0.0, 1.0)
    }

    fn draw(&mut self, gfx: &mut impl Gfx, level: f32, draw_border: bool) {
        if !self.core.can_draw() {
            return;
        }
        let (border_c, thumb_c, text_c, fill_c) = if self.core.active {
            (
                self.core.colors.border,
                self.core.colors.thumb,
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
        let radius = match self.orientation {
            Orientation::Horizontal => r.h / 6,
            Orientation::Vertical => r.w / 6,
        };
        if bw > 0 && draw_border {
            for i in 0..bw {
                gfx.draw_round_rect(r.inset(i), radius, border_c);
            }
        }
        gfx.fill_round_rect(r.inset(bw), radius - bw, fill_c);

        match self.orientation {
            Orientation::Horizontal => {
                let delta = libm::rintf(self.thumb_travel as f32 * level) as i32;
                let knob_x = self.thumb_start + delta - self.thumb_width / 2;
                let knob_cx = knob_x + self.thumb_width / 2;
                gfx.fill_round_rect(
                    Rect::new(knob_x, self.thumb_cross, self.thumb_width, self.thumb_height),
                    radius,
                    thumb_c,
                );
                let groove_y = self.thumb_cross + 3;
                let groove_len = self.thumb_height - 6;
                gfx.draw_vline(knob_cx - 5, groove_y, groove_len, border_c);
                gfx.draw_vline(knob_cx, groove_y, groove_len, border_c);
                gfx.draw_vline(knob_cx + 5, groove_y, groove_len, border_c);
            }
            Orientation::Vertical => {
                let delta = libm::rintf(self.thumb_travel as f32 * (1.0 - level)) as i32;
                let knob_y = self.thumb_start + delta - self.thumb_width / 2;
                let knob_cy = knob_y + self.thumb_width / 2;
                gfx.fill_round_rect(
                    Rect::new(self.thumb_cross, knob_y, self.thumb_height, self.thumb_width),
                    radius,
                    thumb_c,
                );
                let groove_x = self.thumb_cross + 3;
                let groove_len = self.thumb_height - 6;
                gfx.draw_hline(groove_x, knob_cy - 5, groove_len, border_c);
                gfx.draw_hline(groove_x, knob_cy, groove_len, border_c);
                gfx.draw_hline(groove_x, knob_cy + 5, groove_len, border_c);
            }
        }

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

impl Widget for Slider {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        let level = self.level;
        self.draw(&mut ui.gfx, level, true);
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

        // Drag sub-loop: monopolizes the input stream until release.
        let mut first_touch = true;
        while ui.touch.poll().pressed {
            let s = ui.touch.snapshot();
            let level = self.level_from_touch(s.x, s.y);
            if first_touch {
                self.level_integrator = level;
                first_touch = false;
            }
            self.level_integrator += (level - self.level_integrator) * LEVEL_ALPHA;
            let draw_level = self.level_integrator;
            self.draw(&mut ui.gfx, draw_level, false);
            ui.gfx.present();
            if let Some(tag) = self.core.tag {
                ui.events.push(UiEvent::LevelChanged {
                    tag,
                    level: draw_level,
                });
            }
            ui.clock.delay_ms(10); // debounce
            if !wait_released {
                break;
            }
        }
        if wait_released {
            ui.touch.wait_released(&ui.clock);
        }
        self.level = self.level_integrator;
        true
    }
}
