//! Damage-tracked bargraph, horizontal or vertical.
//!
//! The display bus is slow, so the update path never repaints the whole
//! track: it remembers the bar length and peak position of the previous
//! frame and paints only the grown or shrunk slice, the 1-px end cap and
//! the moved peak indicator. When neither moved, the update returns
//! without touching the display at all — that fast path is what keeps the
//! 15 Hz refresh affordable.
//!
//! A bargraph built with touch enabled also acts as a setpoint control:
//! dragging inside the track temporarily recolors the bar, live-tracks the
//! finger, and on release stores the position as the level-mark triangle.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::integrator::{LevelIntegrator, PeakDecay, PeakIntegrator, LEVEL_ALPHA, PEAK_DECAY};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui};

use core::fmt::Write;
use heapless::String;

use super::ranges::range;

/// Fine tick count along the track.
const TICK_COUNT: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

pub struct Bargraph {
    orientation: Orientation,
    rect: Rect,
    bar_x: i32,
    bar_y: i32,
    bar_w: i32,
    bar_h: i32,
    bar_len: i32,
    bar_x_end: i32,
    bar_y_end: i32,
    baseline: i32,

    range_idx: usize,
    level: LevelIntegrator,
    peak: PeakIntegrator,
    peak_tracking: bool,
    level_mark: f32,
    last_bar_pos: i32,
    last_peak_pos: i32,

    scale_color: Rgb565,
    needle_color: Rgb565,
    text_color: Rgb565,
    bezel_color: Rgb565,
    gradient_color: Rgb565,
    scale_gradient_color: Rgb565,

    touch_enabled: bool,
    enabled: bool,
    visible: bool,
    active: bool,
}

impl Bargraph {
    pub fn new(orientation: Orientation, peak_decay: PeakDecay) -> Self {
        Self {
            orientation,
            rect: Rect::default(),
            bar_x: 0,
            bar_y: 0,
            bar_w: 0,
            bar_h: 0,
            bar_len: 1,
            bar_x_end: 0,
            bar_y_end: 0,
            baseline: 0,
            range_idx: 0,
            level: LevelIntegrator::new(LEVEL_ALPHA),
            peak: PeakIntegrator::new(PEAK_DECAY, peak_decay),
            peak_tracking: false,
            level_mark: -1.0,
            last_bar_pos: 0,
            last_peak_pos: 0,
            scale_color: palette::LIGHT_GREY,
            needle_color: palette::GREEN,
            text_color: palette::BLACK,
            bezel_color: palette::GREY,
            gradient_color: palette::BLACK,
            scale_gradient_color: palette::BLACK,
            touch_enabled: false,
            enabled: true,
            visible: true,
            active: true,
        }
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch_enabled = enabled;
    }

    /// Compute the track geometry. The frame is not drawn until a range is
    /// selected with [`Bargraph::set_range`].
    pub fn init(&mut self, rect: Rect) {
        self.rect = rect;
        match self.orientation {
            Orientation::Horizontal => {
                self.bar_x = rect.x + 8;
                self.bar_y = rect.y + 8;
                self.bar_w = rect.w - 16;
                self.bar_len = self.bar_w;
                self.bar_x_end = self.bar_x + self.bar_w - 1;
                self.baseline = rect.y + rect.h / 2;
                self.bar_h = self.baseline - self.bar_y - 1;
                self.bar_y_end = self.bar_y + self.bar_h - 1;
            }
            Orientation::Vertical => {
                self.bar_x = rect.x + 10;
                self.bar_y = rect.y + 8;
                self.bar_w = rect.w - 48;
                self.bar_h = rect.h - 16;
                self.bar_len = self.bar_h;
                self.bar_x_end = self.bar_x + self.bar_w - 1;
                self.bar_y_end = self.bar_y + self.bar_h - 1;
                self.baseline = rect.x + rect.w - 38;
            }
        }
        self.last_bar_pos = 0;
        self.last_peak_pos = self.bar_len - 2;
        self.level_mark = -1.0; // forces a full redraw on first update
        self.level.set(0.0);
        self.peak.set(0.0);
    }

    /// Select range, bar color and peak tracking; repaints frame and bar.
    pub fn set_range(
        &mut self,
        gfx: &mut impl Gfx,
        range_idx: usize,
        color: Rgb565,
        peak_tracking: bool,
    ) {
        self.range_idx = range_idx;
        self.needle_color = color;
        self.gradient_color = alpha_blend(100, color, palette::BLACK);
        self.scale_gradient_color = alpha_blend(160, self.scale_color, palette::BLACK);
        self.peak_tracking = peak_tracking;
        self.draw_frame(gfx);
        let level = self.level.value();
        self.set_level(gfx, level, true);
    }

    pub fn set_level(&mut self, gfx: &mut impl Gfx, level: f32, full_redraw: bool) {
        if full_redraw {
            self.draw_frame(gfx);
        }
        let mark = self.level_mark;
        self.update(gfx, level, mark, full_redraw);
    }

    pub fn set_level_marker(&mut self, gfx: &mut impl Gfx, marker: f32, redraw: bool) {
        self.level_mark = marker;
        if self.visible && self.enabled && redraw {
            let level = self.level.value();
            self.update(gfx, level, marker, true);
        }
    }

    pub fn level_marker(&self) -> f32 {
        self.level_mark
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn bar_rect(&self) -> Rect {
        Rect::new(self.bar_x, self.bar_y, self.bar_w, self.bar_h)
    }

    /// Background gradient fill of the whole track, orientation-aware.
    fn fill_track_bg(&self, gfx: &mut impl Gfx, rect: Rect) {
        match self.orientation {
            Orientation::Horizontal => {
                gfx.fill_rect_v_gradient(rect, self.scale_color, self.scale_gradient_color)
            }
            Orientation::Vertical => {
                gfx.fill_rect_h_gradient(rect, self.scale_color, self.scale_gradient_color)
            }
        }
    }

    fn fill_track_fg(&self, gfx: &mut impl Gfx, rect: Rect) {
        match self.orientation {
            Orientation::Horizontal => {
                gfx.fill_rect_v_gradient(rect, self.needle_color, self.gradient_color)
            }
            Orientation::Vertical => {
                gfx.fill_rect_h_gradient(rect, self.needle_color, self.gradient_color)
            }
        }
    }

    /// Bezel, track background and tick scale.
    pub fn draw_frame(&mut self, gfx: &mut impl Gfx) {
        if !self.visible || !self.enabled {
            return;
        }
        let r = self.rect;
        for i in 0..3 {
            gfx.draw_rect(r.inset(i), self.bezel_color);
        }
        gfx.draw_rect(r.inset(3), palette::DARK_GREY);
        gfx.fill_rect(r.inset(4), self.scale_color);

        gfx.draw_rect(
            Rect::new(self.bar_x - 1, self.bar_y - 1, self.bar_w + 2, self.bar_h + 2),
            self.text_color,
        );
        self.fill_track_bg(gfx, self.bar_rect());

        match self.orientation {
            Orientation::Horizontal => self.draw_scale_horizontal(gfx),
            Orientation::Vertical => self.draw_scale_vertical(gfx),
        }
    }

    fn draw_scale_horizontal(&self, gfx: &mut impl Gfx) {
        let rng = range(self.range_idx);
        let mut tick_p = self.bar_x as f32 - 1.0;
        let tick_end = self.bar_x_end as f32;
        let tick_inc = (tick_end - tick_p) / TICK_COUNT as f32;
        let tl = self.bar_h / 2;
        let y1 = self.baseline + tl + 2;
        let mut mult = 0.0f32;
        let mut idx = 0;
        while tick_p <= tick_end {
            let x_tick = libm::rintf(tick_p) as i32;
            gfx.draw_vline(x_tick, self.baseline, tl, self.text_color);
            if idx % 4 == 0 {
                gfx.draw_vline(x_tick + 1, self.baseline, tl, self.text_color);
                if idx == 0 {
                    // unit label below the origin tick
                    let (datum, y) = if self.rect.h > 50 {
                        (Datum::BottomLeft, self.rect.y + self.rect.h - 5)
                    } else {
                        (Datum::TopLeft, y1)
                    };
                    gfx.draw_text(
                        rng.unit,
                        x_tick,
                        y,
                        FontId::Small,
                        datum,
                        self.text_color,
                        Some(self.scale_color),
                    );
                } else {
                    let datum = if idx == TICK_COUNT {
                        Datum::TopRight
                    } else {
                        Datum::TopCentre
                    };
                    let mut text: String<12> = String::new();
                    let _ = write!(text, "{:.*}", rng.scale_decimals, rng.max_val * mult);
                    gfx.draw_text(
                        &text,
                        x_tick,
                        y1,
                        FontId::Small,
                        datum,
                        self.text_color,
                        Some(self.scale_color),
                    );
                }
                mult += 0.25;
            }
            tick_p += tick_inc;
            idx += 1;
        }
    }

    fn draw_scale_vertical(&self, gfx: &mut impl Gfx) {
        let rng = range(self.range_idx);
        let mut tick_p = self.bar_y as f32 - 1.0;
        let tick_end = self.bar_y_end as f32;
        let tick_inc = (tick_end - tick_p) / TICK_COUNT as f32;
        let tl = 6;
        let x1 = self.baseline + tl + 1;
        let mut mult = 1.0f32;
        let mut idx = 0;
        while tick_p <= tick_end {
            let y_tick = libm::rintf(tick_p) as i32;
            gfx.draw_hline(self.baseline, y_tick, tl, self.text_color);
            if idx % 4 == 0 {
                gfx.draw_hline(self.baseline, y_tick + 1, tl, self.text_color);
                if idx < TICK_COUNT {
                    let datum = if idx == 0 {
                        Datum::TopLeft
                    } else {
                        Datum::MiddleLeft
                    };
                    let mut text: String<12> = String::new();
                    let _ = write!(text, "{:.*}", rng.scale_decimals, rng.max_val * mult);
                    gfx.draw_text(
                        &text,
                        x1,
                        y_tick + 1,
                        FontId::Small,
                        datum,
                        self.text_color,
                        Some(self.scale_color),
                    );
                } else {
                    gfx.draw_text(
                        rng.unit,
                        x1 + 3,
                        y_tick + 3,
                        FontId::Body,
                        Datum::BottomLeft,
                        self.text_color,
                        Some(self.scale_color),
                    );
                }
                mult -= 0.25;
            }
            tick_p += tick_inc;
            idx += 1;
        }
    }

    // -----------------------------------------------------------------------
    // Incremental update
    // -----------------------------------------------------------------------

    /// Feed a new level and repaint only what changed.
    ///
    /// `level` and `level_mark` are fractions of full scale. The mark
    /// triangle is drawn only for `level_mark >= 0`; changing the mark (or
    /// passing `full_redraw`) wipes the track back to background and
    /// repaints everything once.
    pub fn update(&mut self, gfx: &mut impl Gfx, level: f32, level_mark: f32, full_redraw: bool) {
        if !self.visible || !self.enabled {
            return;
        }
        let level = level.clamp(0.0, 1.0);
        let level_integrator = self.level.integrate(level);
        let mut new_length = ((self.bar_len - 1) as f32 * level_integrator) as i32;

        let peak_integrator = if self.peak_tracking {
            self.peak.integrate(level)
        } else {
            self.peak.set(level);
            level
        };
        let mut peak_pos = ((self.bar_len - 1) as f32 * peak_integrator) as i32;

        // keep both inside the track, reserving room for the end cap
        if peak_pos >= self.bar_len - 3 {
            peak_pos = self.bar_len - 3;
        }
        if new_length >= self.bar_len - 2 {
            new_length = self.bar_len - 2;
        }
        if peak_pos < new_length {
            peak_pos = new_length;
        }
        if self.last_peak_pos < new_length {
            // the erase below must never land inside the lit bar
            self.last_peak_pos = new_length;
        }

        if self.level_mark != level_mark || full_redraw {
            self.level_mark = level_mark;
            self.last_bar_pos = 0;
            self.last_peak_pos = self.bar_len - 3;
            self.fill_track_bg(gfx, self.bar_rect());
        }

        let old_length = self.last_bar_pos;
        if new_length == old_length && peak_pos == self.last_peak_pos {
            return; // nothing moved, not a single draw call
        }

        let diff = new_length - old_length;
        match self.orientation {
            Orientation::Horizontal => {
                let new_x = self.bar_x + new_length;
                if diff > 0 {
                    self.fill_track_fg(
                        gfx,
                        Rect::new(self.bar_x + old_length, self.bar_y, diff, self.bar_h),
                    );
                }
                gfx.draw_vline(new_x, self.bar_y, self.bar_h, self.text_color);
                if diff < 0 {
                    self.fill_track_bg(
                        gfx,
                        Rect::new(new_x + 1, self.bar_y, -diff, self.bar_h),
                    );
                }
                if self.peak_tracking && peak_pos > 0 {
                    self.fill_track_bg(
                        gfx,
                        Rect::new(self.bar_x + self.last_peak_pos, self.bar_y, 2, self.bar_h),
                    );
                    gfx.draw_vline(self.bar_x + peak_pos, self.bar_y, self.bar_h, palette::RED);
                    gfx.draw_vline(
                        self.bar_x + peak_pos + 1,
                        self.bar_y,
                        self.bar_h,
                        palette::RED,
                    );
                }
                if level_mark >= 0.0 {
                    let sv = (self.bar_len as f32 * level_mark) as i32 + self.bar_x;
                    gfx.fill_triangle(
                        [
                            (sv, self.bar_y + self.bar_h - 4),
                            (sv - 4, self.bar_y + 6),
                            (sv + 3, self.bar_y + 6),
                        ],
                        palette::BLACK,
                    );
                    gfx.draw_triangle(
                        [
                            (sv, self.bar_y + self.bar_h - 3),
                            (sv - 5, self.bar_y + 5),
                            (sv + 4, self.bar_y + 5),
                        ],
                        palette::WHITE,
                    );
                }
            }
            Orientation::Vertical => {
                let new_y = self.bar_y_end - new_length;
                if diff > 0 {
                    self.fill_track_fg(
                        gfx,
                        Rect::new(self.bar_x, new_y, self.bar_w, diff + 1),
                    );
                }
                gfx.draw_hline(self.bar_x, new_y, self.bar_w, self.text_color);
                if diff < 0 {
                    self.fill_track_bg(
                        gfx,
                        Rect::new(self.bar_x, self.bar_y_end - old_length, self.bar_w, -diff),
                    );
                }
                if self.peak_tracking && peak_pos > 0 {
                    self.fill_track_bg(
                        gfx,
                        Rect::new(
                            self.bar_x,
                            self.bar_y_end - self.last_peak_pos - 1,
                            self.bar_w,
                            2,
                        ),
                    );
                    gfx.draw_hline(
                        self.bar_x,
                        self.bar_y_end - peak_pos,
                        self.bar_w,
                        palette::RED,
                    );
                    gfx.draw_hline(
                        self.bar_x,
                        self.bar_y_end - peak_pos - 1,
                        self.bar_w,
                        palette::RED,
                    );
                }
                if level_mark >= 0.0 {
                    let sv = self.bar_y_end - (self.bar_len as f32 * level_mark) as i32;
                    gfx.fill_triangle(
                        [
                            (self.bar_x_end - 4, sv),
                            (self.bar_x + 6, sv - 4),
                            (self.bar_x + 6, sv + 3),
                        ],
                        palette::BLACK,
                    );
                    gfx.draw_triangle(
                        [
                            (self.bar_x_end - 3, sv),
                            (self.bar_x + 5, sv - 5),
                            (self.bar_x + 5, sv + 4),
                        ],
                        palette::WHITE,
                    );
                }
            }
        }

        self.last_bar_pos = new_length;
        self.last_peak_pos = peak_pos;
    }

    // -----------------------------------------------------------------------
    // Touch drag
    // -----------------------------------------------------------------------

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.bar_x && x <= self.bar_x_end && y >= self.bar_y && y <= self.bar_y_end
    }

    fn level_from_touch(&self, x: i32, y: i32) -> f32 {
        let raw = match self.orientation {
            Orientation::Horizontal => (x - self.bar_x) as f32 / self.bar_w as f32,
            Orientation::Vertical => (self.bar_y_end - y) as f32 / self.bar_h as f32,
        };
        raw.clamp(0.0, 1.0)
    }

    /// Drag the level-mark setpoint.
    ///
    /// Enters a blocking loop tracking the finger with the bar drawn in the
    /// scale color; on release the touched position becomes the new mark
    /// and the pre-drag level is restored. Returns true when a drag
    /// happened — read the new mark with [`Bargraph::level_marker`].
    pub fn check_pressed<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
    ) -> bool {
        if !self.enabled || !self.touch_enabled {
            return false;
        }
        let snap = ui.touch.snapshot();
        if !(self.active && snap.pressed && self.contains(snap.x, snap.y)) {
            return false;
        }

        let saved_color = self.needle_color;
        self.needle_color = self.scale_color;
        self.gradient_color = alpha_blend(100, self.needle_color, palette::BLACK);
        let old_level = self.level.value();
        let mark = self.level_mark;

        let mut level = self.level_from_touch(snap.x, snap.y);
        self.level.set(level);
        self.peak.set(level);
        self.update(&mut ui.gfx, level, mark, true);
        while ui.touch.poll().pressed {
            let s = ui.touch.snapshot();
            level = self.level_from_touch(s.x, s.y);
            self.peak.set(level); // track the finger without decay lag
            self.update(&mut ui.gfx, level, mark, false);
            ui.gfx.present();
            ui.clock.delay_ms(10);
        }
        ui.touch.wait_released(&ui.clock);

        self.level_mark = level;
        self.needle_color = saved_color;
        self.gradient_color = alpha_blend(100, saved_color, palette::BLACK);
        self.level.set(old_level);
        self.peak.set(old_level);
        let new_mark = self.level_mark;
        self.update(&mut ui.gfx, old_level, new_mark, true);
        true
    }
}
