//! Radial analog meter with a swinging needle.
//!
//! Tick, zone and label positions are precomputed at init so a needle move
//! repaints only the two scale segments around the old needle position.
//! The deflection is quantized to 1/400 of full scale and compared as an
//! integer: sub-pixel float noise in the smoothed level then skips the
//! repaint entirely instead of making the needle shimmer.
//!
//! Erase order matters: the old needle is drawn over in background color
//! first, then the scale segments it crossed are repaired, and the new
//! needle goes on top last.

use embedded_graphics::pixelcolor::Rgb565;
use libm::{cosf, rintf, sinf, tanf};

use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::integrator::{LevelIntegrator, LEVEL_ALPHA};
use crate::ui::palette;
use crate::ui::Gfx;

use core::fmt::Write;
use heapless::String;

use super::ranges::{range, Zone};

/// Full scale in percent.
const SCALE_MAX: i32 = 100;
const TICK_STEP: i32 = 5;
const TICK_COUNT: i32 = SCALE_MAX / TICK_STEP;
const TICK_ARRSIZE: usize = (TICK_COUNT + 1) as usize;
/// Angular offset so mid-scale points straight up.
const DEFL_CONST: f32 = 90.0 + (SCALE_MAX as f32 / 2.0);
const DEG_TO_RAD: f32 = 0.017_453_292;

#[derive(Debug, Clone, Copy, Default)]
struct Needle {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    mid_x: f32,
    mid_y: f32,
    radius: f32,
}

pub struct AnalogMeter {
    rect: Rect,
    range_idx: usize,
    needle_color: Rgb565,
    bezel_color: Rgb565,
    level: LevelIntegrator,
    /// Quantized needle position, 400 steps of full scale; -1 = undrawn.
    deflection: i32,
    green: Zone,
    orange: Zone,
    red: Zone,
    needle: Needle,

    scale_x: [i32; TICK_ARRSIZE],
    scale_y: [i32; TICK_ARRSIZE],
    short_x: [i32; TICK_ARRSIZE],
    short_y: [i32; TICK_ARRSIZE],
    long_x: [i32; TICK_ARRSIZE],
    long_y: [i32; TICK_ARRSIZE],
    label_x: [i32; TICK_ARRSIZE],
    label_y: [i32; TICK_ARRSIZE],
}

impl AnalogMeter {
    pub fn new() -> Self {
        Self {
            rect: Rect::default(),
            range_idx: 0,
            needle_color: palette::RED,
            bezel_color: palette::GREY,
            level: LevelIntegrator::new(LEVEL_ALPHA),
            deflection: -1,
            green: Zone::NONE,
            orange: Zone::NONE,
            red: Zone::NONE,
            needle: Needle::default(),
            scale_x: [0; TICK_ARRSIZE],
            scale_y: [0; TICK_ARRSIZE],
            short_x: [0; TICK_ARRSIZE],
            short_y: [0; TICK_ARRSIZE],
            long_x: [0; TICK_ARRSIZE],
            long_y: [0; TICK_ARRSIZE],
            label_x: [0; TICK_ARRSIZE],
            label_y: [0; TICK_ARRSIZE],
        }
    }

    /// Compute geometry, fill the tick/label position tables and draw the
    /// bezel. Scale and needle appear once a range is selected.
    pub fn init(&mut self, gfx: &mut impl Gfx, rect: Rect) {
        self.rect = rect;
        self.deflection = -1;
        self.level.set(0.0);

        let mid_x = rect.x as f32 + rect.w as f32 / 2.0;
        let mid_y = rect.y as f32 + rect.h as f32 * 1.1;
        let scale_radius = rect.h as f32 * 0.8;
        let tick_short_radius = scale_radius * 1.07;
        let tick_long_radius = scale_radius * 1.13;
        let label_radius = scale_radius * 1.18;
        self.needle = Needle {
            x0: mid_x as i32,
            y0: rect.y + rect.h - 14,
            x1: mid_x as i32,
            y1: rect.y + rect.h - 14,
            mid_x,
            mid_y,
            radius: scale_radius * 1.10,
        };

        for i in 0..TICK_ARRSIZE {
            let deg = (i as i32 * TICK_STEP) as f32;
            let sx = cosf((deg - DEFL_CONST) * DEG_TO_RAD);
            let sy = sinf((deg - DEFL_CONST) * DEG_TO_RAD);
            self.scale_x[i] = (sx * scale_radius + mid_x) as i32;
            self.scale_y[i] = (sy * scale_radius + mid_y) as i32;
            self.short_x[i] = (sx * tick_short_radius + mid_x) as i32;
            self.short_y[i] = (sy * tick_short_radius + mid_y) as i32;
            self.long_x[i] = (sx * tick_long_radius + mid_x) as i32;
            self.long_y[i] = (sy * tick_long_radius + mid_y) as i32;
            self.label_x[i] = (sx * label_radius + mid_x) as i32;
            self.label_y[i] = (sy * label_radius + mid_y) as i32;
        }

        for i in 0..3 {
            gfx.draw_rect(rect.inset(i), self.bezel_color);
        }
        gfx.fill_rect(
            Rect::new(rect.x + 2, rect.y + rect.h - 14, rect.w - 4, 14),
            self.bezel_color,
        );
        gfx.draw_rect(
            Rect::new(rect.x + 3, rect.y + 3, rect.w - 5, rect.h - 15),
            palette::DARK_GREY,
        );
    }

    /// Select the measurement range; picks up zones, decimals and units
    /// from the range table and repaints everything.
    pub fn set_range(&mut self, gfx: &mut impl Gfx, range_idx: usize, color: Rgb565) {
        let rng = range(range_idx);
        self.range_idx = range_idx;
        self.needle_color = color;
        self.green = rng.green;
        self.orange = rng.orange;
        self.red = rng.red;
        let level = self.level.value();
        self.set_level(gfx, level, true);
    }

    /// Repaint the scale between two tick steps, optionally with labels.
    fn draw_partial_scale(
        &self,
        gfx: &mut impl Gfx,
        start_step: i32,
        end_step: i32,
        redraw_vals: bool,
    ) {
        let start_step = start_step.max(0);
        let end_step = end_step.min(TICK_COUNT);
        let rng = range(self.range_idx);

        let mut idx = start_step as usize;
        let mut i = start_step * TICK_STEP;
        let end_pos = end_step * TICK_STEP;
        while i <= end_pos {
            let x0 = self.scale_x[idx];
            let y0 = self.scale_y[idx];
            let x1 = self.short_x[idx];
            let y1 = self.short_y[idx];

            let (xt, yt) = if i % 25 == 0 {
                let xt = self.long_x[idx];
                let yt = self.long_y[idx];
                gfx.draw_line(x0, y0, xt, yt, palette::BLACK);
                (xt, yt)
            } else {
                (x1, y1)
            };

            if idx < TICK_COUNT as usize {
                let x0n = self.scale_x[idx + 1];
                let y0n = self.scale_y[idx + 1];
                let x1n = self.short_x[idx + 1];
                let y1n = self.short_y[idx + 1];
                for (zone, color) in [
                    (self.green, palette::GREEN),
                    (self.orange, palette::ORANGE),
                    (self.red, palette::RED),
                ] {
                    if zone.is_set() && i >= zone.start && i < zone.end {
                        gfx.fill_triangle([(x0, y0), (x1, y1), (x0n, y0n)], color);
                        gfx.fill_triangle([(x1, y1), (x0n, y0n), (x1n, y1n)], color);
                        // tick line again, the fill just covered it
                        gfx.draw_line(x0, y0, xt, yt, palette::BLACK);
                    }
                }
                gfx.draw_line(x0, y0, x0n, y0n, palette::BLACK);
                gfx.draw_line(x1, y1, x1n, y1n, palette::BLACK);
                gfx.draw_line(x0n, y0n, x1n, y1n, palette::BLACK);
            }

            if redraw_vals && i % 25 == 0 {
                let lx = self.label_x[idx];
                let ly = self.label_y[idx];
                let (text, dy): (String<12>, i32) = match i / 25 {
                    0 => {
                        let mut s = String::new();
                        let _ = s.push('0');
                        (s, -12)
                    }
                    step @ 1..=3 => {
                        let mut s = String::new();
                        let _ = write!(
                            s,
                            "{:.*}",
                            rng.scale_decimals,
                            rng.max_val * 0.25 * step as f32
                        );
                        (s, if step == 2 { -7 } else { -9 })
                    }
                    _ => {
                        let mut s = String::new();
                        let _ = write!(s, "{:.*}", rng.scale_decimals, rng.max_val);
                        (s, -12)
                    }
                };
                gfx.draw_text(
                    &text,
                    lx,
                    ly + dy,
                    FontId::Body,
                    Datum::TopCentre,
                    palette::BLACK,
                    None,
                );
            }
            i += TICK_STEP;
            idx += 1;
        }
    }

    /// Repair the scale after a needle erase. Full redraws repaint the
    /// whole arc; otherwise only the segments around the old needle.
    fn draw_scale(&self, gfx: &mut impl Gfx, needle_pos: i32, full_redraw: bool) {
        if full_redraw {
            self.draw_partial_scale(gfx, 0, TICK_COUNT, true);
        } else {
            let pos = needle_pos.clamp(-5, 105);
            let step = pos / TICK_STEP;
            self.draw_partial_scale(gfx, step - 1, step + 1, false);
        }
    }

    /// Feed a new level; smooths, redraws the value text on visible change
    /// and moves the needle only when its quantized deflection changes.
    pub fn set_level(&mut self, gfx: &mut impl Gfx, level: f32, full_redraw: bool) {
        let r = self.rect;
        if full_redraw {
            gfx.fill_rect(
                Rect::new(r.x + 4, r.y + 4, r.w - 7, r.h - 17),
                palette::WHITE,
            );
            self.deflection = -1;
            self.level.set(level);
        }

        let rng = range(self.range_idx);
        let last_level = self.level.value();
        let smoothed = self.level.integrate(level);

        if (smoothed - last_level).abs() > 0.001 || full_redraw {
            let mut text: String<16> = String::new();
            let _ = write!(text, "{:.*}", rng.val_decimals, smoothed * rng.max_val);
            gfx.draw_text_padded(
                &text,
                r.x + 10,
                r.y + (r.h * 4) / 5 - 12,
                FontId::Value,
                Datum::TopLeft,
                self.needle_color,
                palette::WHITE,
                60,
            );
        }

        // allow a little overshoot past both scale ends, then pin
        if smoothed > 1.05 {
            self.level.set(1.05);
        } else if smoothed < -0.05 {
            self.level.set(-0.05);
        }
        let smoothed = self.level.value();

        let new_deflection = rintf(400.0 * smoothed) as i32;
        if new_deflection == self.deflection && !full_redraw {
            return;
        }

        // the unit label sits inside the needle sweep, restore it first
        gfx.draw_text(
            rng.unit,
            r.x + r.w / 2,
            r.y + r.h / 2,
            FontId::Heading,
            Datum::TopCentre,
            palette::BLACK,
            Some(palette::WHITE),
        );

        // erase old needle before repairing the scale under it
        gfx.draw_wide_line(
            self.needle.x0,
            self.needle.y0,
            self.needle.x1,
            self.needle.y1,
            2,
            palette::WHITE,
        );
        self.draw_scale(gfx, self.deflection / 4, full_redraw);
        self.deflection = new_deflection;

        let sdeg = smoothed * SCALE_MAX as f32 - DEFL_CONST;
        let sx = cosf(sdeg * DEG_TO_RAD);
        let sy = sinf(sdeg * DEG_TO_RAD);
        let tx = tanf((sdeg + 90.0) * DEG_TO_RAD);
        let shift_x = (r.h as f32 * tx) / 8.0;

        // pivot is below the visible window; shifting the needle base
        // fakes the longer arm
        self.needle.x0 = self.needle.mid_x as i32 + rintf(shift_x) as i32;
        self.needle.y0 = r.y + r.h - 15;
        self.needle.x1 = (sx * self.needle.radius + self.needle.mid_x) as i32;
        self.needle.y1 = (sy * self.needle.radius + self.needle.mid_y) as i32;
        gfx.draw_wide_line(
            self.needle.x0,
            self.needle.y0,
            self.needle.x1,
            self.needle.y1,
            2,
            self.needle_color,
        );
    }

    /// Point test; upper edges exclusive, unlike widget rectangles.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.rect.x
            && x < self.rect.x + self.rect.w
            && y >= self.rect.y
            && y < self.rect.y + self.rect.h
    }
}

impl Default for AnalogMeter {
    fn default() -> Self {
        Self::new()
    }
}
