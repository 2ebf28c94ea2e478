//! Scrolling oscilloscope widget.
//!
//! Each trace is a fixed-length ring of quantized samples, one per
//! horizontal pixel column. A new sample shifts the whole buffer left one
//! slot and appends at the end — O(width) per sample, which is fine at a
//! ~300 px trace and ~15 Hz sample rate and keeps the draw path trivial.
//!
//! Scrolling never clears the panel. Because the trace moved one column
//! left, the previous frame's segment at column `x` is exactly the current
//! buffer value one slot earlier: the draw pass walks the columns erasing
//! that segment in background color and drawing the new one, and the grid
//! is re-stamped afterwards since the erase lines cut through it.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::Vec;

use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::palette;
use crate::ui::Gfx;

use core::fmt::Write;
use heapless::String;

use super::ranges::range;

/// Maximum trace length, full display width.
pub const SCOPE_MAX_POINTS: usize = 320;
/// Number of simultaneously displayed traces.
pub const NUM_TRACES: usize = 2;

const DIV_X: i32 = 6;
const DIV_Y: i32 = 5;
const TEXT_H: i32 = 14;
const TEXT_W: i32 = 30;

struct Trace {
    color: Rgb565,
    range_idx: usize,
    vals: Vec<i16, SCOPE_MAX_POINTS>,
}

impl Trace {
    fn new() -> Self {
        Self {
            color: palette::GREEN,
            range_idx: 0,
            vals: Vec::new(),
        }
    }
}

pub struct ScrollingScope {
    pos_x: i32,
    pos_y: i32,
    screen_w: i32,
    screen_h: i32,
    traces: [Trace; NUM_TRACES],
}

impl ScrollingScope {
    pub fn new() -> Self {
        Self {
            pos_x: 0,
            pos_y: 0,
            screen_w: 0,
            screen_h: 0,
            traces: [Trace::new(), Trace::new()],
        }
    }

    /// Lay out the plot area inside `rect`, reserving a label strip below
    /// and to the right, and draw the empty grid.
    pub fn init(&mut self, gfx: &mut impl Gfx, rect: Rect) {
        self.pos_x = rect.x;
        self.pos_y = rect.y;
        self.screen_w = (rect.w - TEXT_W - 1).min(SCOPE_MAX_POINTS as i32);
        self.screen_h = rect.h - TEXT_H - 2;
        gfx.fill_rect(
            Rect::new(self.pos_x, self.pos_y + self.screen_h + 2, self.screen_w, TEXT_H - 2),
            palette::BLACK,
        );
        gfx.fill_rect(
            Rect::new(
                self.pos_x + self.screen_w + 1,
                self.pos_y,
                TEXT_W - 1,
                self.screen_h,
            ),
            palette::BLACK,
        );
        gfx.fill_rect(
            Rect::new(self.pos_x, self.pos_y, self.screen_w + 1, self.screen_h + 1),
            palette::SCOPE_BG,
        );
        self.grid(gfx);
    }

    /// Stamp the division grid. Called after every trace pass because the
    /// erase lines overdraw it.
    pub fn grid(&self, gfx: &mut impl Gfx) {
        gfx.draw_rect(
            Rect::new(self.pos_x, self.pos_y, self.screen_w + 1, self.screen_h + 1),
            palette::SCOPE_GRID,
        );
        let pitch_y = self.screen_h / DIV_Y;
        let mut i = pitch_y;
        while i <= self.screen_h - DIV_Y {
            gfx.draw_hline(
                self.pos_x,
                self.pos_y + self.screen_h - i,
                self.screen_w,
                palette::SCOPE_GRID,
            );
            i += pitch_y;
        }
        let pitch_x = self.screen_w / DIV_X;
        let mut i = pitch_x;
        while i <= self.screen_w - DIV_X {
            gfx.draw_vline(
                self.pos_x + i,
                self.pos_y,
                self.screen_h,
                palette::SCOPE_GRID,
            );
            i += pitch_x;
        }
    }

    /// (Re)arm a trace: clears its buffer to zero, sets color and range,
    /// and draws the time axis plus optionally the value axis labels.
    pub fn new_trace(
        &mut self,
        gfx: &mut impl Gfx,
        color: Rgb565,
        range_idx: usize,
        trace_idx: usize,
        show_y_labels: bool,
    ) {
        let Some(trace) = self.traces.get_mut(trace_idx) else {
            return;
        };
        trace.color = color;
        trace.range_idx = range_idx;
        trace.vals.clear();
        for _ in 0..self.screen_w as usize {
            let _ = trace.vals.push(0);
        }

        // time axis, two divisions per label, newest sample at the right
        let pitch = 2 * self.screen_w / DIV_X;
        let label_y = self.pos_y + self.screen_h + 4;
        gfx.fill_rect(
            Rect::new(self.pos_x, label_y, self.screen_w + 2, TEXT_H - 2),
            palette::BLACK,
        );
        let mut time_val = 15;
        let mut i = 0;
        while i <= self.screen_w {
            let datum = if i == 0 {
                Datum::TopLeft
            } else if i >= self.screen_w {
                Datum::TopRight
            } else {
                Datum::TopCentre
            };
            let mut text: String<8> = String::new();
            let _ = write!(text, "{}s", time_val);
            gfx.draw_text(
                &text,
                self.pos_x + i,
                label_y,
                FontId::Small,
                datum,
                palette::WHITE,
                Some(palette::BLACK),
            );
            time_val -= 5;
            i += pitch;
        }

        if show_y_labels {
            let rng = range(trace.range_idx);
            gfx.fill_rect(
                Rect::new(
                    self.pos_x + self.screen_w + 1,
                    self.pos_y,
                    TEXT_W - 1,
                    self.screen_h - 1,
                ),
                palette::BLACK,
            );
            let pitch = self.screen_h / DIV_Y;
            let base_y = self.pos_y + self.screen_h;
            let mut val = 0.0f32;
            let mut i = 0;
            while i <= self.screen_h {
                let datum = if i == 0 {
                    Datum::BottomLeft
                } else if i >= self.screen_h {
                    Datum::TopLeft
                } else {
                    Datum::MiddleLeft
                };
                let mut text: String<8> = String::new();
                let _ = write!(text, "{:.*}", rng.small_decimals, val);
                gfx.draw_text(
                    &text,
                    self.pos_x + self.screen_w + 3,
                    base_y - i,
                    FontId::Small,
                    datum,
                    color,
                    Some(palette::BLACK),
                );
                val += rng.max_val / DIV_Y as f32;
                i += pitch;
            }
        }
    }

    /// Push a sample: shift the trace one column left, quantize the level
    /// to a pixel row and append it as the newest (rightmost) value.
    pub fn new_sample(&mut self, level: f32, trace_idx: usize) {
        let Some(trace) = self.traces.get_mut(trace_idx) else {
            return;
        };
        if trace.vals.is_empty() {
            return;
        }
        let mut y = (level * self.screen_h as f32) as i16;
        if y >= self.screen_h as i16 {
            y = self.screen_h as i16 - 1;
        }
        if y < 0 {
            y = 0;
        }
        let len = trace.vals.len();
        trace.vals.copy_within(1..len, 0);
        trace.vals[len - 1] = y;
    }

    /// Draw one trace, erasing last frame's path column by column.
    pub fn trace(&self, gfx: &mut impl Gfx, trace_idx: usize) {
        let Some(trace) = self.traces.get(trace_idx) else {
            return;
        };
        if trace.vals.len() < 3 {
            return;
        }
        let base_y = self.pos_y + self.screen_h;
        let mut last_y: i32 = 0;
        let mut last_y_old: i32 = 0;
        for i in 1..(trace.vals.len() as i32 - 1) {
            // value now at i-1 was at column i last frame: erase its segment
            let y_old = trace.vals[(i - 1) as usize] as i32;
            gfx.draw_line(
                self.pos_x + i,
                base_y - last_y_old,
                self.pos_x + i + 1,
                base_y - y_old,
                palette::SCOPE_BG,
            );
            last_y_old = y_old;

            let y = trace.vals[i as usize] as i32;
            if i > 1 {
                gfx.draw_line(
                    self.pos_x + i,
                    base_y - last_y,
                    self.pos_x + i + 1,
                    base_y - y,
                    trace.color,
                );
            }
            last_y = y;
        }
    }

    /// Trace buffer contents, oldest first. Test and diagnostics hook.
    pub fn trace_values(&self, trace_idx: usize) -> &[i16] {
        self.traces
            .get(trace_idx)
            .map(|t| t.vals.as_slice())
            .unwrap_or(&[])
    }

    /// Pixel width of the plot area (= trace length).
    pub fn trace_len(&self) -> usize {
        self.screen_w as usize
    }
}

impl Default for ScrollingScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::CountingGfx;

    fn scope_with_trace(w: i32, h: i32) -> ScrollingScope {
        let mut gfx = CountingGfx::new();
        let mut s = ScrollingScope::new();
        s.init(&mut gfx, Rect::new(0, 0, w, h));
        s.new_trace(&mut gfx, palette::GREEN, 3, 0, true);
        s
    }

    #[test]
    fn fifo_evicts_oldest_keeps_order() {
        let mut s = scope_with_trace(131, 120);
        let n = s.trace_len();
        assert_eq!(n, 100);
        // mid-pixel levels quantize exactly to row i regardless of
        // float rounding
        for i in 0..n {
            s.new_sample((i as f32 + 0.5) / s.screen_h as f32, 0);
        }
        let vals = s.trace_values(0);
        assert_eq!(vals.len(), n);
        for (i, v) in vals.iter().enumerate() {
            assert_eq!(*v as usize, i, "slot {i}");
        }
        // one more evicts the oldest
        s.new_sample(0.0, 0);
        let vals = s.trace_values(0);
        assert_eq!(vals[0], 1);
        assert_eq!(vals[n - 1], 0);
    }

    #[test]
    fn samples_clamp_to_plot_height() {
        let mut s = scope_with_trace(131, 120);
        s.new_sample(2.0, 0);
        s.new_sample(-1.0, 0);
        let vals = s.trace_values(0);
        let n = vals.len();
        assert_eq!(vals[n - 2] as i32, s.screen_h - 1);
        assert_eq!(vals[n - 1], 0);
    }

    #[test]
    fn out_of_range_trace_index_is_noop() {
        let mut s = scope_with_trace(131, 120);
        s.new_sample(0.5, NUM_TRACES); // silently ignored
        assert!(s.trace_values(NUM_TRACES).is_empty());
    }
}
