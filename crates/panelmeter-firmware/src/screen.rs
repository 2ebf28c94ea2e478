//! Framebuffer-plus-panel drawing surface.
//!
//! Widgets draw into the RAM framebuffer; [`Gfx::present`] pushes the
//! dirty bounding box to the SPI panel. Blocking interaction loops in the
//! core call `present` themselves, so touch feedback stays live while the
//! main loop is suspended inside them. A flush failure is logged and the
//! panel keeps running on the next frame's retry.

extern crate alloc;

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::warn;
use panelmeter_core::framebuffer::FrameBuffer;
use panelmeter_core::ui::gfx::{Datum, FontId, Gfx, Rect};

pub struct Screen<D> {
    fb: FrameBuffer,
    display: D,
}

impl<D> Screen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(display: D) -> Self {
        Self {
            fb: FrameBuffer::new(),
            display,
        }
    }
}

impl<D> Gfx for Screen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) {
        self.fb.fill_rect(rect, color);
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) {
        self.fb.draw_rect(rect, color);
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.fb.draw_hline(x, y, w, color);
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.fb.draw_vline(x, y, h, color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        self.fb.draw_line(x0, y0, x1, y1, color);
    }

    fn draw_wide_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: u32, color: Rgb565) {
        self.fb.draw_wide_line(x0, y0, x1, y1, width, color);
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        self.fb.fill_circle(cx, cy, r, color);
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        self.fb.draw_circle(cx, cy, r, color);
    }

    fn fill_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        self.fb.fill_triangle(p, color);
    }

    fn draw_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        self.fb.draw_triangle(p, color);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        self.fb.fill_round_rect(rect, radius, color);
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        self.fb.draw_round_rect(rect, radius, color);
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: FontId,
        datum: Datum,
        fg: Rgb565,
        bg: Option<Rgb565>,
    ) {
        self.fb.draw_text(text, x, y, font, datum, fg, bg);
    }

    fn read_rect(&mut self, rect: Rect) -> Vec<Rgb565> {
        self.fb.read_rect(rect)
    }

    fn push_rect(&mut self, rect: Rect, pixels: &[Rgb565]) {
        self.fb.push_rect(rect, pixels);
    }

    fn text_width(&self, text: &str, font: FontId) -> i32 {
        self.fb.text_width(text, font)
    }

    fn present(&mut self) {
        if self.fb.flush(&mut self.display).is_err() {
            warn!("display flush failed");
        }
    }
}
