//! RAM framebuffer with per-pixel change detection.
//!
//! All widget drawing targets this buffer instead of the SPI display; after
//! a tick completes, only the bounding rectangle of changed pixels is
//! flushed to hardware in a single transaction. Because the buffer is plain
//! memory, widget drawing is infallible and the only fallible operation in
//! the whole display path is the flush at the firmware edge.
//!
//! The buffer also implements [`Gfx`], rendering primitives through
//! embedded-graphics onto itself, and provides the raw region read/write
//! pair the modal overlays use for save/restore.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_6X13, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Line, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use log::debug;
use profont::PROFONT_24_POINT;

use crate::ui::gfx::{Datum, FontId, Gfx, Rect};
use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;
const PIXEL_COUNT: usize = WIDTH * HEIGHT;

fn mono_font(font: FontId) -> &'static MonoFont<'static> {
    match font {
        FontId::Small => &FONT_6X10,
        FontId::Body => &FONT_6X13,
        FontId::Heading => &FONT_10X20,
        FontId::Value => &PROFONT_24_POINT,
    }
}

fn datum_style(datum: Datum) -> (Alignment, Baseline) {
    match datum {
        Datum::TopLeft => (Alignment::Left, Baseline::Top),
        Datum::TopCentre => (Alignment::Center, Baseline::Top),
        Datum::TopRight => (Alignment::Right, Baseline::Top),
        Datum::MiddleLeft => (Alignment::Left, Baseline::Middle),
        Datum::MiddleCentre => (Alignment::Center, Baseline::Middle),
        Datum::MiddleRight => (Alignment::Right, Baseline::Middle),
        Datum::BottomLeft => (Alignment::Left, Baseline::Bottom),
        Datum::BottomCentre => (Alignment::Center, Baseline::Bottom),
        Datum::BottomRight => (Alignment::Right, Baseline::Bottom),
    }
}

/// Bounding box of pixels changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Heap-backed 320x240 RGB565 framebuffer.
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; PIXEL_COUNT],
            dirty: None,
        }
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Pixel accessor for tests and the simulator.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb565 {
        self.pixels[y * WIDTH + x]
    }

    /// Whether any pixel changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Flush the dirty region to the hardware display, then reset.
    ///
    /// No-op when nothing changed. Only the bounding rectangle of changed
    /// pixels goes over the bus, via one `fill_contiguous` call.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;
        debug!(
            "flush {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );
        let pixels = &self.pixels;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * WIDTH + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });
        display.fill_contiguous(&area, pixel_iter)
    }

    fn clip(rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let x0 = rect.x.max(0) as usize;
        let y0 = rect.y.max(0) as usize;
        let x1 = ((rect.x + rect.w).max(0) as usize).min(WIDTH);
        let y1 = ((rect.y + rect.h).max(0) as usize).min(HEIGHT);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < WIDTH
                && (coord.y as usize) < HEIGHT
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let rect = Rect::new(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
        );
        if let Some((x0, y0, x1, y1)) = Self::clip(rect) {
            for y in y0..y1 {
                for x in x0..x1 {
                    self.set_pixel(x, y, color);
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

impl Gfx for FrameBuffer {
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) {
        let _ = self.fill_solid(
            &Rectangle::new(
                Point::new(rect.x, rect.y),
                Size::new(rect.w.max(0) as u32, rect.h.max(0) as u32),
            ),
            color,
        );
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) {
        let _ = Rectangle::new(
            Point::new(rect.x, rect.y),
            Size::new(rect.w.max(0) as u32, rect.h.max(0) as u32),
        )
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(self);
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.fill_rect(Rect::new(x, y, w, 1), color);
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.fill_rect(Rect::new(x, y, 1, h), color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        let _ = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self);
    }

    fn draw_wide_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: u32, color: Rgb565) {
        let _ = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, width))
            .draw(self);
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        let d = (r.max(0) as u32) * 2 + 1;
        let _ = Circle::with_center(Point::new(cx, cy), d)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self);
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        let d = (r.max(0) as u32) * 2 + 1;
        let _ = Circle::with_center(Point::new(cx, cy), d)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self);
    }

    fn fill_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        let _ = Triangle::new(
            Point::new(p[0].0, p[0].1),
            Point::new(p[1].0, p[1].1),
            Point::new(p[2].0, p[2].1),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(self);
    }

    fn draw_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        let _ = Triangle::new(
            Point::new(p[0].0, p[0].1),
            Point::new(p[1].0, p[1].1),
            Point::new(p[2].0, p[2].1),
        )
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(self);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        let r = radius.max(0) as u32;
        let _ = RoundedRectangle::with_equal_corners(
            Rectangle::new(
                Point::new(rect.x, rect.y),
                Size::new(rect.w.max(0) as u32, rect.h.max(0) as u32),
            ),
            Size::new(r, r),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(self);
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        let r = radius.max(0) as u32;
        let _ = RoundedRectangle::with_equal_corners(
            Rectangle::new(
                Point::new(rect.x, rect.y),
                Size::new(rect.w.max(0) as u32, rect.h.max(0) as u32),
            ),
            Size::new(r, r),
        )
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(self);
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
        let mono = mono_font(font);
        let mut builder = MonoTextStyleBuilder::new().font(mono).text_color(fg);
        if let Some(bg) = bg {
            builder = builder.background_color(bg);
        }
        let char_style = builder.build();
        let (alignment, baseline) = datum_style(datum);
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build();
        let _ = Text::with_text_style(text, Point::new(x, y), char_style, text_style).draw(self);
    }

    fn read_rect(&mut self, rect: Rect) -> Vec<Rgb565> {
        let mut out = Vec::new();
        if let Some((x0, y0, x1, y1)) = Self::clip(rect) {
            out.reserve((x1 - x0) * (y1 - y0));
            for y in y0..y1 {
                out.extend_from_slice(&self.pixels[y * WIDTH + x0..y * WIDTH + x1]);
            }
        }
        out
    }

    fn push_rect(&mut self, rect: Rect, pixels: &[Rgb565]) {
        let Some((x0, y0, x1, y1)) = Self::clip(rect) else {
            return;
        };
        let row_len = x1 - x0;
        let mut src = pixels.iter().copied();
        for y in y0..y1 {
            for x in x0..x0 + row_len {
                match src.next() {
                    Some(color) => self.set_pixel(x, y, color),
                    None => return,
                }
            }
        }
    }

    fn text_width(&self, text: &str, font: FontId) -> i32 {
        let mono = mono_font(font);
        let cell = mono.character_size.width + mono.character_spacing;
        (cell * text.chars().count() as u32) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::palette;

    #[test]
    fn clean_after_flush_and_noop_reflush() {
        let mut fb = FrameBuffer::new();
        fb.fill_rect(Rect::new(10, 10, 4, 4), palette::RED);
        assert!(fb.is_dirty());
        let mut sink = FrameBuffer::new();
        fb.flush(&mut sink).unwrap();
        assert!(!fb.is_dirty());
        // identical re-draw changes nothing
        fb.fill_rect(Rect::new(10, 10, 4, 4), palette::RED);
        assert!(!fb.is_dirty());
    }

    #[test]
    fn read_then_push_restores_region() {
        let mut fb = FrameBuffer::new();
        fb.fill_rect(Rect::new(0, 0, 20, 20), palette::GREEN);
        let saved = fb.read_rect(Rect::new(5, 5, 8, 8));
        fb.fill_rect(Rect::new(5, 5, 8, 8), palette::RED);
        fb.push_rect(Rect::new(5, 5, 8, 8), &saved);
        assert_eq!(fb.pixel(6, 6), palette::GREEN);
        assert_eq!(fb.pixel(12, 12), palette::GREEN);
    }

    #[test]
    fn out_of_bounds_drawing_is_clipped() {
        let mut fb = FrameBuffer::new();
        fb.fill_rect(Rect::new(-10, -10, 5, 5), palette::RED);
        fb.fill_rect(Rect::new(1000, 1000, 5, 5), palette::RED);
        assert!(!fb.is_dirty());
    }
}
