//! Display capability surface consumed by every widget.
//!
//! The instrument draws through the [`Gfx`] trait rather than a concrete
//! driver so the same widget code runs against the RAM framebuffer on
//! hardware, the SDL simulator, and a draw-call-counting mock in tests.
//! Colors are opaque RGB565 values throughout; the core never unpacks them
//! except inside [`alpha_blend`].

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

extern crate alloc;
use alloc::vec::Vec;

/// Screen-space rectangle with top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Containment test with inclusive far edges.
    ///
    /// `x + w` and `y + h` are hits. This off-by-one is inherited touch
    /// behavior that existing panel layouts rely on; do not tighten it.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Rectangle shrunk by `d` pixels on every side.
    pub fn inset(&self, d: i32) -> Rect {
        Rect::new(self.x + d, self.y + d, self.w - 2 * d, self.h - 2 * d)
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Text anchor point, mirroring the nine-position datum convention of
/// classic TFT libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Datum {
    #[default]
    TopLeft,
    TopCentre,
    TopRight,
    MiddleLeft,
    MiddleCentre,
    MiddleRight,
    BottomLeft,
    BottomCentre,
    BottomRight,
}

/// Font selector. Concrete glyph data lives in the [`Gfx`] implementation;
/// the core only needs stable identifiers and rough metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontId {
    /// Tick labels, keypad keys, axis annotations.
    Small,
    /// Default widget label font.
    #[default]
    Body,
    /// Button captions and tab labels.
    Heading,
    /// Large numeric readout font.
    Value,
}

impl FontId {
    /// Nominal character cell (width, height) in pixels.
    ///
    /// Used for padding-erase boxes and by mocks; implementations with real
    /// glyph data may report exact widths via [`Gfx::text_width`].
    pub const fn char_size(self) -> (i32, i32) {
        match self {
            FontId::Small => (6, 10),
            FontId::Body => (6, 13),
            FontId::Heading => (10, 20),
            FontId::Value => (16, 29),
        }
    }
}

/// Linear blend of two RGB565 colors, `alpha` = 255 selects `fg`.
///
/// Port of the classic per-channel integer blend used by TFT drivers for
/// gradients, dimmed thumbs and greyed-out states.
pub fn alpha_blend(alpha: u8, fg: Rgb565, bg: Rgb565) -> Rgb565 {
    let a = alpha as u32;
    let blend = |f: u8, b: u8| -> u8 { ((f as u32 * a + b as u32 * (255 - a)) / 255) as u8 };
    Rgb565::new(
        blend(fg.r(), bg.r()),
        blend(fg.g(), bg.g()),
        blend(fg.b(), bg.b()),
    )
}

/// Drawing primitives required from a display backend.
///
/// All operations are infallible: widgets target a RAM framebuffer and only
/// the hardware flush can fail, which is handled at the firmware edge.
/// Gradient fills and padded text are provided methods composed from the
/// required primitives so mocks get them for free.
pub trait Gfx {
    fn fill_rect(&mut self, rect: Rect, color: Rgb565);
    fn draw_rect(&mut self, rect: Rect, color: Rgb565);
    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565);
    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565);
    /// Stroked line of the given width, used for meter needles and clock
    /// hands. Erase by redrawing in the background color.
    fn draw_wide_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: u32, color: Rgb565);
    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565);
    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565);
    fn fill_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565);
    fn draw_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565);
    fn fill_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565);
    fn draw_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565);

    /// Draw `text` anchored at (`x`, `y`) per `datum`. A background color
    /// makes the glyph cells self-erasing.
    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: FontId,
        datum: Datum,
        fg: Rgb565,
        bg: Option<Rgb565>,
    );

    /// Snapshot a rectangular pixel region, row-major. Used by modal
    /// overlays to restore whatever they covered.
    fn read_rect(&mut self, rect: Rect) -> Vec<Rgb565>;

    /// Write back a region captured with [`Gfx::read_rect`].
    fn push_rect(&mut self, rect: Rect, pixels: &[Rgb565]);

    /// Pixel width of `text` in `font`. The default uses the nominal cell
    /// width; backends with real glyph data should override.
    fn text_width(&self, text: &str, font: FontId) -> i32 {
        font.char_size().0 * text.chars().count() as i32
    }

    /// Make everything drawn so far visible.
    ///
    /// Blocking interaction loops (drags, modal dialogs) call this each
    /// iteration so the user sees feedback while the main loop's own
    /// flush is suspended. Buffered backends push their dirty region to
    /// the panel here; direct backends do nothing.
    fn present(&mut self) {}

    /// Vertical gradient fill, `top` color fading to `bottom`.
    fn fill_rect_v_gradient(&mut self, rect: Rect, top: Rgb565, bottom: Rgb565) {
        if rect.h <= 1 {
            self.fill_rect(rect, top);
            return;
        }
        for row in 0..rect.h {
            let alpha = (255 - row * 255 / (rect.h - 1)) as u8;
            let color = alpha_blend(alpha, top, bottom);
            self.draw_hline(rect.x, rect.y + row, rect.w, color);
        }
    }

    /// Horizontal gradient fill, `left` color fading to `right`.
    fn fill_rect_h_gradient(&mut self, rect: Rect, left: Rgb565, right: Rgb565) {
        if rect.w <= 1 {
            self.fill_rect(rect, left);
            return;
        }
        for col in 0..rect.w {
            let alpha = (255 - col * 255 / (rect.w - 1)) as u8;
            let color = alpha_blend(alpha, left, right);
            self.draw_vline(rect.x + col, rect.y, rect.h, color);
        }
    }

    /// Draw self-erasing value text: clears a `pad_px`-wide box aligned to
    /// the datum first so a shorter string leaves no stale digits behind.
    fn draw_text_padded(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: FontId,
        datum: Datum,
        fg: Rgb565,
        bg: Rgb565,
        pad_px: i32,
    ) {
        let (_, ch) = font.char_size();
        let bx = match datum {
            Datum::TopLeft | Datum::MiddleLeft | Datum::BottomLeft => x,
            Datum::TopCentre | Datum::MiddleCentre | Datum::BottomCentre => x - pad_px / 2,
            Datum::TopRight | Datum::MiddleRight | Datum::BottomRight => x - pad_px,
        };
        let by = match datum {
            Datum::TopLeft | Datum::TopCentre | Datum::TopRight => y,
            Datum::MiddleLeft | Datum::MiddleCentre | Datum::MiddleRight => y - ch / 2,
            Datum::BottomLeft | Datum::BottomCentre | Datum::BottomRight => y - ch,
        };
        self.fill_rect(Rect::new(bx, by, pad_px, ch), bg);
        self.draw_text(text, x, y, font, datum, fg, Some(bg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_on_far_edge() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(10, 10));
        assert!(r.contains(30, 30));
        assert!(!r.contains(31, 31));
        assert!(!r.contains(9, 10));
    }

    #[test]
    fn alpha_blend_endpoints() {
        let fg = Rgb565::new(31, 63, 31);
        let bg = Rgb565::new(0, 0, 0);
        assert_eq!(alpha_blend(255, fg, bg), fg);
        assert_eq!(alpha_blend(0, fg, bg), bg);
    }

    #[test]
    fn alpha_blend_midpoint_is_half_scale() {
        let fg = Rgb565::new(30, 62, 30);
        let bg = Rgb565::new(0, 0, 0);
        let mid = alpha_blend(128, fg, bg);
        assert!((14..=16).contains(&mid.r()));
        assert!((30..=32).contains(&mid.g()));
    }
}
