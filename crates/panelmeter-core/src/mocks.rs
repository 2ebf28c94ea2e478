//! Test doubles for the display, touch digitizer, clock and settings
//! store.
//!
//! Compiled unconditionally so integration tests and the simulator can
//! share them; nothing here reaches the firmware binary, the linker drops
//! it.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use embedded_graphics::pixelcolor::Rgb565;

use crate::settings::{Settings, SettingsError, SettingsStore};
use crate::ui::gfx::{Datum, FontId, Gfx, Rect};
use crate::ui::input::{Clock, EncoderCounter, TouchDigitizer, TouchProvider};
use crate::ui::Ui;
use crate::config::PanelConfig;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GfxOp {
    FillRect(Rect, Rgb565),
    DrawRect(Rect, Rgb565),
    HLine(i32, i32, i32, Rgb565),
    VLine(i32, i32, i32, Rgb565),
    Line(i32, i32, i32, i32, Rgb565),
    WideLine(i32, i32, i32, i32, u32, Rgb565),
    FillCircle(i32, i32, i32, Rgb565),
    DrawCircle(i32, i32, i32, Rgb565),
    FillTriangle([(i32, i32); 3], Rgb565),
    DrawTriangle([(i32, i32); 3], Rgb565),
    FillRoundRect(Rect, i32, Rgb565),
    DrawRoundRect(Rect, i32, Rgb565),
    Text(String, i32, i32),
    ReadRect(Rect),
    PushRect(Rect),
}

/// Display double that records every draw call instead of rendering.
#[derive(Default)]
pub struct CountingGfx {
    pub ops: Vec<GfxOp>,
}

impl CountingGfx {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Gfx for CountingGfx {
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) {
        self.ops.push(GfxOp::FillRect(rect, color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) {
        self.ops.push(GfxOp::DrawRect(rect, color));
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.ops.push(GfxOp::HLine(x, y, w, color));
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.ops.push(GfxOp::VLine(x, y, h, color));
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        self.ops.push(GfxOp::Line(x0, y0, x1, y1, color));
    }

    fn draw_wide_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: u32, color: Rgb565) {
        self.ops.push(GfxOp::WideLine(x0, y0, x1, y1, width, color));
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        self.ops.push(GfxOp::FillCircle(cx, cy, r, color));
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        self.ops.push(GfxOp::DrawCircle(cx, cy, r, color));
    }

    fn fill_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        self.ops.push(GfxOp::FillTriangle(p, color));
    }

    fn draw_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        self.ops.push(GfxOp::DrawTriangle(p, color));
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        self.ops.push(GfxOp::FillRoundRect(rect, radius, color));
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        self.ops.push(GfxOp::DrawRoundRect(rect, radius, color));
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        _font: FontId,
        _datum: Datum,
        _fg: Rgb565,
        _bg: Option<Rgb565>,
    ) {
        self.ops.push(GfxOp::Text(String::from(text), x, y));
    }

    fn read_rect(&mut self, rect: Rect) -> Vec<Rgb565> {
        self.ops.push(GfxOp::ReadRect(rect));
        alloc::vec![Rgb565::new(0, 0, 0); (rect.w.max(0) * rect.h.max(0)) as usize]
    }

    fn push_rect(&mut self, rect: Rect, _pixels: &[Rgb565]) {
        self.ops.push(GfxOp::PushRect(rect));
    }
}

// ---------------------------------------------------------------------------
// Touch
// ---------------------------------------------------------------------------

/// Digitizer double that replays a fixed sample script, reporting "not
/// pressed" once the script runs dry (so `wait_released` terminates).
pub struct ScriptedTouch {
    samples: Vec<Option<(u16, u16)>>,
    pos: usize,
}

impl ScriptedTouch {
    pub fn new(samples: &[Option<(u16, u16)>]) -> Self {
        Self {
            samples: samples.to_vec(),
            pos: 0,
        }
    }

    pub fn idle() -> Self {
        Self::new(&[])
    }

    /// `n` consecutive reads at one point, then release.
    pub fn hold(x: u16, y: u16, n: usize) -> Self {
        Self {
            samples: alloc::vec![Some((x, y)); n],
            pos: 0,
        }
    }

    /// Number of physical reads performed so far.
    pub fn reads(&self) -> usize {
        self.pos
    }
}

impl TouchDigitizer for ScriptedTouch {
    fn read(&mut self) -> Option<(u16, u16)> {
        let s = self.samples.get(self.pos).copied().flatten();
        self.pos += 1;
        s
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Manual clock: `delay_ms` advances simulated time instead of sleeping,
/// so blocking widget loops run instantly and deterministically.
#[derive(Default)]
pub struct TestClock {
    now: Cell<u32>,
}

impl TestClock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }

    fn delay_ms(&self, ms: u32) {
        self.advance(ms);
    }
}

// ---------------------------------------------------------------------------
// Settings store
// ---------------------------------------------------------------------------

/// In-memory settings store.
#[derive(Default)]
pub struct MemoryStore {
    pub saved: Option<Vec<u8>>,
    pub save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&mut self) -> Result<Settings, SettingsError> {
        match &self.saved {
            Some(bytes) => Settings::from_bytes(bytes),
            None => Err(SettingsError::Missing),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        self.saved = Some(settings.to_bytes()?);
        self.save_count += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Context assembly
// ---------------------------------------------------------------------------

/// Fresh leaked encoder counter; tests need the `'static` lifetime the
/// firmware gets from a real `static`.
pub fn leak_encoder() -> &'static EncoderCounter {
    alloc::boxed::Box::leak(alloc::boxed::Box::new(EncoderCounter::new()))
}

/// Ready-made UI context over the mock backends.
pub fn test_ui(touch: ScriptedTouch, config: PanelConfig) -> Ui<CountingGfx, ScriptedTouch, TestClock> {
    Ui::new(
        CountingGfx::new(),
        TouchProvider::new(touch, leak_encoder()),
        TestClock::new(),
        config,
    )
}
