//! Bezelled numeric readout for the secondary measurement channel.
//!
//! Shows the smoothed value in a large font with the range unit in the
//! corner. Redraws only when the smoothed value moves by more than 0.001
//! of full scale; the text is drawn padded so shorter strings erase their
//! predecessors. Tapping the readout swaps the primary and secondary
//! measurement channels.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use crate::meter::ranges::range;
use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::integrator::LEVEL_ALPHA;
use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

pub const NUMERICS_WIDTH: i32 = 140;
pub const NUMERICS_HEIGHT: i32 = 46;
pub const NUMERICS_WIDTH_SMALL: i32 = 100;

pub struct NumericDisplay {
    core: WidgetCore,
    range_idx: usize,
    level: f32,
    level_integrator: f32,
    draw_units: bool,
}

impl NumericDisplay {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            range_idx: 0,
            level: 0.0,
            level_integrator: 0.0,
            draw_units: true,
        }
    }

    pub fn init(&mut self, x: i32, y: i32, draw_units: bool) {
        let w = if draw_units {
            NUMERICS_WIDTH - 1
        } else {
            NUMERICS_WIDTH_SMALL - 1
        };
        self.core.rect = Rect::new(x, y, w, NUMERICS_HEIGHT - 1);
        self.core.colors.text = palette::BLACK;
        self.core.colors.border = palette::GREY;
        self.core.colors.fill = palette::LIGHT_GREY;
        self.core.font = FontId::Value;
        self.draw_units = draw_units;
        self.level_integrator = 0.0;
        self.core.last_pressed = false;
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
    }

    /// Select range and value color, then reset and repaint.
    pub fn set_range(&mut self, gfx: &mut impl Gfx, range_idx: usize, color: Rgb565) {
        self.range_idx = range_idx;
        self.core.colors.text = color;
        self.set_level(gfx, 0.0, true);
    }

    pub fn set_level(&mut self, gfx: &mut impl Gfx, level: f32, full_redraw: bool) {
        if !self.core.can_draw() {
            return;
        }
        self.level = level;
        let (border_c, text_c, fill_c) = if self.core.active {
            (
                self.core.colors.border,
                self.core.colors.text,
                self.core.colors.fill,
            )
        } else {
            (palette::DARK_GREY, palette::GREY, palette::BLACK)
        };
        let r = self.core.rect;
        let rng = range(self.range_idx);

        if full_redraw {
            for i in 0..3 {
                gfx.draw_rect(r.inset(i), border_c);
            }
            gfx.draw_rect(r.inset(3), palette::DARK_GREY);
            gfx.fill_rect(r.inset(4), fill_c);
            if self.draw_units {
                gfx.draw_text(
                    rng.unit,
                    r.x + r.w - 10,
                    r.y + 8,
                    FontId::Body,
                    Datum::TopRight,
                    text_c,
                    Some(fill_c),
                );
            }
        }

        let last = self.level_integrator;
        self.level_integrator = level * LEVEL_ALPHA + self.level_integrator * (1.0 - LEVEL_ALPHA);
        if full_redraw || (self.level_integrator - last).abs() > 0.001 {
            // single-letter units get a wider value field
            let pad = if rng.unit.len() < 2 { 85 } else { 65 };
            let mut scaled = self.level_integrator * rng.max_val;
            if scaled > 999.9 {
                scaled = 999.9;
            }
            let mut text: String<16> = String::new();
            let _ = write!(text, "{:.*}", rng.val_decimals, scaled);
            gfx.draw_text_padded(
                &text,
                r.x + 8,
                r.y + 8,
                FontId::Value,
                Datum::TopLeft,
                text_c,
                fill_c,
                pad,
            );
        }
    }
}

impl Default for NumericDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for NumericDisplay {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        let level = self.level;
        self.set_level(&mut ui.gfx, level, true);
    }

    fn check_pressed<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        wait_released: bool,
    ) -> bool {
        if !self.core.enabled || !self.core.active {
            return false;
        }
        let snap = ui.touch.snapshot();
        let mut curr = false;
        let mut fired = false;
        if snap.pressed && self.core.contains(snap.x, snap.y) {
            curr = true;
            if !self.core.last_pressed {
                fired = true;
                if let Some(tag) = self.core.tag {
                    ui.events.push(UiEvent::Pressed { tag });
                }
                ui.clock.delay_ms(20); // debounce
                if wait_released {
                    ui.touch.wait_released(&ui.clock);
                    curr = false;
                }
            }
        }
        self.core.last_pressed = curr;
        fired
    }
}
