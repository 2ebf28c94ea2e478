//! Momentary push button.
//!
//! Draws inverted while held and fires its event exactly once per
//! press-and-hold. A button initialized without colors is invisible but
//! still dispatches touches; the page-cycling wipe zones at the screen
//! edges are built from these.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

pub struct PushButton {
    core: WidgetCore,
    inverted: bool,
}

impl PushButton {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            inverted: false,
        }
    }

    /// Visible button with border, fill and caption colors.
    pub fn init(
        &mut self,
        rect: Rect,
        border: Rgb565,
        fill: Rgb565,
        text: Rgb565,
        border_width: i32,
        font: FontId,
    ) {
        self.core.rect = rect;
        self.core.colors.border = border;
        self.core.colors.fill = fill;
        self.core.colors.text = text;
        self.core.border_width = border_width;
        self.core.font = font;
        self.core.visible = true;
        self.core.enabled = true;
        self.core.active = true;
        self.core.last_pressed = false;
        self.inverted = false;
    }

    /// Same as [`PushButton::init`] but positioned by center point.
    #[allow(clippy::too_many_arguments)]
    pub fn init_center(
        &mut self,
        cx: i32,
        cy: i32,
        w: i32,
        h: i32,
        border: Rgb565,
        fill: Rgb565,
        text: Rgb565,
        border_width: i32,
        font: FontId,
    ) {
        self.init(
            Rect::new(cx - w / 2, cy - h / 2, w, h),
            border,
            fill,
            text,
            border_width,
            font,
        );
    }

    /// Touch-only button: owns a hit rectangle but never draws.
    pub fn init_invisible(&mut self, rect: Rect) {
        self.core.rect = rect;
        self.core.border_width = 0;
        self.core.visible = false;
        self.core.enabled = true;
        self.core.active = true;
        self.core.last_pressed = false;
        self.inverted = false;
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
    }

    pub fn set_label(&mut self, label: &str) {
        self.core.set_label(label);
    }

    fn draw(&mut self, gfx: &mut impl Gfx, inverted: bool) {
        if !self.core.can_draw() {
            return;
        }
        self.inverted = inverted;
        let c = &self.core.colors;
        let (fill, outline, text) = if self.core.active {
            if inverted {
                (c.text, c.border, c.fill)
            } else {
                (c.fill, c.border, c.text)
            }
        } else {
            (palette::BLACK, palette::DARK_GREY, palette::DARK_GREY)
        };

        let r = self.core.rect;
        let radius = r.w.min(r.h) / 4;
        let bw = self.core.border_width.max(0);
        if bw > 0 {
            gfx.fill_round_rect(r, radius, outline);
        }
        gfx.fill_round_rect(r.inset(bw), radius - bw, fill);
        let (cx, cy) = r.center();
        gfx.draw_text(
            &self.core.label,
            cx + self.core.label_dx,
            cy + self.core.label_dy,
            self.core.font,
            Datum::MiddleCentre,
            text,
            None,
        );
    }
}

impl Default for PushButton {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for PushButton {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        self.draw(&mut ui.gfx, false);
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
        let mut curr = false;
        let mut fired = false;
        if self.core.accepts_touch() && snap.pressed && self.core.contains(snap.x, snap.y) {
            curr = true;
            if !self.core.last_pressed {
                fired = true;
                self.draw(&mut ui.gfx, true);
                ui.gfx.present();
                if let Some(tag) = self.core.tag {
                    ui.events.push(UiEvent::Pressed { tag });
                }
                ui.clock.delay_ms(20); // debounce
                if wait_released {
                    ui.touch.wait_released(&ui.clock);
                    self.draw(&mut ui.gfx, false);
                    ui.gfx.present();
                    curr = false;
                }
            }
        }
        self.core.last_pressed = curr;
        self.core.checked = fired;
        fired
    }
}
