//! Bottom tab strip with an attached content window.
//!
//! Redrawing the strip also clears the content window above it, so in the
//! dispatch list every widget living on a tab page must be declared after
//! the strip — otherwise the strip wipes it on page changes.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use heapless::{String, Vec};

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::widget::{Widget, WidgetCore, MAX_GROUP_ITEMS, MAX_LABEL_LEN};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

const FADE_BLEND: u8 = 128;

pub struct TabStrip {
    core: WidgetCore,
    labels: Vec<String<MAX_LABEL_LEN>, MAX_GROUP_ITEMS>,
    count: usize,
    tab_width: i32,
    total_width: i32,
    /// Baseline: top edge of the tab row.
    baseline_y: i32,
    /// Top edge of the content window the strip owns.
    window_top: i32,
    selected: usize,
    last_selected: usize,
}

impl TabStrip {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            labels: Vec::new(),
            count: 0,
            tab_width: 0,
            total_width: 0,
            baseline_y: 0,
            window_top: 0,
            selected: 0,
            last_selected: 0,
        }
    }

    pub fn init(
        &mut self,
        x: i32,
        baseline_y: i32,
        width: i32,
        height: i32,
        count: usize,
        border: Rgb565,
        fill: Rgb565,
        text: Rgb565,
        font: FontId,
    ) {
        self.count = count.min(MAX_GROUP_ITEMS);
        self.core.rect = Rect::new(x, baseline_y, width, height);
        self.baseline_y = baseline_y;
        self.window_top = 0;
        self.tab_width = width / count as i32;
        self.total_width = width;
        self.core.colors.border = border;
        self.core.colors.fill = fill;
        self.core.colors.text = text;
        self.core.font = font;
        self.selected = 0;
        self.last_selected = 0;
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
    }

    /// Override the default tab width (total width / count).
    pub fn set_tab_width(&mut self, w: i32) {
        self.tab_width = w;
    }

    /// Top edge of the content window cleared on redraw.
    pub fn set_window_top(&mut self, y: i32) {
        self.window_top = y;
    }

    pub fn set_labels(&mut self, labels: &[&str]) {
        self.labels.clear();
        for l in labels.iter().take(MAX_GROUP_ITEMS) {
            let mut s: String<MAX_LABEL_LEN> = String::new();
            let _ = s.push_str(&l[..l.len().min(MAX_LABEL_LEN)]);
            let _ = self.labels.push(s);
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn set_selected(&mut self, gfx: &mut impl Gfx, item: usize, redraw: bool) {
        if item >= self.count {
            return;
        }
        self.selected = item;
        if redraw {
            self.draw(gfx);
        }
    }

    fn tab_contains(&self, x: i32, y: i32, tab: usize) -> bool {
        if tab >= self.count {
            return false;
        }
        let x_start = self.core.rect.x + self.core.label_dx + self.tab_width * tab as i32;
        x >= x_start
            && x < x_start + self.tab_width
            && y >= self.baseline_y
            && y <= self.baseline_y + self.core.rect.h
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tab(
        &self,
        gfx: &mut impl Gfx,
        x: i32,
        w: i32,
        label: &str,
        text_c: Rgb565,
        border_c: Rgb565,
        fill_c: Rgb565,
    ) {
        let y = self.baseline_y;
        let h = self.core.rect.h;
        let r = h / 4;
        let hr = h - r;
        gfx.fill_rect(Rect::new(x, y, w, hr), fill_c);
        // rounded lower lip
        gfx.fill_round_rect(Rect::new(x, y + hr - r, w, r * 2), r, border_c);
        if border_c != fill_c {
            gfx.draw_vline(x, y, hr, border_c);
            gfx.draw_vline(x + 1, y, hr, border_c);
            gfx.draw_vline(x + w - 1, y, hr, border_c);
            gfx.draw_vline(x + w - 2, y, hr, border_c);
            gfx.fill_round_rect(Rect::new(x + 2, y + hr - r, w - 4, r * 2 - 2), r - 2, fill_c);
        }
        gfx.draw_text(
            label,
            x + w / 2,
            y + 2 + h / 2,
            self.core.font,
            Datum::MiddleCentre,
            text_c,
            Some(fill_c),
        );
    }

    fn draw(&mut self, gfx: &mut impl Gfx) {
        if !self.core.can_draw() {
            return;
        }
        let fade = Rgb565::new(
            31 - self.core.colors.border.r(),
            63 - self.core.colors.border.g(),
            31 - self.core.colors.border.b(),
        );
        let (border_c, fill_c) = if self.core.active {
            (self.core.colors.border, self.core.colors.fill)
        } else {
            (palette::GREY, palette::BLACK)
        };
        let x = self.core.rect.x;
        let top = self.window_top;

        // content window frame and fill
        if self.core.colors.border != self.core.colors.fill {
            gfx.draw_hline(x, top, self.total_width, border_c);
            gfx.draw_hline(x, top + 1, self.total_width, border_c);
            gfx.draw_vline(x, top, self.baseline_y - top, border_c);
            gfx.draw_vline(x + 1, top, self.baseline_y - top, border_c);
            gfx.draw_vline(x + self.total_width - 1, top, self.baseline_y - top, border_c);
            gfx.draw_vline(x + self.total_width - 2, top, self.baseline_y - top, border_c);
            gfx.fill_rect(
                Rect::new(x + 2, top + 2, self.total_width - 4, self.baseline_y - top - 1),
                fill_c,
            );
        } else {
            gfx.fill_rect(
                Rect::new(x, top, self.total_width, self.baseline_y - top + 1),
                fill_c,
            );
        }

        for j in 0..self.count {
            let (tab_border, tab_text, tab_fill) = if !self.core.active {
                (palette::GREY, palette::DARK_GREY, palette::BLACK)
            } else if j == self.selected {
                (
                    self.core.colors.border,
                    self.core.colors.text,
                    self.core.colors.fill,
                )
            } else {
                (
                    alpha_blend(FADE_BLEND, self.core.colors.border, fade),
                    alpha_blend(FADE_BLEND, self.core.colors.text, fade),
                    alpha_blend(FADE_BLEND, self.core.colors.fill, fade),
                )
            };
            let label = self.labels.get(j).map(|s| s.as_str()).unwrap_or("");
            self.draw_tab(
                gfx,
                x + self.core.label_dx + j as i32 * self.tab_width,
                self.tab_width,
                label,
                tab_text,
                tab_border,
                tab_fill,
            );
        }

        // baseline on both sides of the selected tab, leaving it open
        let w_left = self.core.label_dx + self.selected as i32 * self.tab_width;
        gfx.draw_hline(x, self.baseline_y, w_left, border_c);
        gfx.draw_hline(x, self.baseline_y + 1, w_left, border_c);
        let x_right = x + w_left + self.tab_width;
        let w_right = self.total_width - (w_left + self.tab_width);
        gfx.draw_hline(x_right, self.baseline_y, w_right, border_c);
        gfx.draw_hline(x_right, self.baseline_y + 1, w_right, border_c);
    }
}

impl Default for TabStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for TabStrip {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        self.draw(&mut ui.gfx);
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
        let mut pressed = false;
        if self.core.accepts_touch() && snap.pressed {
            for j in 0..self.count {
                if self.tab_contains(snap.x, snap.y, j) {
                    self.selected = j;
                    pressed = true;
                    if self.selected != self.last_selected {
                        self.draw(&mut ui.gfx);
                    }
                    self.last_selected = j;
                    if let Some(tag) = self.core.tag {
                        ui.events.push(UiEvent::ItemSelected {
                            tag,
                            index: j as u8,
                        });
                    }
                    ui.clock.delay_ms(20); // debounce
                    if wait_released {
                        ui.touch.wait_released(&ui.clock);
                    }
                    break;
                }
            }
        }
        pressed
    }
}
