//! Vertical radio-button group, one selected item at a time.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::{String, Vec};

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::widget::{Widget, WidgetCore, MAX_GROUP_ITEMS, MAX_LABEL_LEN};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

pub struct RadioGroup {
    core: WidgetCore,
    labels: Vec<String<MAX_LABEL_LEN>, MAX_GROUP_ITEMS>,
    count: usize,
    size: i32,
    selected: usize,
    last_selected: usize,
}

impl RadioGroup {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            labels: Vec::new(),
            count: 0,
            size: 20,
            selected: 0,
            last_selected: 0,
        }
    }

    pub fn init(
        &mut self,
        x: i32,
        y: i32,
        size: i32,
        count: usize,
        border: Rgb565,
        bg: Rgb565,
        checked_color: Rgb565,
        border_width: i32,
        font: FontId,
    ) {
        self.size = size;
        self.count = count.min(MAX_GROUP_ITEMS);
        // touch width defaults to four circle widths, labels land inside it
        self.core.rect = Rect::new(x, y, size * 4, self.row_pitch() * self.count as i32);
        self.core.colors.border = border;
        self.core.colors.bg = bg;
        self.core.colors.checked = checked_color;
        self.core.colors.text = border;
        self.core.border_width = border_width;
        self.core.font = font;
        self.core.label_datum = Datum::MiddleLeft;
        self.selected = 0;
        self.last_selected = 0;
    }

    pub fn set_action(&mut self, tag: WidgetTag) {
        self.core.tag = Some(tag);
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

    /// Select an item; out-of-range indices are ignored.
    pub fn set_selected(&mut self, gfx: &mut impl Gfx, item: usize, redraw: bool) {
        if item >= self.count {
            return;
        }
        self.selected = item;
        if redraw {
            self.draw(gfx);
        }
    }

    fn row_pitch(&self) -> i32 {
        self.size + self.size / 4 + 2
    }

    fn item_contains(&self, x: i32, y: i32, item: usize) -> bool {
        if item >= self.count {
            return false;
        }
        let pitch = self.row_pitch();
        let y_start = self.core.rect.y + pitch * item as i32;
        x >= self.core.rect.x
            && x < self.core.rect.x + self.core.rect.w
            && y >= y_start
            && y <= y_start + pitch
    }

    fn draw(&mut self, gfx: &mut impl Gfx) {
        if !self.core.can_draw() {
            return;
        }
        let (text_c, check_c, uncheck_c, border_c) = if self.core.active {
            (
                self.core.colors.text,
                self.core.colors.checked,
                alpha_blend(128, self.core.colors.checked, palette::BLACK),
                self.core.colors.border,
            )
        } else {
            (
                palette::DARK_GREY,
                palette::DARK_GREY,
                palette::DARK_GREY,
                palette::GREY,
            )
        };
        let r = self.core.rect;
        let radius = self.size / 2;
        let bw = self.core.border_width;
        let text_x = match self.core.label_datum {
            Datum::MiddleLeft => r.x + self.core.label_dx + self.size + self.size / 4 + 2,
            Datum::MiddleRight => r.x + self.core.label_dx - self.size / 4 - 2,
            _ => r.x + self.core.label_dx,
        };

        for j in 0..self.count {
            let cy = r.y + radius + self.row_pitch() * j as i32;
            gfx.fill_circle(r.x + radius, cy, radius, border_c);
            gfx.fill_circle(r.x + radius, cy, radius - bw, self.core.colors.bg);
            let circle_c = if j == self.selected { check_c } else { uncheck_c };
            gfx.fill_circle(r.x + radius, cy, radius - bw * 2 - 1, circle_c);

            if let Some(label) = self.labels.get(j) {
                if !label.is_empty() {
                    gfx.draw_text(
                        label,
                        text_x,
                        cy + self.core.label_dy,
                        self.core.font,
                        self.core.label_datum,
                        text_c,
                        Some(self.core.colors.bg),
                    );
                }
            }
        }
    }
}

impl Default for RadioGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for RadioGroup {
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
                if self.item_contains(snap.x, snap.y, j) {
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
