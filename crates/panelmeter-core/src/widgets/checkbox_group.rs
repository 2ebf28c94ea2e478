//! Column of independent checkboxes sharing one style.
//!
//! Capacity is fixed at ten items; indices past the configured count are
//! silently ignored, both for state access and touch.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::{String, Vec};

use crate::ui::gfx::{alpha_blend, Datum, FontId, Rect};
use crate::ui::widget::{Widget, WidgetCore, MAX_GROUP_ITEMS, MAX_LABEL_LEN};
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};

pub struct CheckboxGroup {
    core: WidgetCore,
    labels: Vec<String<MAX_LABEL_LEN>, MAX_GROUP_ITEMS>,
    checked: [bool; MAX_GROUP_ITEMS],
    count: usize,
    size: i32,
    selected: usize,
}

impl CheckboxGroup {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            labels: Vec::new(),
            checked: [false; MAX_GROUP_ITEMS],
            count: 0,
            size: 20,
            selected: 0,
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
        self.core.rect = Rect::new(x, y, size * 4, self.row_pitch() * self.count as i32);
        self.core.colors.border = border;
        self.core.colors.bg = bg;
        self.core.colors.checked = alpha_blend(200, checked_color, palette::BLACK);
        self.core.colors.text = border;
        self.core.border_width = border_width;
        self.core.font = font;
        self.core.label_datum = Datum::MiddleLeft;
        self.checked = [false; MAX_GROUP_ITEMS];
        self.selected = 0;
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

    /// Index of the most recently touched item.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn item_state(&self, index: usize) -> bool {
        if index >= MAX_GROUP_ITEMS {
            return false;
        }
        self.checked[index]
    }

    /// Set one item's state; out-of-range indices are a no-op.
    pub fn set_item_state(&mut self, index: usize, on: bool) {
        if index >= MAX_GROUP_ITEMS {
            return;
        }
        self.selected = index;
        self.checked[index] = on;
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

    fn draw_all(&mut self, gfx: &mut impl Gfx) {
        if !self.core.can_draw() {
            return;
        }
        let (text_c, check_c, border_c, bg_c) = if self.core.active {
            (
                self.core.colors.text,
                self.core.colors.checked,
                self.core.colors.border,
                self.core.colors.bg,
            )
        } else {
            (
                palette::GREY,
                palette::GREY,
                palette::DARK_GREY,
                palette::BLACK,
            )
        };
        let r = self.core.rect;
        let s = self.size;
        let bw = self.core.border_width;
        let bw2 = bw * 2;
        let text_x = match self.core.label_datum {
            Datum::MiddleLeft => r.x + self.core.label_dx + s + s / 4 + 2,
            Datum::MiddleRight => r.x + self.core.label_dx - s / 4 - 2,
            _ => r.x + self.core.label_dx,
        };

        for j in 0..self.count {
            let y = r.y + self.row_pitch() * j as i32;
            let body = Rect::new(r.x, y, s, s);
            gfx.fill_rect(body, bg_c);
            for i in 0..bw {
                gfx.draw_rect(body.inset(i), border_c);
            }
            let inner = Rect::new(r.x + bw + 2, y + bw + 2, s - bw2 - 4, s - bw2 - 4);
            if self.checked[j] {
                gfx.fill_rect(inner, check_c);
                gfx.draw_wide_line(
                    inner.x,
                    inner.y,
                    r.x + s - bw2 - 1,
                    y + s - bw2 - 1,
                    bw as u32,
                    border_c,
                );
                gfx.draw_wide_line(
                    inner.x,
                    y + s - bw2 - 1,
                    r.x + s - bw2 - 1,
                    inner.y,
                    bw as u32,
                    border_c,
                );
            } else {
                gfx.fill_rect(inner, alpha_blend(150, check_c, palette::BLACK));
            }

            if let Some(label) = self.labels.get(j) {
                if !label.is_empty() {
                    gfx.draw_text(
                        label,
                        text_x,
                        y + self.core.label_dy + s / 2,
                        self.core.font,
                        self.core.label_datum,
                        text_c,
                        Some(bg_c),
                    );
                }
            }
        }
    }
}

impl Default for CheckboxGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for CheckboxGroup {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        self.core.active = active;
        self.draw_all(&mut ui.gfx);
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
                    let state = !self.checked[j];
                    self.set_item_state(j, state);
                    pressed = true;
                    self.draw_all(&mut ui.gfx);
                    if let Some(tag) = self.core.tag {
                        ui.events.push(UiEvent::ItemToggled {
                            tag,
                            index: j as u8,
                            on: state,
                        });
                    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_index_is_noop() {
        let mut g = CheckboxGroup::new();
        g.count = 5;
        g.set_item_state(3, true);
        assert!(g.item_state(3));
        g.set_item_state(10, true); // past capacity
        g.set_item_state(42, true);
        assert!(!g.item_state(10));
        assert!(!g.item_state(42));
        // selected untouched by rejected writes
        assert_eq!(g.selected(), 3);
    }
}
