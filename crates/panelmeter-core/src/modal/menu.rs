//! Modal list selection: menus, scaling entries, anything enumerable.
//!
//! Blocks until a row or CANCEL is chosen. A CANCEL row is always
//! appended after the caller's entries. With an encoder fitted, rotation
//! moves the highlight and scrolls the window; touch selects directly.
//! The caller repaints its page afterwards — the menu only blanks the
//! area it used.

use log::debug;

use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::widget::Widget;
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui};
use crate::widgets::PushButton;

const LISTBOX_X: i32 = crate::ui::DISPLAY_WIDTH_PX as i32 / 8;
const LISTBOX_W: i32 = crate::ui::DISPLAY_WIDTH_PX as i32 - LISTBOX_X * 2;
const PADDING: i32 = 10;
const MAX_LINES: usize = 8;
const FIELD_H: i32 = 20;
const FIELD_W: i32 = LISTBOX_W - PADDING * 2;
const FIELD_LEFT: i32 = LISTBOX_X + PADDING;
const FIELD_TOP_OFFS: i32 = FIELD_H + 8;
const CANCEL_W: i32 = 50;
const CANCEL_H: i32 = 18;

pub struct ModalMenu;

impl ModalMenu {
    /// Offer `entries` for selection under `title`; returns the chosen
    /// index, or `None` when cancelled.
    pub fn select<G: Gfx, T: TouchDigitizer, C: Clock>(
        ui: &mut Ui<G, T, C>,
        entries: &[&str],
        title: &str,
    ) -> Option<usize> {
        let entry_count = entries.len();
        let line_count = (entry_count + 1).min(MAX_LINES); // incl. CANCEL
        let listbox_h = FIELD_H * (line_count as i32 + 2);
        let listbox_y = crate::ui::DISPLAY_HEIGHT_PX as i32 / 2 - listbox_h / 2;
        let field_top = listbox_y + FIELD_TOP_OFFS;
        let field_bottom = field_top + line_count as i32 * FIELD_H;

        ui.gfx.fill_rect(
            Rect::new(LISTBOX_X + 1, listbox_y, LISTBOX_W - 2, listbox_h - 2),
            palette::MED_GREY,
        );
        ui.gfx.draw_rect(
            Rect::new(LISTBOX_X, listbox_y, LISTBOX_W, listbox_h),
            palette::WHITE,
        );
        ui.gfx.draw_text(
            title,
            FIELD_LEFT + 2,
            listbox_y + 6,
            FontId::Body,
            Datum::TopLeft,
            palette::WHITE,
            Some(palette::MED_GREY),
        );

        let mut btn_cancel = PushButton::new();
        btn_cancel.init(
            Rect::new(
                FIELD_LEFT + FIELD_W - CANCEL_W,
                listbox_y + 5,
                CANCEL_W,
                CANCEL_H,
            ),
            palette::WHITE,
            palette::RED,
            palette::BLACK,
            1,
            FontId::Small,
        );
        btn_cancel.set_label("CANCEL");
        btn_cancel.redraw(ui, true);

        let mut selected_line: i32 = 0;
        let mut start_line: i32 = 0;
        let mut last_selected_line: i32 = 0;
        Self::draw_entries(
            &mut ui.gfx,
            entries,
            start_line,
            selected_line,
            line_count,
            field_top,
        );

        let mut cancelled = false;
        loop {
            ui.gfx.present();
            ui.touch.poll();
            if btn_cancel.check_pressed(ui, true) {
                cancelled = true;
                break;
            }
            if ui.config.has_encoder {
                let delta = ui.touch.enc_delta(false);
                if delta != 0 {
                    if (selected_line + start_line) < entry_count as i32 || delta < 0 {
                        selected_line += delta;
                    }
                    if selected_line < 0 {
                        selected_line = 0;
                        if start_line > 0 {
                            start_line -= 1;
                            Self::draw_entries(
                                &mut ui.gfx,
                                entries,
                                start_line,
                                selected_line,
                                line_count,
                                field_top,
                            );
                        }
                    } else if selected_line >= MAX_LINES as i32 {
                        selected_line = MAX_LINES as i32 - 1;
                        start_line += 1;
                        Self::draw_entries(
                            &mut ui.gfx,
                            entries,
                            start_line,
                            selected_line,
                            line_count,
                            field_top,
                        );
                    } else {
                        // only the two affected rows change
                        Self::draw_line(
                            &mut ui.gfx,
                            Self::entry_text(entries, start_line + last_selected_line),
                            false,
                            last_selected_line,
                            field_top,
                        );
                        Self::draw_line(
                            &mut ui.gfx,
                            Self::entry_text(entries, start_line + selected_line),
                            true,
                            selected_line,
                            field_top,
                        );
                    }
                    last_selected_line = selected_line;
                }
            }
            if ui
                .touch
                .is_pressed_within(Rect::new(FIELD_LEFT, field_top, FIELD_W, field_bottom - field_top))
            {
                let line = (ui.touch.snapshot().y - field_top) / FIELD_H;
                if line < line_count as i32 {
                    selected_line = line;
                    break;
                }
            }
            ui.clock.delay_ms(20);
        }

        let selected_item = (selected_line + start_line) as usize;
        Self::draw_entries(
            &mut ui.gfx,
            entries,
            start_line,
            selected_line,
            line_count,
            field_top,
        );
        ui.clock.delay_ms(200);
        ui.gfx.fill_rect(
            Rect::new(LISTBOX_X, listbox_y, LISTBOX_W, listbox_h),
            palette::MED_GREY,
        );
        ui.gfx.present();
        ui.touch.wait_released(&ui.clock);

        if cancelled || selected_item >= entry_count {
            debug!("menu: cancelled");
            None
        } else {
            debug!("menu: item {} selected", selected_item);
            Some(selected_item)
        }
    }

    fn entry_text<'a>(entries: &'a [&'a str], idx: i32) -> &'a str {
        entries.get(idx as usize).copied().unwrap_or("CANCEL")
    }

    fn draw_line(gfx: &mut impl Gfx, text: &str, is_active: bool, line: i32, top: i32) {
        let y = top + line * FIELD_H;
        let line_color = if text == "CANCEL" {
            palette::RED
        } else {
            palette::WHITE
        };
        let (fill, fg, bg) = if is_active {
            (line_color, palette::BLACK, line_color)
        } else {
            (palette::BLACK, line_color, palette::BLACK)
        };
        gfx.fill_rect(Rect::new(FIELD_LEFT + 1, y + 1, FIELD_W - 2, FIELD_H - 1), fill);
        gfx.draw_text(
            text,
            FIELD_LEFT + 5,
            y + 2,
            FontId::Body,
            Datum::TopLeft,
            fg,
            Some(bg),
        );
        gfx.draw_rect(
            Rect::new(FIELD_LEFT, y, FIELD_W, FIELD_H + 1),
            palette::WHITE,
        );
    }

    fn draw_entries(
        gfx: &mut impl Gfx,
        entries: &[&str],
        start: i32,
        active_line: i32,
        count: usize,
        top: i32,
    ) {
        for i in 0..count as i32 {
            Self::draw_line(
                gfx,
                Self::entry_text(entries, start + i),
                i == active_line,
                i,
                top,
            );
        }
    }
}
