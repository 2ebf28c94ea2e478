//! Modal message and confirmation dialogs.
//!
//! A dialog is a blocking call: it snapshots the pixels it is about to
//! cover, runs its own poll loop over the shared touch provider until
//! resolved, then pushes the snapshot back. While it runs, no other
//! widget sees the touch stream.

use log::debug;

use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::widget::Widget;
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui};
use crate::widgets::PushButton;

const MSG_WIDTH: i32 = 236;
const MSG_HEIGHT: i32 = 124;
const BUTTON_W: i32 = 96;
const BUTTON_H: i32 = 34;

/// Icon shown in the left badge of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogIcon {
    Info,
    Query,
    Error,
}

impl DialogIcon {
    fn glyph(self) -> &'static str {
        match self {
            DialogIcon::Info => "i",
            DialogIcon::Query => "?",
            DialogIcon::Error => "!",
        }
    }
}

pub struct DialogBox;

impl DialogBox {
    /// Paint the dialog body. Does not save or restore anything.
    fn draw(gfx: &mut impl Gfx, msg1: &str, msg2: &str, icon: DialogIcon, with_buttons: bool) {
        let height = if with_buttons {
            MSG_HEIGHT
        } else {
            MSG_HEIGHT * 3 / 5
        };
        let center_x = crate::ui::DISPLAY_WIDTH_PX as i32 / 2;
        let center_y = crate::ui::DISPLAY_HEIGHT_PX as i32 / 2;
        let msg_center_y = if with_buttons {
            center_y - height / 4
        } else {
            center_y
        };
        debug!("dialog: {} {}", msg1, msg2);

        let body = Rect::new(center_x - MSG_WIDTH / 2, center_y - height / 2, MSG_WIDTH, height);
        gfx.draw_rect(body, palette::WHITE);
        gfx.draw_rect(body.inset(1), palette::WHITE);
        gfx.fill_rect(body.inset(2), palette::DIALOG_GREY);

        if msg2.is_empty() {
            gfx.draw_text(
                msg1,
                center_x + 10,
                msg_center_y,
                FontId::Body,
                Datum::MiddleCentre,
                palette::WHITE,
                Some(palette::DIALOG_GREY),
            );
        } else {
            gfx.draw_text(
                msg1,
                center_x + 10,
                msg_center_y - 8,
                FontId::Body,
                Datum::MiddleCentre,
                palette::WHITE,
                Some(palette::DIALOG_GREY),
            );
            gfx.draw_text(
                msg2,
                center_x + 10,
                msg_center_y + 10,
                FontId::Body,
                Datum::MiddleCentre,
                palette::WHITE,
                Some(palette::DIALOG_GREY),
            );
        }

        let badge_color = match icon {
            DialogIcon::Error => palette::RED,
            _ => palette::BLUE,
        };
        gfx.fill_round_rect(
            Rect::new(center_x - 104, msg_center_y - 18, 24, 36),
            4,
            badge_color,
        );
        gfx.draw_text(
            icon.glyph(),
            center_x - 93,
            msg_center_y + 2,
            FontId::Heading,
            Datum::MiddleCentre,
            palette::WHITE,
            Some(badge_color),
        );
    }

    /// Show a message for `duration_ms`, then restore the screen.
    pub fn message<G: Gfx, T: TouchDigitizer, C: Clock>(
        ui: &mut Ui<G, T, C>,
        msg1: &str,
        msg2: &str,
        duration_ms: u32,
        icon: DialogIcon,
    ) {
        let region = Self::cover_rect();
        let saved = ui.gfx.read_rect(region);
        Self::draw(&mut ui.gfx, msg1, msg2, icon, false);
        ui.gfx.present();
        ui.clock.delay_ms(duration_ms);
        ui.gfx.push_rect(region, &saved);
        ui.gfx.present();
        ui.clock.delay_ms(100);
    }

    /// Blocking OK / OK-Cancel dialog. Returns true when OK was pressed.
    /// No timeout: an unattended prompt blocks until answered.
    pub fn modal<G: Gfx, T: TouchDigitizer, C: Clock>(
        ui: &mut Ui<G, T, C>,
        msg1: &str,
        msg2: &str,
        icon: DialogIcon,
        with_cancel: bool,
    ) -> bool {
        let center_x = crate::ui::DISPLAY_WIDTH_PX as i32 / 2;
        let center_y = crate::ui::DISPLAY_HEIGHT_PX as i32 / 2;
        let region = Self::cover_rect();
        let saved = ui.gfx.read_rect(region);

        Self::draw(&mut ui.gfx, msg1, msg2, icon, true);
        let hint = if with_cancel {
            "Press OK or CANCEL to continue"
        } else {
            "Press OK to continue"
        };
        ui.gfx.draw_text(
            hint,
            center_x,
            center_y - 4,
            FontId::Body,
            Datum::TopCentre,
            palette::WHITE,
            Some(palette::DIALOG_GREY),
        );

        let button_y = center_y + 34;
        let mut btn_cancel = PushButton::new();
        let mut btn_ok = PushButton::new();
        let ok_x = if with_cancel {
            btn_cancel.init_center(
                center_x - BUTTON_W / 2 - 10,
                button_y,
                BUTTON_W,
                BUTTON_H,
                palette::WHITE,
                palette::BTN_GREY,
                palette::RED,
                2,
                FontId::Heading,
            );
            btn_cancel.set_label("CANCEL");
            btn_cancel.redraw(ui, true);
            center_x + BUTTON_W / 2 + 10
        } else {
            center_x
        };
        btn_ok.init_center(
            ok_x,
            button_y,
            BUTTON_W,
            BUTTON_H,
            palette::WHITE,
            palette::BTN_GREY,
            palette::GREEN,
            2,
            FontId::Heading,
        );
        btn_ok.set_label("OK");
        btn_ok.redraw(ui, true);

        let result = loop {
            ui.gfx.present();
            ui.touch.poll();
            if with_cancel && btn_cancel.check_pressed(ui, true) {
                break false;
            }
            if btn_ok.check_pressed(ui, true) {
                break true;
            }
            ui.clock.delay_ms(20);
        };

        ui.gfx.push_rect(region, &saved);
        ui.gfx.present();
        ui.clock.delay_ms(100);
        result
    }

    /// Region covered by the largest dialog layout.
    fn cover_rect() -> Rect {
        let center_x = crate::ui::DISPLAY_WIDTH_PX as i32 / 2;
        let center_y = crate::ui::DISPLAY_HEIGHT_PX as i32 / 2;
        Rect::new(
            center_x - MSG_WIDTH / 2,
            center_y - MSG_HEIGHT / 2,
            MSG_WIDTH,
            MSG_HEIGHT,
        )
    }
}
