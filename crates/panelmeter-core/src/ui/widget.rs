//! Widget base contract.
//!
//! Every control is a renderable, touchable rectangle with the shared
//! enabled/active/visible state model:
//!
//! - `enabled = false` removes the control entirely: not drawn, not
//!   dispatched, regardless of the other flags.
//! - `visible` gates drawing only. Invisible-but-enabled widgets still
//!   receive touches; the edge wipe zones depend on this.
//! - `active = false` draws the control in the greyed palette and ignores
//!   touches, the "present but locked out" state used under modals.
//!
//! Concrete widgets embed a [`WidgetCore`] (composition, not inheritance)
//! and implement [`Widget`]. Heterogeneous storage goes through the
//! `WidgetKind` enum in the widgets module rather than trait objects.

use heapless::String;

use super::event::WidgetTag;
use super::gfx::{Datum, FontId, Rect};
use super::palette;
use super::{Clock, Gfx, TouchDigitizer, Ui};
use embedded_graphics::pixelcolor::Rgb565;

/// Maximum label length for buttons, tabs and radio items.
pub const MAX_LABEL_LEN: usize = 20;

/// Maximum item count for radio groups, checkbox groups and tab strips.
pub const MAX_GROUP_ITEMS: usize = 10;

/// Color set shared by all widgets; variants pick the entries they need.
#[derive(Debug, Clone, Copy)]
pub struct WidgetColors {
    pub border: Rgb565,
    pub fill: Rgb565,
    pub text: Rgb565,
    pub checked: Rgb565,
    pub thumb: Rgb565,
    pub bg: Rgb565,
}

impl Default for WidgetColors {
    fn default() -> Self {
        Self {
            border: palette::WHITE,
            fill: palette::DARK_GREY,
            text: palette::WHITE,
            checked: palette::GREEN,
            thumb: palette::BLUE,
            bg: palette::BLACK,
        }
    }
}

/// Geometry, state flags and wiring common to every widget.
#[derive(Debug, Clone)]
pub struct WidgetCore {
    pub rect: Rect,
    pub label: String<MAX_LABEL_LEN>,
    pub label_dx: i32,
    pub label_dy: i32,
    pub label_datum: Datum,
    pub font: FontId,
    pub colors: WidgetColors,
    pub border_width: i32,
    /// Page-membership bitmask, see the page controller.
    pub mask: u32,
    /// Identity reported in emitted events.
    pub tag: Option<WidgetTag>,
    pub enabled: bool,
    pub active: bool,
    pub visible: bool,
    pub checked: bool,
    /// Pressed state of the previous tick, for press-edge detection.
    pub last_pressed: bool,
}

impl Default for WidgetCore {
    fn default() -> Self {
        Self {
            rect: Rect::new(0, 0, 10, 10),
            label: String::new(),
            label_dx: 0,
            label_dy: 0,
            label_datum: Datum::MiddleCentre,
            font: FontId::Body,
            colors: WidgetColors::default(),
            border_width: 2,
            mask: 0,
            tag: None,
            enabled: true,
            active: true,
            visible: true,
            checked: false,
            last_pressed: false,
        }
    }
}

impl WidgetCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    /// Drawing gate.
    pub fn can_draw(&self) -> bool {
        self.visible && self.enabled
    }

    /// Touch gate. Visibility deliberately not required here.
    pub fn accepts_touch(&self) -> bool {
        self.enabled && self.active
    }

    /// Replace the label, truncating over-long text.
    pub fn set_label(&mut self, label: &str) {
        self.label.clear();
        for ch in label.chars() {
            if self.label.push(ch).is_err() {
                break;
            }
        }
    }

    /// Position the label relative to the widget body.
    pub fn set_label_datum(&mut self, dx: i32, dy: i32, datum: Datum) {
        self.label_dx = dx;
        self.label_dy = dy;
        self.label_datum = datum;
    }
}

/// Operations every concrete widget must provide.
pub trait Widget {
    fn core(&self) -> &WidgetCore;
    fn core_mut(&mut self) -> &mut WidgetCore;

    /// Unconditional full repaint with the given activity state.
    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool);

    /// Evaluate the cached touch snapshot. Returns true for a fresh press
    /// inside the bounds while the widget accepts touch; mutates state and
    /// emits the widget's event. With `wait_released` the call blocks until
    /// the finger lifts.
    fn check_pressed<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        wait_released: bool,
    ) -> bool;

    /// Periodic update hook for blinking or value-driven widgets.
    fn update<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, _ui: &mut Ui<G, T, C>) {}

    fn contains(&self, x: i32, y: i32) -> bool {
        self.core().contains(x, y)
    }

    /// Repaints are expensive on the SPI bus, so state setters only draw
    /// when explicitly told to.
    fn set_enabled<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        enabled: bool,
        redraw: bool,
    ) {
        self.core_mut().enabled = enabled;
        if redraw && self.core().can_draw() {
            let active = self.core().active;
            self.redraw(ui, active);
        }
    }

    fn set_active<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        active: bool,
        redraw: bool,
    ) {
        self.core_mut().active = active;
        if redraw {
            self.redraw(ui, active);
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.core_mut().visible = visible;
    }
}
