//! Concrete widget implementations and the type-erased wrapper.
//!
//! [`WidgetKind`] is an enum-based wrapper that enables heterogeneous
//! storage of the concrete widget types without trait objects: the page
//! controller stores a `heapless::Vec<WidgetKind, N>` and routes every
//! [`Widget`] call through the match arms below. When adding a widget
//! type, add a variant here and extend the delegation.

pub mod button;
pub mod checkbox;
pub mod checkbox_group;
pub mod encoder_entry;
pub mod led;
pub mod numeric_display;
pub mod radio_group;
pub mod slider;
pub mod switch;
pub mod tabs;

pub use button::PushButton;
pub use checkbox::Checkbox;
pub use checkbox_group::CheckboxGroup;
pub use encoder_entry::EncoderEntry;
pub use led::{Led, LedShape};
pub use numeric_display::NumericDisplay;
pub use radio_group::RadioGroup;
pub use slider::{Orientation, Slider};
pub use switch::SlideSwitch;
pub use tabs::TabStrip;

use crate::ui::widget::{Widget, WidgetCore};
use crate::ui::{Clock, Gfx, TouchDigitizer, Ui};

pub enum WidgetKind {
    Button(PushButton),
    Checkbox(Checkbox),
    Switch(SlideSwitch),
    Slider(Slider),
    Led(Led),
    Numeric(NumericDisplay),
    RadioGroup(RadioGroup),
    CheckboxGroup(CheckboxGroup),
    Tabs(TabStrip),
    EncoderEntry(EncoderEntry),
}

impl Widget for WidgetKind {
    fn core(&self) -> &WidgetCore {
        match self {
            WidgetKind::Button(w) => w.core(),
            WidgetKind::Checkbox(w) => w.core(),
            WidgetKind::Switch(w) => w.core(),
            WidgetKind::Slider(w) => w.core(),
            WidgetKind::Led(w) => w.core(),
            WidgetKind::Numeric(w) => w.core(),
            WidgetKind::RadioGroup(w) => w.core(),
            WidgetKind::CheckboxGroup(w) => w.core(),
            WidgetKind::Tabs(w) => w.core(),
            WidgetKind::EncoderEntry(w) => w.core(),
        }
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        match self {
            WidgetKind::Button(w) => w.core_mut(),
            WidgetKind::Checkbox(w) => w.core_mut(),
            WidgetKind::Switch(w) => w.core_mut(),
            WidgetKind::Slider(w) => w.core_mut(),
            WidgetKind::Led(w) => w.core_mut(),
            WidgetKind::Numeric(w) => w.core_mut(),
            WidgetKind::RadioGroup(w) => w.core_mut(),
            WidgetKind::CheckboxGroup(w) => w.core_mut(),
            WidgetKind::Tabs(w) => w.core_mut(),
            WidgetKind::EncoderEntry(w) => w.core_mut(),
        }
    }

    fn redraw<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>, active: bool) {
        match self {
            WidgetKind::Button(w) => w.redraw(ui, active),
            WidgetKind::Checkbox(w) => w.redraw(ui, active),
            WidgetKind::Switch(w) => w.redraw(ui, active),
            WidgetKind::Slider(w) => w.redraw(ui, active),
            WidgetKind::Led(w) => w.redraw(ui, active),
            WidgetKind::Numeric(w) => w.redraw(ui, active),
            WidgetKind::RadioGroup(w) => w.redraw(ui, active),
            WidgetKind::CheckboxGroup(w) => w.redraw(ui, active),
            WidgetKind::Tabs(w) => w.redraw(ui, active),
            WidgetKind::EncoderEntry(w) => w.redraw(ui, active),
        }
    }

    fn check_pressed<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        wait_released: bool,
    ) -> bool {
        match self {
            WidgetKind::Button(w) => w.check_pressed(ui, wait_released),
            WidgetKind::Checkbox(w) => w.check_pressed(ui, wait_released),
            WidgetKind::Switch(w) => w.check_pressed(ui, wait_released),
            WidgetKind::Slider(w) => w.check_pressed(ui, wait_released),
            WidgetKind::Led(w) => w.check_pressed(ui, wait_released),
            WidgetKind::Numeric(w) => w.check_pressed(ui, wait_released),
            WidgetKind::RadioGroup(w) => w.check_pressed(ui, wait_released),
            WidgetKind::CheckboxGroup(w) => w.check_pressed(ui, wait_released),
            WidgetKind::Tabs(w) => w.check_pressed(ui, wait_released),
            WidgetKind::EncoderEntry(w) => w.check_pressed(ui, wait_released),
        }
    }

    fn update<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>) {
        match self {
            WidgetKind::Button(w) => w.update(ui),
            WidgetKind::Checkbox(w) => w.update(ui),
            WidgetKind::Switch(w) => w.update(ui),
            WidgetKind::Slider(w) => w.update(ui),
            WidgetKind::Led(w) => w.update(ui),
            WidgetKind::Numeric(w) => w.update(ui),
            WidgetKind::RadioGroup(w) => w.update(ui),
            WidgetKind::CheckboxGroup(w) => w.update(ui),
            WidgetKind::Tabs(w) => w.update(ui),
            WidgetKind::EncoderEntry(w) => w.update(ui),
        }
    }
}

impl WidgetKind {
    pub fn as_numeric_mut(&mut self) -> Option<&mut NumericDisplay> {
        match self {
            WidgetKind::Numeric(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_switch_mut(&mut self) -> Option<&mut SlideSwitch> {
        match self {
            WidgetKind::Switch(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_led_mut(&mut self) -> Option<&mut Led> {
        match self {
            WidgetKind::Led(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_encoder_entry_mut(&mut self) -> Option<&mut EncoderEntry> {
        match self {
            WidgetKind::EncoderEntry(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_tabs_mut(&mut self) -> Option<&mut TabStrip> {
        match self {
            WidgetKind::Tabs(w) => Some(w),
            _ => None,
        }
    }
}
