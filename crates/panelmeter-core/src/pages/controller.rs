//! Page controller: group masks and bulk widget operations.
//!
//! Every widget carries a 32-bit page-membership mask assigned when it is
//! registered. Page transitions are three bulk operations in a fixed
//! order — disable everything, enable the target group, redraw the target
//! group — so a widget leaving the page can never receive a stray redraw
//! after it was logically removed.
//!
//! Touch dispatch walks the widgets in registration order; when two
//! rectangles overlap, the earlier registration wins the touch. That
//! first-match rule (not z-order) is relied upon by the layouts and must
//! not change.

use heapless::Vec;
use log::debug;

use crate::ui::gfx::Rect;
use crate::ui::widget::Widget;
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui};
use crate::widgets::WidgetKind;

use super::state::InstrState;

/// Page-membership mask bits. A widget shown on several pages ORs the
/// bits together.
pub const PAGE_MAIN: u32 = 1 << 0;
pub const PAGE_SETUP: u32 = 1 << 1;
pub const PAGE_OPTIONS: u32 = 1 << 2;
pub const PAGE_EXTRAS: u32 = 1 << 3;
/// All setup sub-tab pages (the tab strip and its shared buttons).
pub const PAGE_ALL_TABS: u32 = PAGE_SETUP | PAGE_OPTIONS | PAGE_EXTRAS;
pub const PAGE_ALL: u32 = PAGE_MAIN | PAGE_ALL_TABS;

/// Upper bound on registered widgets.
pub const MAX_WIDGETS: usize = 24;

/// Handle to a registered widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetId(usize);

pub struct PageManager {
    widgets: Vec<WidgetKind, MAX_WIDGETS>,
    state: InstrState,
    draw_group_calls: u32,
}

impl PageManager {
    pub fn new() -> Self {
        Self {
            widgets: Vec::new(),
            state: InstrState::MeterInit,
            draw_group_calls: 0,
        }
    }

    /// Register a widget with its page mask. Registration order is
    /// dispatch order.
    pub fn add(&mut self, mut widget: WidgetKind, mask: u32) -> WidgetId {
        widget.core_mut().mask = mask;
        let id = WidgetId(self.widgets.len());
        if self.widgets.push(widget).is_err() {
            debug!("widget table full, registration dropped");
        }
        id
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut WidgetKind> {
        self.widgets.get_mut(id.0)
    }

    pub fn state(&self) -> InstrState {
        self.state
    }

    pub fn set_state(&mut self, state: InstrState) {
        self.state = state;
    }

    /// Enable or disable every widget whose mask intersects `mask`.
    pub fn enable_group(&mut self, mask: u32, enabled: bool) {
        debug!("enable group {:#06b} = {}", mask, enabled);
        for w in self.widgets.iter_mut() {
            if w.core().mask & mask != 0 {
                w.core_mut().enabled = enabled;
            }
        }
    }

    /// Activate (un-grey) or deactivate every widget in `mask`.
    pub fn activate_group(&mut self, mask: u32, active: bool) {
        debug!("activate group {:#06b} = {}", mask, active);
        for w in self.widgets.iter_mut() {
            if w.core().mask & mask != 0 {
                w.core_mut().active = active;
            }
        }
    }

    pub fn disable_all(&mut self) {
        for w in self.widgets.iter_mut() {
            w.core_mut().enabled = false;
        }
    }

    /// Redraw every enabled widget; each widget's own draw gate skips the
    /// disabled ones. Used to grey everything under a modal and to
    /// restore the page afterwards.
    pub fn draw_enabled<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        active: bool,
    ) {
        for w in self.widgets.iter_mut() {
            w.redraw(ui, active);
        }
    }

    /// Page transition primitive: disable all, enable the group, redraw.
    pub fn draw_group<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        mask: u32,
        active: bool,
    ) {
        debug!("draw group {:#06b}, active = {}", mask, active);
        self.disable_all();
        self.enable_group(mask, true);
        self.draw_enabled(ui, active);
        self.draw_group_calls += 1;
    }

    /// Advance the measurement-page ring and repaint the main controls.
    /// Returns the new (Init or steady) state; the caller draws the page
    /// chrome and moves on to the steady state.
    pub fn cycle<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        forward: bool,
    ) -> InstrState {
        self.state = if forward {
            self.state.next()
        } else {
            self.state.prev()
        };
        debug!("cycle to state {:?}", self.state);
        ui.touch.reset_enc_delta();
        ui.gfx.fill_rect(
            Rect::new(
                0,
                0,
                crate::ui::DISPLAY_WIDTH_PX as i32,
                crate::ui::DISPLAY_HEIGHT_PX as i32,
            ),
            palette::BLACK,
        );
        self.draw_group(ui, PAGE_MAIN, true);
        self.state
    }

    /// One dispatch pass over all widgets, in registration order. Call
    /// after a poll that reported a touch.
    pub fn check_pressed_all<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
    ) {
        for w in self.widgets.iter_mut() {
            w.check_pressed(ui, true);
        }
    }

    /// Periodic update pass (blinking LEDs, value displays).
    pub fn update_all<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>) {
        for w in self.widgets.iter_mut() {
            w.update(ui);
        }
    }
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::mocks::{test_ui, ScriptedTouch};
    use crate::ui::gfx::Rect;
    use crate::widgets::PushButton;

    fn invisible_button(x: i32) -> WidgetKind {
        let mut b = PushButton::new();
        b.init_invisible(Rect::new(x, 0, 10, 10));
        WidgetKind::Button(b)
    }

    #[test]
    fn group_masking_enables_exactly_the_intersecting_widgets() {
        let mut pm = PageManager::new();
        let a = pm.add(invisible_button(0), 0b01);
        let b = pm.add(invisible_button(20), 0b10);
        let c = pm.add(invisible_button(40), 0b11);
        pm.enable_group(0b11, true);

        pm.enable_group(0b10, false);
        assert!(pm.widget_mut(a).unwrap().core().enabled);
        assert!(!pm.widget_mut(b).unwrap().core().enabled);
        assert!(!pm.widget_mut(c).unwrap().core().enabled);
    }

    #[test]
    fn activate_group_greys_only_the_intersection() {
        let mut pm = PageManager::new();
        let a = pm.add(invisible_button(0), 0b01);
        let b = pm.add(invisible_button(20), 0b10);
        pm.activate_group(0b10, false);
        assert!(pm.widget_mut(a).unwrap().core().active);
        assert!(!pm.widget_mut(b).unwrap().core().active);
        // deactivation does not touch the enabled flag
        assert!(pm.widget_mut(b).unwrap().core().enabled);
    }

    #[test]
    fn draw_group_disables_everything_else_first() {
        let mut pm = PageManager::new();
        let a = pm.add(invisible_button(0), PAGE_MAIN);
        let b = pm.add(invisible_button(20), PAGE_SETUP);
        let mut ui = test_ui(ScriptedTouch::idle(), PanelConfig::default());
        pm.draw_group(&mut ui, PAGE_SETUP, true);
        assert!(!pm.widget_mut(a).unwrap().core().enabled);
        assert!(pm.widget_mut(b).unwrap().core().enabled);
    }

    #[test]
    fn four_wipes_cycle_to_scope_init_with_one_draw_group_each() {
        let mut pm = PageManager::new();
        pm.add(invisible_button(0), PAGE_MAIN);
        let mut ui = test_ui(ScriptedTouch::idle(), PanelConfig::default());
        assert_eq!(pm.state(), InstrState::MeterInit);
        // "enableStdControls" equivalent paints the first page
        pm.draw_group(&mut ui, PAGE_MAIN, true);
        let baseline = pm.draw_group_calls;
        for _ in 0..4 {
            pm.cycle(&mut ui, true);
        }
        assert_eq!(pm.state(), InstrState::ScopeInit);
        assert_eq!(
            pm.state().index(),
            (InstrState::MeterInit.index() + 4) % 6
        );
        assert_eq!(pm.draw_group_calls - baseline, 4);
    }

    #[test]
    fn overlapping_widgets_first_registered_wins() {
        // two overlapping buttons; dispatch order must hit the first only
        let mut pm = PageManager::new();
        let mut first = PushButton::new();
        first.init_invisible(Rect::new(0, 0, 50, 50));
        first.set_action(crate::ui::WidgetTag::LeftWipe);
        let mut second = PushButton::new();
        second.init_invisible(Rect::new(0, 0, 50, 50));
        second.set_action(crate::ui::WidgetTag::RightWipe);
        pm.add(WidgetKind::Button(first), PAGE_MAIN);
        pm.add(WidgetKind::Button(second), PAGE_MAIN);

        let mut ui = test_ui(ScriptedTouch::hold(10, 10, 2), PanelConfig::default());
        ui.touch.poll();
        pm.check_pressed_all(&mut ui);
        assert_eq!(
            ui.events.pop(),
            Some(crate::ui::UiEvent::Pressed {
                tag: crate::ui::WidgetTag::LeftWipe
            })
        );
        // the winner's wait-for-release drained the touch, so the second
        // button saw "not pressed" and stayed silent
        assert!(ui.events.is_empty());
    }
}
