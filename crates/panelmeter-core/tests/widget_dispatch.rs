//! Touch dispatch semantics of the basic widgets, driven through the
//! scripted digitizer and the manual clock — no display, no delays.

use panelmeter_core::config::PanelConfig;
use panelmeter_core::mocks::{test_ui, ScriptedTouch};
use panelmeter_core::ui::gfx::{FontId, Rect};
use panelmeter_core::ui::widget::Widget;
use panelmeter_core::ui::{palette, UiEvent, WidgetTag};
use panelmeter_core::widgets::{Checkbox, Orientation, PushButton, Slider};

fn button_at(rect: Rect) -> PushButton {
    let mut b = PushButton::new();
    b.init(
        rect,
        palette::WHITE,
        palette::BTN_GREY,
        palette::RED,
        2,
        FontId::Body,
    );
    b.set_action(WidgetTag::SaveBtn);
    b
}

#[test]
fn press_fires_exactly_once_per_hold() {
    // not-pressed, pressed-inside, pressed-inside (held), not-pressed
    let script = ScriptedTouch::new(&[None, Some((15, 15)), Some((15, 15)), None]);
    let mut ui = test_ui(script, PanelConfig::default());
    let mut btn = button_at(Rect::new(10, 10, 20, 20));

    let mut results = [true; 4];
    for slot in results.iter_mut() {
        ui.touch.poll();
        *slot = btn.check_pressed(&mut ui, false);
    }
    assert_eq!(results, [false, true, false, false]);

    // the single press queued a single event
    assert_eq!(
        ui.events.pop(),
        Some(UiEvent::Pressed {
            tag: WidgetTag::SaveBtn
        })
    );
    assert!(ui.events.is_empty());
}

#[test]
fn containment_includes_the_far_corner() {
    let mut ui = test_ui(ScriptedTouch::hold(30, 30, 2), PanelConfig::default());
    let mut btn = button_at(Rect::new(10, 10, 20, 20));
    ui.touch.poll();
    assert!(btn.check_pressed(&mut ui, false));

    let mut ui = test_ui(ScriptedTouch::hold(31, 31, 2), PanelConfig::default());
    let mut btn = button_at(Rect::new(10, 10, 20, 20));
    ui.touch.poll();
    assert!(!btn.check_pressed(&mut ui, false));
}

#[test]
fn disabled_widget_ignores_touch_entirely() {
    let mut ui = test_ui(ScriptedTouch::hold(15, 15, 3), PanelConfig::default());
    let mut btn = button_at(Rect::new(10, 10, 20, 20));
    btn.core_mut().enabled = false;
    ui.touch.poll();
    assert!(!btn.check_pressed(&mut ui, false));
    assert!(ui.events.is_empty());
}

#[test]
fn inactive_widget_ignores_touch() {
    let mut ui = test_ui(ScriptedTouch::hold(15, 15, 3), PanelConfig::default());
    let mut btn = button_at(Rect::new(10, 10, 20, 20));
    btn.core_mut().active = false;
    ui.touch.poll();
    assert!(!btn.check_pressed(&mut ui, false));
}

#[test]
fn invisible_button_still_dispatches() {
    let mut ui = test_ui(ScriptedTouch::hold(25, 100, 3), PanelConfig::default());
    let mut wipe = PushButton::new();
    wipe.init_invisible(Rect::new(0, 0, 50, 200));
    wipe.set_action(WidgetTag::LeftWipe);
    ui.touch.poll();
    assert!(wipe.check_pressed(&mut ui, false));
    // and it drew nothing
    assert_eq!(ui.gfx.op_count(), 0);
}

#[test]
fn hidden_widget_draws_nothing_but_keeps_dispatching() {
    let mut ui = test_ui(ScriptedTouch::hold(15, 15, 3), PanelConfig::default());
    let mut btn = button_at(Rect::new(10, 10, 20, 20));
    btn.set_visible(false);
    ui.touch.poll();
    // visibility gates drawing only; enabled+active still dispatch
    assert!(btn.check_pressed(&mut ui, false));
    assert_eq!(ui.gfx.op_count(), 0);
}

#[test]
fn checkbox_toggles_once_per_press() {
    let mut ui = test_ui(
        ScriptedTouch::new(&[Some((20, 25)), Some((20, 25)), None]),
        PanelConfig::default(),
    );
    let mut cb = Checkbox::new();
    cb.init(
        10,
        20,
        20,
        palette::WHITE,
        palette::WINDOW_GREY,
        palette::YELLOW,
        2,
        FontId::Body,
    );
    cb.set_action(WidgetTag::BeepCheckbox);
    ui.touch.poll();
    assert!(cb.check_pressed(&mut ui, true));
    assert!(cb.is_checked());
    assert_eq!(
        ui.events.pop(),
        Some(UiEvent::Toggled {
            tag: WidgetTag::BeepCheckbox,
            on: true
        })
    );
}

#[test]
fn slider_drag_tracks_and_emits_continuously() {
    // three pressed samples walking right, then release
    let mut ui = test_ui(
        ScriptedTouch::new(&[
            Some((160, 115)),
            Some((160, 115)),
            Some((293, 115)),
            None,
        ]),
        PanelConfig::default(),
    );
    let mut slider = Slider::new(Orientation::Horizontal);
    slider.init(
        Rect::new(10, 100, 300, 30),
        palette::WHITE,
        palette::CYAN,
        palette::RED,
        2,
        FontId::Body,
    );
    slider.set_action(WidgetTag::Slider1);

    ui.touch.poll();
    assert!(slider.check_pressed(&mut ui, true));

    // first drag sample bypasses the filter: exactly the touch fraction
    let first = ui.events.pop();
    let Some(UiEvent::LevelChanged { tag, level }) = first else {
        panic!("expected a level event, got {first:?}");
    };
    assert_eq!(tag, WidgetTag::Slider1);
    assert!((level - 0.5).abs() < 0.01, "level {level}");

    // a later event moved toward full scale but stayed clamped
    let mut last = level;
    while let Some(UiEvent::LevelChanged { level, .. }) = ui.events.pop() {
        assert!((0.0..=1.0).contains(&level));
        last = level;
    }
    assert!(last > 0.5);
    assert!((slider.level() - last).abs() < 1e-6);
}

#[test]
fn slider_clamps_outside_the_track() {
    let mut ui = test_ui(
        ScriptedTouch::new(&[Some((11, 115)), Some((0, 115)), None]),
        PanelConfig::default(),
    );
    let mut slider = Slider::new(Orientation::Horizontal);
    slider.init(
        Rect::new(10, 100, 300, 30),
        palette::WHITE,
        palette::CYAN,
        palette::RED,
        2,
        FontId::Body,
    );
    ui.touch.poll();
    assert!(slider.check_pressed(&mut ui, true));
    assert!(slider.level() >= 0.0);
}
