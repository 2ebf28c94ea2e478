//! Panel application: builds the widget set, owns the measurement views
//! and drives everything from the main loop tick.
//!
//! There are no globals: the application owns the page manager, meter,
//! bargraphs, scope and settings, and receives the shared UI context and
//! the settings store by reference each tick. Widget presses arrive as
//! queued [`UiEvent`]s and are handled after the dispatch pass — the Rust
//! shape of the old press-callback table.

use log::{debug, warn};

use crate::config::PanelConfig;
use crate::meter::bargraph::Orientation as BarOrientation;
use crate::meter::{AnalogMeter, Bargraph, ScrollingScope};
use crate::modal::{DialogBox, DialogIcon, ModalMenu, NumericKeypad};
use crate::pages::{
    InstrState, PageManager, WidgetId, PAGE_ALL_TABS, PAGE_EXTRAS, PAGE_MAIN, PAGE_OPTIONS,
    PAGE_SETUP,
};
use crate::sampling::SamplePair;
use crate::settings::{Settings, SettingsStore, SCALING_COUNT};
use crate::ui::gfx::{Datum, FontId, Rect};
use crate::ui::widget::Widget;
use crate::ui::{palette, Clock, Gfx, TouchDigitizer, Ui, UiEvent, WidgetTag};
use crate::widgets::{
    Checkbox, CheckboxGroup, EncoderEntry, Led, LedShape, NumericDisplay, Orientation, PushButton,
    RadioGroup, SlideSwitch, Slider, TabStrip, WidgetKind,
};

const DISPLAY_W: i32 = crate::ui::DISPLAY_WIDTH_PX as i32;
const DISPLAY_H: i32 = crate::ui::DISPLAY_HEIGHT_PX as i32;
/// Main measurement window, above the bottom control strip.
const MAIN_W: i32 = DISPLAY_W;
const MAIN_H: i32 = DISPLAY_H - 40;

const NUM_POS_X: i32 = DISPLAY_W - crate::widgets::numeric_display::NUMERICS_WIDTH + 2;
const NUM_POS_Y: i32 = DISPLAY_H - crate::widgets::numeric_display::NUMERICS_HEIGHT + 2;

/// Entries of the scaling/offset adjustment menu; indices 0..9 map to the
/// range table, 10 and 11 to the raw ADC offsets.
const SCALING_MENU: [&str; 12] = [
    "Scaling 30mA",
    "Scaling 100mA",
    "Scaling 300mA",
    "Scaling 1A",
    "Scaling 3A",
    "Scaling 1V",
    "Scaling 3V",
    "Scaling 10V",
    "Scaling 30V",
    "Scaling 100V",
    "Offset  Amps",
    "Offset  Volts",
];

/// Which channel owns the big display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Amps,
    Volts,
}

impl Measurement {
    fn toggled(self) -> Self {
        match self {
            Measurement::Amps => Measurement::Volts,
            Measurement::Volts => Measurement::Amps,
        }
    }
}

/// Handles to the widgets the application reaches back into.
struct PanelIds {
    range_switch: WidgetId,
    status_led: WidgetId,
    ovld_led: WidgetId,
    numeric: WidgetId,
    tabs: WidgetId,
    beep_checkbox: WidgetId,
    radio: WidgetId,
    encoder_entry: WidgetId,
    option_group: WidgetId,
    slider1: WidgetId,
    slider2: WidgetId,
}

pub struct PanelApp {
    pages: PageManager,
    ids: PanelIds,
    meter: AnalogMeter,
    scope: ScrollingScope,
    bar_amps: Bargraph,
    bar_volts: Bargraph,
    bar_vert: Bargraph,
    keypad: NumericKeypad,
    settings: Settings,
    active_measurement: Measurement,
    marker_amps: f32,
    marker_volts: f32,
    range_changed: bool,
    measurement_changed: bool,
    setup_tab: usize,
}

impl PanelApp {
    /// Build all controls at their home positions. Nothing is drawn until
    /// [`PanelApp::start`].
    pub fn new(settings: Settings, config: &PanelConfig) -> Self {
        let mut pages = PageManager::new();

        // Main page strip, dispatch order is touch priority.
        let mut setup_btn = PushButton::new();
        setup_btn.init_center(
            160,
            218,
            30,
            34,
            palette::WHITE,
            palette::RED,
            palette::BLACK,
            2,
            FontId::Heading,
        );
        setup_btn.set_label("S");
        setup_btn.set_action(WidgetTag::SetupBtn);
        pages.add(WidgetKind::Button(setup_btn), PAGE_MAIN);

        let mut status_led = Led::new();
        status_led.init_center(96, 218, 24, palette::GREEN, LedShape::Round);
        status_led.set_label("RUN");
        let status_led = pages.add(WidgetKind::Led(status_led), PAGE_MAIN);

        let mut ovld_led = Led::new();
        ovld_led.init_center(126, 218, 24, palette::RED, LedShape::Round);
        ovld_led.set_label("OVL");
        let ovld_led = pages.add(WidgetKind::Led(ovld_led), PAGE_MAIN);

        let mut range_switch = SlideSwitch::new();
        range_switch.init_center(
            38,
            218,
            70,
            34,
            palette::WHITE,
            palette::GREEN,
            palette::WHITE,
            2,
            FontId::Body,
        );
        range_switch.core_mut().set_label_datum(0, -5, Datum::TopCentre);
        range_switch.set_label("Hi Range");
        range_switch.set_action(WidgetTag::RangeSwitch);
        let range_switch = pages.add(WidgetKind::Switch(range_switch), PAGE_MAIN);

        let mut numeric = NumericDisplay::new();
        numeric.init(NUM_POS_X, NUM_POS_Y, true);
        numeric.set_action(WidgetTag::NumericReadout);
        let numeric = pages.add(WidgetKind::Numeric(numeric), PAGE_MAIN);

        // Invisible edge zones cycle the measurement pages when no
        // encoder is fitted.
        if !config.has_encoder {
            let mut left_wipe = PushButton::new();
            left_wipe.init_invisible(Rect::new(0, 0, 50, MAIN_H));
            left_wipe.set_action(WidgetTag::LeftWipe);
            pages.add(WidgetKind::Button(left_wipe), PAGE_MAIN);

            let mut right_wipe = PushButton::new();
            right_wipe.init_invisible(Rect::new(MAIN_W - 50, 0, 50, MAIN_H));
            right_wipe.set_action(WidgetTag::RightWipe);
            pages.add(WidgetKind::Button(right_wipe), PAGE_MAIN);
        }

        // Setup pages. The tab strip erases the content window on redraw,
        // so every tab-page widget must be registered after it.
        let mut tabs = TabStrip::new();
        tabs.init(
            0,
            200,
            DISPLAY_W,
            40,
            3,
            palette::WHITE,
            palette::WINDOW_GREY,
            palette::YELLOW,
            FontId::Heading,
        );
        tabs.set_labels(&["Setup", "Options", "Extras"]);
        tabs.set_action(WidgetTag::SetupTabs);
        let tabs = pages.add(WidgetKind::Tabs(tabs), PAGE_ALL_TABS);

        let mut save_btn = PushButton::new();
        save_btn.init(
            Rect::new(220, 15, 90, 28),
            palette::WHITE,
            palette::BTN_GREY,
            palette::RED,
            2,
            FontId::Heading,
        );
        save_btn.set_label("SAVE");
        save_btn.set_action(WidgetTag::SaveBtn);
        pages.add(WidgetKind::Button(save_btn), PAGE_ALL_TABS);

        let mut exit_btn = PushButton::new();
        exit_btn.init(
            Rect::new(220, 50, 90, 28),
            palette::WHITE,
            palette::BTN_GREY,
            palette::MAGENTA,
            2,
            FontId::Heading,
        );
        exit_btn.set_label("EXIT");
        exit_btn.set_action(WidgetTag::ExitBtn);
        pages.add(WidgetKind::Button(exit_btn), PAGE_ALL_TABS);

        let mut offset_btn = PushButton::new();
        offset_btn.init(
            Rect::new(240, 155, 70, 28),
            palette::WHITE,
            palette::BTN_GREY,
            palette::RED,
            2,
            FontId::Heading,
        );
        offset_btn.set_label("OFFS");
        offset_btn.set_action(WidgetTag::OffsetBtn);
        pages.add(WidgetKind::Button(offset_btn), PAGE_SETUP);

        let mut beep_checkbox = Checkbox::new();
        beep_checkbox.init(
            10,
            20,
            30,
            palette::WHITE,
            palette::WINDOW_GREY,
            palette::YELLOW,
            2,
            FontId::Body,
        );
        beep_checkbox.set_label("Enable Beep");
        beep_checkbox.set_action(WidgetTag::BeepCheckbox);
        let beep_checkbox = pages.add(WidgetKind::Checkbox(beep_checkbox), PAGE_SETUP);

        let mut radio = RadioGroup::new();
        radio.init(
            13,
            70,
            24,
            3,
            palette::WHITE,
            palette::WINDOW_GREY,
            palette::CYAN,
            2,
            FontId::Body,
        );
        radio.set_labels(&["Slow", "Medium", "Fast"]);
        radio.set_action(WidgetTag::SettingsRadio);
        let radio = pages.add(WidgetKind::RadioGroup(radio), PAGE_SETUP);

        let mut encoder_entry = EncoderEntry::new();
        encoder_entry.init(
            Rect::new(140, 60, 60, 28),
            palette::WHITE,
            palette::BLACK,
            palette::YELLOW,
            2,
            FontId::Heading,
        );
        encoder_entry.set_label("Preset Value");
        encoder_entry.set_action(WidgetTag::EncoderEntry);
        let encoder_entry = pages.add(WidgetKind::EncoderEntry(encoder_entry), PAGE_EXTRAS);

        let mut option_group = CheckboxGroup::new();
        option_group.init(
            10,
            20,
            20,
            5,
            palette::WHITE,
            palette::WINDOW_GREY,
            palette::WHITE,
            2,
            FontId::Body,
        );
        option_group.set_labels(&[
            "Peak hold",
            "Slow sweep",
            "Invert trace",
            "Keep markers",
            "Demo mode",
        ]);
        option_group.set_action(WidgetTag::OptionGroup);
        let option_group = pages.add(WidgetKind::CheckboxGroup(option_group), PAGE_OPTIONS);

        let mut slider1 = Slider::new(Orientation::Horizontal);
        slider1.init(
            Rect::new(10, 160, 300, 30),
            palette::WHITE,
            palette::CYAN,
            palette::RED,
            2,
            FontId::Body,
        );
        slider1.set_action(WidgetTag::Slider1);
        let slider1 = pages.add(WidgetKind::Slider(slider1), PAGE_OPTIONS);

        let mut slider2 = Slider::new(Orientation::Vertical);
        slider2.init(
            Rect::new(170, 10, 30, 140),
            palette::WHITE,
            palette::YELLOW,
            palette::RED,
            2,
            FontId::Body,
        );
        slider2.set_action(WidgetTag::Slider2);
        let slider2 = pages.add(WidgetKind::Slider(slider2), PAGE_OPTIONS);

        let mut bar_amps = Bargraph::new(BarOrientation::Horizontal, config.peak_decay);
        bar_amps.set_touch_enabled(true);
        let mut bar_volts = Bargraph::new(BarOrientation::Horizontal, config.peak_decay);
        bar_volts.set_touch_enabled(true);
        let mut bar_vert = Bargraph::new(BarOrientation::Vertical, config.peak_decay);
        bar_vert.set_touch_enabled(true);

        let marker_amps = settings.marker_amps();
        let marker_volts = settings.marker_volts();

        Self {
            pages,
            ids: PanelIds {
                range_switch,
                status_led,
                ovld_led,
                numeric,
                tabs,
                beep_checkbox,
                radio,
                encoder_entry,
                option_group,
                slider1,
                slider2,
            },
            meter: AnalogMeter::new(),
            scope: ScrollingScope::new(),
            bar_amps,
            bar_volts,
            bar_vert,
            keypad: NumericKeypad::new(),
            settings,
            active_measurement: Measurement::Amps,
            marker_amps,
            marker_volts,
            range_changed: false,
            measurement_changed: false,
            setup_tab: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> InstrState {
        self.pages.state()
    }

    /// Seed widget states from the loaded settings and show the first
    /// page.
    pub fn start<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>) {
        debug!("panel start");
        if let Some(w) = self.pages.widget_mut(self.ids.range_switch) {
            if let Some(sw) = w.as_switch_mut() {
                sw.set_state(&mut ui.gfx, self.settings.amp_hi_range_on, false);
            }
        }
        if let Some(WidgetKind::Checkbox(cb)) = self.pages.widget_mut(self.ids.beep_checkbox) {
            cb.set_state(&mut ui.gfx, self.settings.beep_enabled, false);
        }
        if let Some(WidgetKind::RadioGroup(r)) = self.pages.widget_mut(self.ids.radio) {
            r.set_selected(&mut ui.gfx, self.settings.config_int[2] as usize, false);
        }
        if let Some(WidgetKind::CheckboxGroup(g)) = self.pages.widget_mut(self.ids.option_group) {
            for idx in 0..5 {
                g.set_item_state(idx, self.settings.config_bool[idx]);
            }
        }
        if let Some(WidgetKind::Slider(s)) = self.pages.widget_mut(self.ids.slider1) {
            s.set_level(&mut ui.gfx, self.settings.config_float[0], false);
        }
        if let Some(WidgetKind::Slider(s)) = self.pages.widget_mut(self.ids.slider2) {
            s.set_level(&mut ui.gfx, self.settings.config_float[1], false);
        }
        if let Some(e) = self
            .pages
            .widget_mut(self.ids.encoder_entry)
            .and_then(WidgetKind::as_encoder_entry_mut)
        {
            e.set_value(&mut ui.gfx, self.settings.config_int[0], false);
        }
        if let Some(l) = self
            .pages
            .widget_mut(self.ids.status_led)
            .and_then(WidgetKind::as_led_mut)
        {
            l.set_state(&mut ui.gfx, true, true, false);
        }
        self.enable_page_controls(ui, InstrState::MeterInit);
    }

    // -------------------------------------------------------------------
    // Page setup
    // -------------------------------------------------------------------

    fn enable_page_controls<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        state: InstrState,
    ) {
        match state {
            InstrState::MeterInit | InstrState::BargraphInit | InstrState::ScopeInit => {
                ui.touch.reset_enc_delta();
                ui.gfx
                    .fill_rect(Rect::new(0, 0, DISPLAY_W, DISPLAY_H), palette::BLACK);
                self.enable_std_controls(ui, state);
            }
            InstrState::SetupInit => {
                ui.gfx
                    .fill_rect(Rect::new(0, 0, DISPLAY_W, DISPLAY_H), palette::BLACK);
                self.setup_tab = 0;
                if let Some(t) = self.pages.widget_mut(self.ids.tabs).and_then(WidgetKind::as_tabs_mut) {
                    t.set_selected(&mut ui.gfx, 0, false);
                }
                self.pages.set_state(InstrState::Setup);
                self.enable_tab_controls(ui, 0);
            }
            other => self.pages.set_state(other),
        }
    }

    /// Enable and draw the standard measurement page for one of the Init
    /// states, then advance to the steady state.
    fn enable_std_controls<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        new_state: InstrState,
    ) {
        self.pages.draw_group(ui, PAGE_MAIN, true);
        self.std_chrome(ui, new_state);
    }

    /// Static chrome of a measurement page (scale frames, captions); the
    /// group redraw has already happened. Advances to the steady state.
    fn std_chrome<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        new_state: InstrState,
    ) {
        // secondary readout shows the other channel
        let (sec_range, sec_color) = match self.active_measurement {
            Measurement::Amps => (self.settings.volt_range_idx as usize, palette::BLUE),
            Measurement::Volts => (self.settings.amp_range_idx as usize, palette::DARK_GREEN),
        };
        if let Some(n) = self
            .pages
            .widget_mut(self.ids.numeric)
            .and_then(WidgetKind::as_numeric_mut)
        {
            n.set_range(&mut ui.gfx, sec_range, sec_color);
            n.set_level(&mut ui.gfx, -0.1, true);
        }

        self.bar_amps.set_enabled(false);
        self.bar_volts.set_enabled(false);
        self.bar_vert.set_enabled(false);

        let amp_range = self.settings.amp_range_idx as usize;
        let volt_range = self.settings.volt_range_idx as usize;
        match new_state.init_state() {
            InstrState::MeterInit => {
                self.pages.set_state(InstrState::Meter);
                self.meter.init(&mut ui.gfx, Rect::new(0, 0, MAIN_W, MAIN_H));
                let rng = match self.active_measurement {
                    Measurement::Amps => amp_range,
                    Measurement::Volts => volt_range,
                };
                self.meter.set_range(&mut ui.gfx, rng, palette::RED);
            }
            InstrState::BargraphInit => {
                self.pages.set_state(InstrState::Bargraph);
                ui.gfx.draw_text(
                    "TFT Panel Meter",
                    DISPLAY_W / 2,
                    5,
                    FontId::Heading,
                    Datum::TopCentre,
                    palette::WHITE,
                    Some(palette::BLACK),
                );
                self.bar_amps.set_enabled(true);
                self.bar_amps.init(Rect::new(0, 30, MAIN_W, 55));
                self.bar_amps
                    .set_range(&mut ui.gfx, amp_range, palette::GREEN, true);
                self.bar_amps
                    .update(&mut ui.gfx, 0.0, self.marker_amps, true);
                self.bar_volts.set_enabled(true);
                self.bar_volts.init(Rect::new(0, 100, MAIN_W, 55));
                self.bar_volts
                    .set_range(&mut ui.gfx, volt_range, palette::BLUE, true);
                self.bar_volts
                    .update(&mut ui.gfx, 0.0, self.marker_volts, true);
            }
            InstrState::ScopeInit => {
                self.pages.set_state(InstrState::Scope);
                self.scope.init(&mut ui.gfx, Rect::new(5, 0, 240, MAIN_H));
                self.scope.new_trace(
                    &mut ui.gfx,
                    palette::GREEN,
                    amp_range,
                    0,
                    self.active_measurement == Measurement::Amps,
                );
                self.scope.new_trace(
                    &mut ui.gfx,
                    palette::CYAN,
                    volt_range,
                    1,
                    self.active_measurement == Measurement::Volts,
                );
                self.bar_vert.set_enabled(true);
                self.bar_vert.init(Rect::new(250, 0, 70, MAIN_H));
                self.bar_vert
                    .set_range(&mut ui.gfx, amp_range, palette::GREEN, true);
                self.bar_vert
                    .update(&mut ui.gfx, 0.0, self.marker_amps, true);
            }
            _ => {}
        }

        ui.gfx.draw_text(
            "Secondary Display",
            DISPLAY_W - crate::widgets::numeric_display::NUMERICS_WIDTH / 2,
            DISPLAY_H - crate::widgets::numeric_display::NUMERICS_HEIGHT - 2,
            FontId::Body,
            Datum::BottomCentre,
            palette::WHITE,
            Some(palette::BLACK),
        );
    }

    fn enable_tab_controls<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        tab: usize,
    ) {
        debug!("setup tab {}", tab);
        match tab {
            0 => self.pages.draw_group(ui, PAGE_SETUP, true),
            1 => self.pages.draw_group(ui, PAGE_OPTIONS, true),
            2 => self.pages.draw_group(ui, PAGE_EXTRAS, true),
            _ => {}
        }
    }

    fn cycle_page<G: Gfx, T: TouchDigitizer, C: Clock>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        forward: bool,
    ) {
        // cycle() already redrew the main group once
        let state = self.pages.cycle(ui, forward);
        self.std_chrome(ui, state.init_state());
    }

    // -------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------

    /// One main-loop iteration: dispatch input, drain events, feed the
    /// active page with fresh samples.
    ///
    /// `scope_tick` gates the slower scope sample cadence.
    pub fn tick<G: Gfx, T: TouchDigitizer, C: Clock, S: SettingsStore>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        store: &mut S,
        samples: SamplePair,
        scope_tick: bool,
    ) {
        if ui.touch.poll().pressed {
            self.pages.check_pressed_all(ui);
        }
        self.pages.update_all(ui);

        // draggable bargraph setpoints
        match self.pages.state() {
            InstrState::Bargraph => {
                if self.bar_amps.check_pressed(ui) {
                    self.marker_amps = self.bar_amps.level_marker();
                    self.settings.set_marker_amps(self.marker_amps);
                }
                if self.bar_volts.check_pressed(ui) {
                    self.marker_volts = self.bar_volts.level_marker();
                    self.settings.set_marker_volts(self.marker_volts);
                }
            }
            InstrState::Scope => {
                if self.bar_vert.check_pressed(ui) {
                    self.marker_amps = self.bar_vert.level_marker();
                    self.settings.set_marker_amps(self.marker_amps);
                }
            }
            _ => {}
        }

        // encoder rotation cycles pages outside the setup screens
        if ui.config.has_encoder && !self.pages.state().is_setup() {
            let delta = ui.touch.enc_delta(false);
            if delta > 0 {
                self.cycle_page(ui, true);
            } else if delta < 0 {
                self.cycle_page(ui, false);
            }
        }

        while let Some(event) = ui.events.pop() {
            self.handle_event(ui, store, event);
        }

        // feed the active page
        let primary = match self.active_measurement {
            Measurement::Amps => samples.amps.level,
            Measurement::Volts => samples.volts.level,
        };
        let secondary = match self.active_measurement {
            Measurement::Amps => samples.volts.level,
            Measurement::Volts => samples.amps.level,
        };

        match self.pages.state() {
            InstrState::Meter => {
                if self.range_changed || self.measurement_changed {
                    self.enable_std_controls(ui, InstrState::MeterInit);
                }
                self.meter.set_level(&mut ui.gfx, primary, false);
            }
            InstrState::Bargraph => {
                if self.range_changed || self.measurement_changed {
                    self.enable_std_controls(ui, InstrState::BargraphInit);
                }
                self.bar_amps
                    .update(&mut ui.gfx, samples.amps.level, self.marker_amps, false);
                self.bar_volts
                    .update(&mut ui.gfx, samples.volts.level, self.marker_volts, false);
            }
            InstrState::Scope => {
                if self.range_changed || self.measurement_changed {
                    self.enable_std_controls(ui, InstrState::ScopeInit);
                }
                if scope_tick {
                    self.scope.new_sample(samples.amps.level, 0);
                    self.scope.new_sample(samples.volts.level, 1);
                    // traces may have crossed the grid last frame
                    self.scope.grid(&mut ui.gfx);
                    self.scope.trace(&mut ui.gfx, 0);
                    self.scope.trace(&mut ui.gfx, 1);
                }
                self.bar_vert
                    .update(&mut ui.gfx, samples.amps.level, self.marker_amps, false);
            }
            _ => {}
        }

        if let Some(n) = self
            .pages
            .widget_mut(self.ids.numeric)
            .and_then(WidgetKind::as_numeric_mut)
        {
            n.set_level(&mut ui.gfx, secondary, false);
        }
        if let Some(l) = self
            .pages
            .widget_mut(self.ids.ovld_led)
            .and_then(WidgetKind::as_led_mut)
        {
            l.set_state(&mut ui.gfx, samples.amps.overload, false, false);
        }

        self.range_changed = false;
        self.measurement_changed = false;
    }

    // -------------------------------------------------------------------
    // Event handling
    // -------------------------------------------------------------------

    fn handle_event<G: Gfx, T: TouchDigitizer, C: Clock, S: SettingsStore>(
        &mut self,
        ui: &mut Ui<G, T, C>,
        store: &mut S,
        event: UiEvent,
    ) {
        match event {
            UiEvent::Pressed {
                tag: WidgetTag::SetupBtn,
            } => self.enable_page_controls(ui, InstrState::SetupInit),

            UiEvent::Pressed {
                tag: WidgetTag::ExitBtn,
            } => self.enable_page_controls(ui, InstrState::MeterInit),

            UiEvent::Pressed {
                tag: WidgetTag::SaveBtn,
            } => {
                self.pages.draw_enabled(ui, false);
                match store.save(&self.settings) {
                    Ok(()) => DialogBox::message(
                        ui,
                        "Settings saved",
                        "to flash memory",
                        1000,
                        DialogIcon::Info,
                    ),
                    Err(err) => {
                        warn!("settings save failed: {}", err);
                        DialogBox::message(
                            ui,
                            "Save failed",
                            "storage unavailable",
                            2000,
                            DialogIcon::Error,
                        );
                    }
                }
                self.pages.draw_enabled(ui, true);
            }

            UiEvent::Pressed {
                tag: WidgetTag::OffsetBtn,
            } => self.run_scaling_menu(ui),

            UiEvent::Pressed {
                tag: WidgetTag::NumericReadout,
            } => {
                self.active_measurement = self.active_measurement.toggled();
                self.measurement_changed = true;
            }

            UiEvent::Pressed {
                tag: WidgetTag::LeftWipe,
            } => self.cycle_page(ui, false),

            UiEvent::Pressed {
                tag: WidgetTag::RightWipe,
            } => self.cycle_page(ui, true),

            UiEvent::Pressed {
                tag: WidgetTag::EncoderEntry,
            } => {
                // no encoder fitted: numeric keypad stands in
                self.pages.draw_enabled(ui, false);
                self.keypad
                    .init(Rect::new(30, 10, 260, 220), palette::WINDOW_GREY);
                self.keypad.set_entry_value(self.settings.config_int[0] as f32);
                if let Some(v) = self.keypad.entry(ui, "Enter preset value", 0, true) {
                    self.settings.config_int[0] = libm::rintf(v) as i32;
                    if let Some(WidgetKind::EncoderEntry(e)) =
                        self.pages.widget_mut(self.ids.encoder_entry)
                    {
                        e.set_value(&mut ui.gfx, self.settings.config_int[0], false);
                    }
                }
                self.pages.draw_enabled(ui, true);
            }

            UiEvent::Toggled {
                tag: WidgetTag::RangeSwitch,
                on,
            } => {
                self.settings.amp_hi_range_on = on;
                // the shunt relay moves full scale between range 2 and 3
                self.settings.amp_range_idx = if on { 3 } else { 2 };
                self.range_changed = true;
            }

            UiEvent::Toggled {
                tag: WidgetTag::BeepCheckbox,
                on,
            } => self.settings.beep_enabled = on,

            UiEvent::ItemSelected {
                tag: WidgetTag::SetupTabs,
                index,
            } => {
                self.setup_tab = index as usize;
                self.enable_tab_controls(ui, self.setup_tab);
            }

            UiEvent::ItemSelected {
                tag: WidgetTag::SettingsRadio,
                index,
            } => self.settings.config_int[2] = index as i32,

            UiEvent::ItemToggled {
                tag: WidgetTag::OptionGroup,
                index,
                on,
            } => {
                if let Some(slot) = self.settings.config_bool.get_mut(index as usize) {
                    *slot = on;
                }
            }

            UiEvent::LevelChanged {
                tag: WidgetTag::Slider1,
                level,
            } => self.settings.config_float[0] = level,

            UiEvent::LevelChanged {
                tag: WidgetTag::Slider2,
                level,
            } => self.settings.config_float[1] = level,

            UiEvent::ValueChanged {
                tag: WidgetTag::EncoderEntry,
                value,
            } => self.settings.config_int[0] = value,

            other => debug!("unhandled event {:?}", other),
        }
    }

    /// OFFS button: pick a scaling slot from the modal menu, then edit it
    /// on the keypad. A cancelled entry changes nothing.
    fn run_scaling_menu<G: Gfx, T: TouchDigitizer, C: Clock>(&mut self, ui: &mut Ui<G, T, C>) {
        self.pages.draw_enabled(ui, false);
        ui.touch.wait_released(&ui.clock);
        let choice = ModalMenu::select(ui, &SCALING_MENU, "Select adjustment");
        if let Some(item) = choice {
            self.keypad
                .init(Rect::new(30, 10, 260, 220), palette::WINDOW_GREY);
            if item < SCALING_COUNT {
                self.keypad.set_entry_value(self.settings.adc_scalings[item]);
                if let Some(v) = self.keypad.entry(ui, SCALING_MENU[item], 3, true) {
                    self.settings.adc_scalings[item] = v;
                }
            } else if item == SCALING_COUNT {
                self.keypad
                    .set_entry_value(self.settings.adc_raw_offset_amps as f32);
                if let Some(v) = self.keypad.entry(ui, SCALING_MENU[item], 0, true) {
                    self.settings.adc_raw_offset_amps = libm::rintf(v) as i16;
                }
            } else {
                self.keypad
                    .set_entry_value(self.settings.adc_raw_offset_volts as f32);
                if let Some(v) = self.keypad.entry(ui, SCALING_MENU[item], 0, true) {
                    self.settings.adc_raw_offset_volts = libm::rintf(v) as i16;
                }
            }
        }
        self.pages.draw_enabled(ui, true);
    }
}
