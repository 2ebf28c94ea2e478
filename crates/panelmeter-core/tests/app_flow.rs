//! End-to-end panel scenarios: scripted touches through the full
//! dispatch / event / page-transition path.

use panelmeter_core::app::PanelApp;
use panelmeter_core::config::PanelConfig;
use panelmeter_core::mocks::{test_ui, CountingGfx, MemoryStore, ScriptedTouch, TestClock};
use panelmeter_core::pages::InstrState;
use panelmeter_core::sampling::SamplePair;
use panelmeter_core::settings::Settings;
use panelmeter_core::ui::Ui;

type TestUi = Ui<CountingGfx, ScriptedTouch, TestClock>;

fn idle_tick(app: &mut PanelApp, ui: &mut TestUi, store: &mut MemoryStore) {
    app.tick(ui, store, SamplePair::default(), false);
}

#[test]
fn wipe_setup_tab_exit_round_trip() {
    // one press per tick: two held samples then release
    let script = ScriptedTouch::new(&[
        // t1: right wipe zone
        Some((300, 100)),
        Some((300, 100)),
        None,
        // t2: idle
        None,
        // t3: setup button
        Some((160, 218)),
        Some((160, 218)),
        None,
        // t4: second tab
        Some((160, 220)),
        Some((160, 220)),
        None,
        // t5: exit button
        Some((250, 60)),
        Some((250, 60)),
        None,
    ]);
    let mut ui = test_ui(script, PanelConfig::default());
    let mut store = MemoryStore::new();
    let mut app = PanelApp::new(Settings::default(), &PanelConfig::default());

    app.start(&mut ui);
    assert_eq!(app.state(), InstrState::Meter);

    idle_tick(&mut app, &mut ui, &mut store); // wipe
    assert_eq!(app.state(), InstrState::Bargraph);

    idle_tick(&mut app, &mut ui, &mut store); // idle
    assert_eq!(app.state(), InstrState::Bargraph);

    idle_tick(&mut app, &mut ui, &mut store); // setup button
    assert_eq!(app.state(), InstrState::Setup);

    idle_tick(&mut app, &mut ui, &mut store); // tab press stays on setup
    assert_eq!(app.state(), InstrState::Setup);

    idle_tick(&mut app, &mut ui, &mut store); // exit
    assert_eq!(app.state(), InstrState::Meter);
}

#[test]
fn range_switch_updates_settings() {
    let script = ScriptedTouch::new(&[Some((38, 218)), Some((38, 218)), None]);
    let mut ui = test_ui(script, PanelConfig::default());
    let mut store = MemoryStore::new();
    let mut app = PanelApp::new(Settings::default(), &PanelConfig::default());
    app.start(&mut ui);

    assert!(!app.settings().amp_hi_range_on);
    idle_tick(&mut app, &mut ui, &mut store);
    assert!(app.settings().amp_hi_range_on);
    assert_eq!(app.settings().amp_range_idx, 3);
}

#[test]
fn save_button_writes_the_settings_record() {
    let script = ScriptedTouch::new(&[
        // open setup
        Some((160, 218)),
        Some((160, 218)),
        None,
        // press SAVE
        Some((250, 25)),
        Some((250, 25)),
        None,
    ]);
    let mut ui = test_ui(script, PanelConfig::default());
    let mut store = MemoryStore::new();
    let mut app = PanelApp::new(Settings::default(), &PanelConfig::default());
    app.start(&mut ui);

    idle_tick(&mut app, &mut ui, &mut store);
    assert_eq!(app.state(), InstrState::Setup);
    idle_tick(&mut app, &mut ui, &mut store);
    assert_eq!(store.save_count, 1);
    let saved = Settings::from_bytes(store.saved.as_ref().unwrap()).unwrap();
    assert_eq!(&saved, app.settings());
}

#[test]
fn numeric_tap_swaps_the_measurement_channels() {
    let script = ScriptedTouch::new(&[Some((250, 210)), Some((250, 210)), None]);
    let mut ui = test_ui(script, PanelConfig::default());
    let mut store = MemoryStore::new();
    let mut app = PanelApp::new(Settings::default(), &PanelConfig::default());
    app.start(&mut ui);

    // tapping the secondary readout re-initializes the meter page for the
    // other channel; the page itself stays
    idle_tick(&mut app, &mut ui, &mut store);
    assert_eq!(app.state(), InstrState::Meter);
}
