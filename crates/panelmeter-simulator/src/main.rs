//! Desktop simulator for the panelmeter-rs instrument UI.
//!
//! Renders the panel in an SDL2 window via `embedded-graphics-simulator`
//! and feeds it synthetic measurement waveforms so every page can be
//! exercised without hardware. Mouse clicks act as the touch digitizer;
//! the event pump lives inside the digitizer so the blocking widget loops
//! keep seeing button-up events.
//!
//! # Key bindings
//!
//! | Key   | Action                   |
//! |-------|--------------------------|
//! | Right | Next measurement page    |
//! | Left  | Previous measurement page|
//! | S     | Setup page               |
//! | Q     | Quit                     |

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    sdl2::Keycode, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::info;

use panelmeter_core::app::PanelApp;
use panelmeter_core::config::PanelConfig;
use panelmeter_core::framebuffer::FrameBuffer;
use panelmeter_core::sampling::convert_pair;
use panelmeter_core::settings::{Settings, SettingsError, SettingsStore};
use panelmeter_core::ui::gfx::{Datum, FontId, Gfx, Rect};
use panelmeter_core::ui::{
    Clock, EncoderCounter, TouchDigitizer, TouchProvider, Ui, UiEvent, WidgetTag,
    DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX,
};

const WINDOW_SCALE: u32 = 2;
const FRAME_DURATION: Duration = Duration::from_millis(35);

static ENCODER: EncoderCounter = EncoderCounter::new();

// ---------------------------------------------------------------------------
// Input bridge
// ---------------------------------------------------------------------------

/// State shared between the digitizer (which pumps SDL events) and the
/// main loop (which consumes key presses and the quit flag).
struct SharedInput {
    window: RefCell<Window>,
    pressed: Cell<Option<(u16, u16)>>,
    key: Cell<Option<Keycode>>,
    quit: Cell<bool>,
}

/// Mouse-as-touch digitizer. Every read pumps the SDL event queue so
/// release events reach the blocking wait-for-release loops.
struct MouseTouch {
    shared: Rc<SharedInput>,
}

impl TouchDigitizer for MouseTouch {
    fn read(&mut self) -> Option<(u16, u16)> {
        let mut window = self.shared.window.borrow_mut();
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => self.shared.quit.set(true),
                SimulatorEvent::KeyDown { keycode, .. } => self.shared.key.set(Some(keycode)),
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let x = point.x.clamp(0, DISPLAY_WIDTH_PX as i32 - 1) as u16;
                    let y = point.y.clamp(0, DISPLAY_HEIGHT_PX as i32 - 1) as u16;
                    self.shared.pressed.set(Some((x, y)));
                }
                SimulatorEvent::MouseButtonUp { .. } => self.shared.pressed.set(None),
                _ => {}
            }
        }
        self.shared.pressed.get()
    }
}

/// Framebuffer bridged to the SDL window: `present` flushes the dirty
/// region into the simulator display and refreshes the window, keeping
/// blocking widget loops visually live.
struct SimScreen {
    fb: FrameBuffer,
    display: SimulatorDisplay<Rgb565>,
    shared: Rc<SharedInput>,
}

impl Gfx for SimScreen {
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) {
        self.fb.fill_rect(rect, color);
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) {
        self.fb.draw_rect(rect, color);
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.fb.draw_hline(x, y, w, color);
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.fb.draw_vline(x, y, h, color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        self.fb.draw_line(x0, y0, x1, y1, color);
    }

    fn draw_wide_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: u32, color: Rgb565) {
        self.fb.draw_wide_line(x0, y0, x1, y1, width, color);
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        self.fb.fill_circle(cx, cy, r, color);
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgb565) {
        self.fb.draw_circle(cx, cy, r, color);
    }

    fn fill_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        self.fb.fill_triangle(p, color);
    }

    fn draw_triangle(&mut self, p: [(i32, i32); 3], color: Rgb565) {
        self.fb.draw_triangle(p, color);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        self.fb.fill_round_rect(rect, radius, color);
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: i32, color: Rgb565) {
        self.fb.draw_round_rect(rect, radius, color);
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: FontId,
        datum: Datum,
        fg: Rgb565,
        bg: Option<Rgb565>,
    ) {
        self.fb.draw_text(text, x, y, font, datum, fg, bg);
    }

    fn read_rect(&mut self, rect: Rect) -> Vec<Rgb565> {
        self.fb.read_rect(rect)
    }

    fn push_rect(&mut self, rect: Rect, pixels: &[Rgb565]) {
        self.fb.push_rect(rect, pixels);
    }

    fn text_width(&self, text: &str, font: FontId) -> i32 {
        self.fb.text_width(text, font)
    }

    fn present(&mut self) {
        self.fb.flush(&mut self.display).unwrap();
        self.shared.window.borrow_mut().update(&self.display);
    }
}

/// Wall-clock implementation of the core clock trait.
#[derive(Clone, Copy)]
struct StdClock {
    start: Instant,
}

impl StdClock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    fn delay_ms(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

// ---------------------------------------------------------------------------
// Settings persistence
// ---------------------------------------------------------------------------

/// Settings record in a local file, standing in for the flash partition.
struct FileStore {
    path: std::path::PathBuf,
}

impl FileStore {
    fn new() -> Self {
        Self {
            path: std::path::PathBuf::from("panelmeter-settings.bin"),
        }
    }
}

impl SettingsStore for FileStore {
    fn load(&mut self) -> Result<Settings, SettingsError> {
        let bytes = std::fs::read(&self.path).map_err(|_| SettingsError::Missing)?;
        Settings::from_bytes(&bytes)
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        let bytes = settings.to_bytes()?;
        std::fs::write(&self.path, bytes).map_err(|_| SettingsError::Storage)
    }
}

// ---------------------------------------------------------------------------
// Signal generator
// ---------------------------------------------------------------------------

/// Synthetic ADC counts: a slow swell on the current channel and a
/// ripple-laden level on the voltage channel.
struct SignalGenerator {
    t: f64,
}

impl SignalGenerator {
    fn new() -> Self {
        Self { t: 0.0 }
    }

    fn next_raw(&mut self, dt: f64) -> (i32, i32) {
        self.t += dt;
        let amps = 1800.0 + 1500.0 * (self.t / 4.0).sin() + 120.0 * (self.t * 3.1).sin();
        let volts = 2400.0 + 600.0 * (self.t / 9.0).sin() + 40.0 * (self.t * 7.3).cos();
        (amps.max(0.0) as i32, volts.max(0.0) as i32)
    }
}

// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();

    let display = SimulatorDisplay::<Rgb565>::new(Size::new(
        DISPLAY_WIDTH_PX as u32,
        DISPLAY_HEIGHT_PX as u32,
    ));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let window = Window::new("Panel Meter Simulator", &output_settings);

    let shared = Rc::new(SharedInput {
        window: RefCell::new(window),
        pressed: Cell::new(None),
        key: Cell::new(None),
        quit: Cell::new(false),
    });
    let touch = MouseTouch {
        shared: Rc::clone(&shared),
    };

    let screen = SimScreen {
        fb: FrameBuffer::new(),
        display,
        shared: Rc::clone(&shared),
    };
    let config = PanelConfig::default();
    let mut ui = Ui::new(
        screen,
        TouchProvider::new(touch, &ENCODER),
        StdClock::new(),
        config,
    );

    let mut store = FileStore::new();
    let settings = store.load().unwrap_or_else(|err| {
        info!("no stored settings ({err}), using defaults");
        Settings::default()
    });

    let mut app = PanelApp::new(settings, &config);
    app.start(&mut ui);
    ui.gfx.present();

    info!("simulator running");

    let mut generator = SignalGenerator::new();
    let mut scope_toggle = false;
    loop {
        if shared.quit.get() {
            break;
        }
        if let Some(key) = shared.key.take() {
            match key {
                Keycode::Right => ui.events.push(UiEvent::Pressed {
                    tag: WidgetTag::RightWipe,
                }),
                Keycode::Left => ui.events.push(UiEvent::Pressed {
                    tag: WidgetTag::LeftWipe,
                }),
                Keycode::S => ui.events.push(UiEvent::Pressed {
                    tag: WidgetTag::SetupBtn,
                }),
                Keycode::Q => break,
                _ => {}
            }
        }

        let (raw_amps, raw_volts) = generator.next_raw(FRAME_DURATION.as_secs_f64());
        let samples = convert_pair(raw_amps, raw_volts, app.settings());
        scope_toggle = !scope_toggle;

        app.tick(&mut ui, &mut store, samples, scope_toggle);
        ui.gfx.present();

        std::thread::sleep(FRAME_DURATION);
    }
}
