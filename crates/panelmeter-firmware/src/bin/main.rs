#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use rtt_target::rprintln;

use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::options::{ColorInversion, Orientation, Rotation};
use mipidsi::{models::ILI9341Rgb565, Builder as MipidsiBuilder};

use panelmeter_core::app::PanelApp;
use panelmeter_core::config::PanelConfig;
use panelmeter_core::modal::{DialogBox, DialogIcon};
use panelmeter_core::sampling::convert_pair;
use panelmeter_core::settings::{Settings, SettingsStore};
use panelmeter_core::ui::gfx::Gfx;
use panelmeter_core::ui::{EncoderCounter, EncoderSampler, TouchProvider, Ui};

use panelmeter_firmware::clock::SystemClock;
use panelmeter_firmware::flash_store::FlashStore;
use panelmeter_firmware::screen::Screen;
use panelmeter_firmware::xpt2046::Xpt2046;

/// Fitted hardware; flip when the rotary encoder is populated.
const HAS_ENCODER: bool = false;

/// Flash offset of the settings record (inside the reserved data
/// partition, clear of the app image).
const SETTINGS_FLASH_OFFSET: u32 = 0x9000;

/// Main loop cadence; the scope takes every second sample.
const UPDATE_PERIOD_MS: u64 = 35;
const SCOPE_PERIOD_MS: u64 = 70;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

/// Encoder counter shared with the sampling task.
static ENCODER: EncoderCounter = EncoderCounter::new();

/// Quadrature sampling at 2 ms; nothing but pin reads and a counter add
/// happens here, the display bus timing must not be disturbed.
#[embassy_executor::task]
async fn encoder_task(enc_a: Input<'static>, enc_b: Input<'static>) {
    let mut sampler = EncoderSampler::new();
    loop {
        let now = Instant::now().as_millis() as u32;
        let step = sampler.sample(enc_a.is_high(), enc_b.is_high(), now);
        if step != 0 {
            ENCODER.add(step);
        }
        Timer::after(Duration::from_millis(2)).await;
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_print!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 160 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    rprintln!("Embassy initialized!");

    // Display: ILI9341 over SPI2, CYD pin mapping.
    let spi_bus = Spi::new(
        peripherals.SPI2,
        SpiConfig::default().with_frequency(Rate::from_mhz(40)),
    )
    .unwrap()
    .with_sck(peripherals.GPIO14)
    .with_mosi(peripherals.GPIO13)
    .with_miso(peripherals.GPIO12);
    let display_cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, display_cs).unwrap();
    let dc = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());
    let mut spi_buffer = [0u8; 512];
    let di = SpiInterface::new(spi_device, dc, &mut spi_buffer);
    let display = MipidsiBuilder::new(ILI9341Rgb565, di)
        .display_size(240, 320)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .invert_colors(ColorInversion::Normal)
        .init(&mut embassy_time::Delay)
        .expect("Failed to initialize display");
    let mut backlight = Output::new(peripherals.GPIO21, Level::Low, OutputConfig::default());
    backlight.set_high();

    rprintln!("Display initialized!");

    // Touch digitizer: XPT2046 on its own SPI bus.
    let touch_spi = Spi::new(
        peripherals.SPI3,
        SpiConfig::default().with_frequency(Rate::from_mhz(2)),
    )
    .unwrap()
    .with_sck(peripherals.GPIO25)
    .with_mosi(peripherals.GPIO32)
    .with_miso(peripherals.GPIO39);
    let touch_cs = Output::new(peripherals.GPIO33, Level::High, OutputConfig::default());
    let touch_device = ExclusiveDevice::new_no_delay(touch_spi, touch_cs).unwrap();
    let touch = Xpt2046::new(touch_device);

    // ADC inputs: amps on GPIO35, volts on GPIO34.
    let mut adc_config = AdcConfig::new();
    let mut amps_pin = adc_config.enable_pin(peripherals.GPIO35, Attenuation::_11dB);
    let mut volts_pin = adc_config.enable_pin(peripherals.GPIO34, Attenuation::_11dB);
    let mut adc = Adc::new(peripherals.ADC1, adc_config);

    if HAS_ENCODER {
        let enc_a = Input::new(
            peripherals.GPIO22,
            InputConfig::default().with_pull(Pull::Up),
        );
        let enc_b = Input::new(
            peripherals.GPIO27,
            InputConfig::default().with_pull(Pull::Up),
        );
        spawner.spawn(encoder_task(enc_a, enc_b)).ok();
    }

    let panel_config = PanelConfig {
        has_encoder: HAS_ENCODER,
        ..PanelConfig::default()
    };
    let mut ui = Ui::new(
        Screen::new(display),
        TouchProvider::new(touch, &ENCODER),
        SystemClock,
        panel_config,
    );

    // Settings: flash record, defaults on first boot.
    let mut store = FlashStore::new(SETTINGS_FLASH_OFFSET);
    let settings = match store.load() {
        Ok(s) => s,
        Err(err) => {
            rprintln!("settings unavailable ({:?}), using defaults", err);
            DialogBox::modal(
                &mut ui,
                "No stored settings",
                "Defaults loaded",
                DialogIcon::Info,
                false,
            );
            Settings::default()
        }
    };

    let mut app = PanelApp::new(settings, &panel_config);
    app.start(&mut ui);
    ui.gfx.present();

    rprintln!("Panel running");

    let mut last_scope = Instant::now();
    loop {
        let raw_amps = nb::block!(adc.read_oneshot(&mut amps_pin)).unwrap_or(0) as i32;
        let raw_volts = nb::block!(adc.read_oneshot(&mut volts_pin)).unwrap_or(0) as i32;
        let samples = convert_pair(raw_amps, raw_volts, app.settings());

        let scope_tick = last_scope.elapsed() >= Duration::from_millis(SCOPE_PERIOD_MS);
        if scope_tick {
            last_scope = Instant::now();
        }

        app.tick(&mut ui, &mut store, samples, scope_tick);
        ui.gfx.present();

        Timer::after(Duration::from_millis(UPDATE_PERIOD_MS)).await;
    }
}
