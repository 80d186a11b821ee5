//! Heat Press Timer Firmware: Main Entry Point
//!
//! Three pinned tasks joined by lock-free links.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Hx711 (LoadCellPort)   Keypad (InputPort)   SystemClock       │
//! │  ConsolePresenter (Presenter)                                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌──────────────┐   ┌──────────────────────┐   ┌────────────┐  │
//! │  │ SensorTask   │──▶│ ControllerTask       │──▶│ UI task    │  │
//! │  │ core 0, p2   │◀──│ PressTimer (FSM)     │◀──│ core 1, p3 │  │
//! │  └──────────────┘   │ core 0, p2           │   └────────────┘  │
//! │                     └──────────────────────┘                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
use log::info;

use presstimer::adapters::console::ConsolePresenter;
use presstimer::adapters::time::SystemClock;
use presstimer::channels::{Links, LINKS};
use presstimer::config::SystemConfig;
use presstimer::drivers::button::Keypad;
use presstimer::drivers::hx711::Hx711;
use presstimer::pins;
use presstimer::tasks::controller::ControllerTask;
use presstimer::tasks::presentation::PresentationTask;
use presstimer::tasks::sensor::SensorTask;
use presstimer::tasks::spawn::{spawn_task, TaskSpec};

// ── Pin helpers ───────────────────────────────────────────────

/// Active-low key input with the internal pull-up enabled.
fn key_pin(gpio: i32) -> Result<PinDriver<'static, AnyIOPin, Input>> {
    // SAFETY: each GPIO number in `pins` is claimed exactly once below.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(Pull::Up)?;
    Ok(pin)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PressTimer v{}                   ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Peripherals ────────────────────────────────────────
    // SAFETY: HX711 pins are not used anywhere else.
    let dout = PinDriver::input(unsafe { AnyIOPin::new(pins::HX711_DOUT_GPIO) })?;
    let sck = PinDriver::output(unsafe { AnyIOPin::new(pins::HX711_SCK_GPIO) })?;
    let load_cell = Hx711::new(dout, sck, Ets, &config);

    let keypad = Keypad::new(
        key_pin(pins::KEY_PLUS_GPIO)?,
        key_pin(pins::KEY_MINUS_GPIO)?,
        key_pin(pins::KEY_TARE_GPIO)?,
        key_pin(pins::KEY_ACK_GPIO)?,
    );
    let presenter = ConsolePresenter::new(&config, keypad);

    // ── 4. Tasks ──────────────────────────────────────────────
    let links: &'static Links = &LINKS;
    let clock = SystemClock::new();

    let sensor = SensorTask::new(load_cell, &config);
    spawn_task(TaskSpec::SENSOR, move || {
        sensor.run(links, &clock);
    })?;

    let controller = ControllerTask::new(config.clone());
    spawn_task(TaskSpec::CONTROLLER, move || {
        controller.run(links, &clock);
    })?;

    let ui = PresentationTask::new(presenter, config.ui_refresh_period_ms);
    spawn_task(TaskSpec::PRESENTATION, move || {
        ui.run(links, &clock);
    })?;

    info!("All tasks running");

    // Tasks never return; the main task has nothing left to do.
    loop {
        std::thread::park();
    }
}
