//! SteriCab Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single control loop over two
//! interrupt-priority contexts (1 kHz tick timer, UART receive task).
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter                 LogEventSink    LogDisplay  │
//! │  (Sensor+Actuator+Keypad+Link)   (EventSink)     (Display)   │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              AppService (pure logic)                   │  │
//! │  │  dispatch · mode policies · frame codec                │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  TickScheduler (1 kHz timer) · link-rx task (decoder feed)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod dispatch;
mod error;
mod events;
mod link;
mod mode;
mod pins;
mod tick;

pub mod app;
mod adapters;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use adapters::display::LogDisplay;
use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use app::service::AppService;
use config::SystemConfig;
use drivers::buzzer::BuzzerDriver;
use drivers::fan::FanDriver;
use drivers::keypad::KeypadScanner;
use drivers::lamp::LampDriver;
use drivers::motor::MotorDriver;
use drivers::servo::ServoDriver;
use drivers::watchdog::Watchdog;
use sensors::dht::DhtProbe;
use sensors::proximity::ProximitySensor;
use sensors::uv::UvSensor;
use sensors::SensorHub;
use tick::TICK;

/// Pause between main-loop passes. Keeps the keypad poll cadence well
/// inside the debounce window and yields to the receive task and idle
/// task between passes.
const PASS_SLEEP_MS: u64 = 10;

/// Main-loop stall budget for the task watchdog. Two orders of
/// magnitude above the worst normal pass (climate probe transfer plus
/// one telemetry frame).
const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SteriCab v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    // No persistent store on this board; the compiled-in defaults are
    // the shipped policy. Validate anyway so a bad edit fails loudly.
    let config = SystemConfig::default();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("configuration rejected: {e}"))?;

    // ── 3. Peripheral bring-up ────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical. Halting here starves the
        // idle task, so the TWDT resets the device after its timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = drivers::uart::init() {
        log::error!("link UART init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    drivers::uart::start_rx_task();
    drivers::hw_timer::start_tick_timer();
    let watchdog = Watchdog::subscribe(WATCHDOG_TIMEOUT_MS);

    // ── 4. Construct adapters ─────────────────────────────────
    let sensor_hub = SensorHub::new(
        DhtProbe::new(pins::DHT_GPIO),
        UvSensor::new(pins::UV_ADC_GPIO, config.uv_sample_count),
        ProximitySensor::new(pins::PROXIMITY_GPIO),
    );

    let mut hw = HardwareAdapter::new(
        sensor_hub,
        FanDriver::new(),
        LampDriver::new(),
        BuzzerDriver::new(),
        MotorDriver::new(),
        ServoDriver::new(),
        KeypadScanner::new(),
    );

    let mut display = LogDisplay::new();
    let mut sink = LogEventSink::new();

    // ── 5. Construct and start the app service ────────────────
    let mut app = AppService::new(config);
    app.start(&mut sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        app.run_pass(&mut hw, &mut display, &mut sink, &TICK);
        watchdog.feed();
        std::thread::sleep(std::time::Duration::from_millis(PASS_SLEEP_MS));
    }
}
