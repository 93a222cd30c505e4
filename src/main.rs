//! HomeLight Firmware — Main Entry Point
//!
//! Hexagonal architecture with a cooperative tick loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SerialLinkAdapter  WifiAdapter  MqttAdapter  LightPinAdapter  │
//! │  (LinkPort)         (NetworkPort)(BrokerPort) (LightPort)      │
//! │  Esp32TimeAdapter   LogEventSink                               │
//! │  (TimePort)         (EventSink)                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FrameAssembler · CommandRouter · Connectivity ·       │    │
//! │  │  TopicRegistry · LightController                       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use homelight::adapters::device_id;
use homelight::adapters::light_pin::LightPinAdapter;
use homelight::adapters::log_sink::LogEventSink;
use homelight::adapters::mqtt::MqttAdapter;
use homelight::adapters::serial_link::SerialLinkAdapter;
use homelight::adapters::time::Esp32TimeAdapter;
use homelight::adapters::wifi::WifiAdapter;
use homelight::app::ports::TimePort;
use homelight::app::service::AppService;
use homelight::config::SystemConfig;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    esp_idf_svc::sys::link_patches();
    #[cfg(target_os = "espidf")]
    esp_idf_logger::init()?;
    #[cfg(not(target_os = "espidf"))]
    env_logger_fallback();

    info!("╔══════════════════════════════════════╗");
    info!("║  HomeLight v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();

    // ── 2. Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    let dev_id = device_id::device_id(&mac);
    let link_name = device_id::hostname(&mac);
    info!("Device ID: {} (link: {})", dev_id, link_name);

    // ── 3. Construct adapters ─────────────────────────────────
    let mut link = SerialLinkAdapter::new(link_name)?;
    let mut wifi = WifiAdapter::new()?;
    let mut mqtt = MqttAdapter::new();
    let mut pin = LightPinAdapter::new();
    let time = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();

    // ── 4. Construct app service ──────────────────────────────
    let mut app = AppService::new(&config, dev_id.as_str().to_owned());
    app.apply_default_broker(&config, &mut mqtt, &mut sink);

    info!(
        "System ready. Pairing link '{}' listening; entering tick loop.",
        link.name()
    );

    // ── 5. Tick loop ──────────────────────────────────────────
    //
    // Single logical thread: every handler runs to completion inside
    // one tick; blocking waits (the WiFi join) happen inside dispatch
    // and simply stretch that tick.
    loop {
        app.tick(&mut link, &mut wifi, &mut mqtt, &mut pin, &time, &mut sink);
        time.sleep_ms(config.tick_interval_ms);
    }
}

// The binary normally builds only for the device target; this arm keeps
// `cargo run` usable for bench-top simulation.
#[cfg(not(target_os = "espidf"))]
fn env_logger_fallback() {
    // log output goes nowhere without a logger; stderr is fine here.
    struct StderrLogger;
    impl log::Log for StderrLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
        fn flush(&self) {}
    }
    static LOGGER: StderrLogger = StderrLogger;
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Info);
}
