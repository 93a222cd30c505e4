//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                    |
//! |---------------|--------------|--------------------------------|
//! | `serial_link` | LinkPort     | Pairing UART / in-memory sim   |
//! | `wifi`        | NetworkPort  | ESP-IDF WiFi STA               |
//! | `mqtt`        | BrokerPort   | MQTT client over TCP           |
//! | `light_pin`   | LightPort    | ESP32 GPIO output              |
//! | `log_sink`    | EventSink    | Serial log output              |
//! | `time`        | TimePort     | ESP32 system timer             |
//!
//! Every adapter carries a real implementation behind
//! `#[cfg(target_os = "espidf")]` and a simulation for host-side tests.

pub mod device_id;
pub mod light_pin;
pub mod log_sink;
pub mod mqtt;
pub mod serial_link;
pub mod time;
pub mod wifi;
