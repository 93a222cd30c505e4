//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (serial link, WiFi driver, MQTT client, GPIO pin)
//! implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics, so the dispatch core never touches a real
//! transport.
//!
//! ## Concurrency note
//!
//! Everything behind these traits is called from the single cooperative
//! tick loop — implementations may assume exclusive access and must not
//! invoke domain callbacks of their own. Inbound broker messages are
//! *pulled* via [`BrokerPort::poll_message`], never pushed.

use crate::protocol::NetworkInfo;

// ───────────────────────────────────────────────────────────────
// Local pairing link (byte stream)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented local pairing transport (short-range serial link).
pub trait LinkPort {
    /// Pop the next available inbound byte, if any. Non-blocking.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue outbound bytes. Best effort — a failed write is logged by
    /// the adapter, never surfaced to the dispatch core.
    fn write_all(&mut self, bytes: &[u8]);
}

// ───────────────────────────────────────────────────────────────
// Network (WiFi station)
// ───────────────────────────────────────────────────────────────

/// Station-mode network driver.
pub trait NetworkPort {
    /// Start joining the given network. Non-blocking; completion is
    /// observed by polling [`is_connected`](Self::is_connected).
    fn begin_join(&mut self, ssid: &str, psk: &str);

    fn is_connected(&self) -> bool;

    /// Blocking scan for nearby access points.
    fn scan(&mut self) -> Vec<NetworkInfo>;
}

// ───────────────────────────────────────────────────────────────
// Broker (publish/subscribe client)
// ───────────────────────────────────────────────────────────────

/// One message pulled off the broker transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPublish {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Publish/subscribe broker client.
pub trait BrokerPort {
    /// Record the broker endpoint for subsequent connect attempts.
    fn set_endpoint(&mut self, host: &str, port: u16);

    /// One synchronous connect attempt with the given client id.
    fn connect(&mut self, client_id: &str) -> bool;

    fn is_connected(&self) -> bool;

    fn subscribe(&mut self, topic: &str) -> bool;

    fn unsubscribe(&mut self, topic: &str);

    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool;

    /// Pull the next pending inbound message, if any. Non-blocking.
    fn poll_message(&mut self) -> Option<InboundPublish>;
}

// ───────────────────────────────────────────────────────────────
// Light output
// ───────────────────────────────────────────────────────────────

/// Write-side port for the light's physical output.
pub trait LightPort {
    fn set_on(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic clock plus the one blocking wait the core is allowed.
pub trait TimePort {
    /// Milliseconds since boot (monotonic).
    fn now_ms(&self) -> u64;

    /// Block the tick loop. Used only by the bounded network-join poll.
    fn sleep_ms(&self, ms: u64);
}

// ───────────────────────────────────────────────────────────────
// Event sink (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, status
/// topic, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
