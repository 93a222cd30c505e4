//! System configuration parameters
//!
//! All tunable parameters for the HomeLight agent. Defaults match the
//! documented pairing and control protocol limits.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Local link ---
    /// Maximum pairing frame size in bytes; excess bytes are dropped
    pub link_frame_max_bytes: usize,
    /// Inactivity gap (ms) after which a partial frame is discarded
    pub link_stale_ms: u64,

    // --- WiFi ---
    /// Blocking network-join timeout (ms)
    pub wifi_join_timeout_ms: u64,
    /// Poll interval while waiting for the join to complete (ms)
    pub wifi_poll_interval_ms: u64,

    // --- Broker ---
    /// Minimum spacing between broker connect attempts (ms)
    pub broker_retry_interval_ms: u64,
    /// Default broker endpoint applied at startup, if any
    pub default_broker: Option<BrokerEndpoint>,

    // --- Status publication ---
    /// Interval for the periodic status publication (ms)
    pub status_publish_interval_ms: u64,

    // --- Main loop ---
    /// Sleep between cooperative ticks in the host loop (ms)
    pub tick_interval_ms: u64,
}

/// A broker host/port pair. "Not yet configured" is `None` at the use
/// site, never an empty host string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            link_frame_max_bytes: 4096,
            link_stale_ms: 3000,

            wifi_join_timeout_ms: 30_000,
            wifi_poll_interval_ms: 500,

            broker_retry_interval_ms: 5000,
            default_broker: Some(BrokerEndpoint {
                host: "broker.hivemq.com".into(),
                port: 1883,
            }),

            status_publish_interval_ms: 60_000,

            tick_interval_ms: 10,
        }
    }
}
