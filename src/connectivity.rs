//! Connectivity manager — staged bring-up and reconnect policy.
//!
//! Owns the [`ConnectionStage`] ladder:
//!
//! ```text
//!   Disconnected → NetworkJoining → NetworkJoined
//!                → BrokerConnecting → BrokerConnected → TopicsSubscribed
//! ```
//!
//! Forward progress only on success; a failed stage falls back to the
//! last stable stage. The two halves have deliberately different failure
//! semantics:
//!
//! - **Network join** is bounded and surfaced — the blocking
//!   [`connect_network`](ConnectivityManager::connect_network) polls the
//!   driver every `poll_ms` up to a timeout and reports the outcome to
//!   the caller. No automatic retry.
//! - **Broker connect** is silent and retried forever — recording an
//!   endpoint always "succeeds"; the actual handshake happens inside the
//!   periodic [`poll`](ConnectivityManager::poll), rate-limited to one
//!   attempt per retry interval, and failures are only observable through
//!   connectivity queries.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{BrokerPort, EventSink, NetworkPort, TimePort};
use crate::config::BrokerEndpoint;
use crate::registry::TopicRegistry;

/// Client-id prefix for broker sessions; a random hex nonce is appended
/// so a stale half-open session from a previous boot cannot collide.
pub const CLIENT_ID_PREFIX: &str = "homelight";

/// Discrete steps of the connectivity bring-up. Ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionStage {
    Disconnected,
    NetworkJoining,
    NetworkJoined,
    BrokerConnecting,
    BrokerConnected,
    TopicsSubscribed,
}

pub struct ConnectivityManager {
    stage: ConnectionStage,
    endpoint: Option<BrokerEndpoint>,
    /// Timestamp of the last broker connect attempt; `None` = never,
    /// so the first eligible poll may attempt immediately.
    last_attempt_ms: Option<u64>,
    retry_interval_ms: u64,
}

impl ConnectivityManager {
    pub fn new(retry_interval_ms: u64) -> Self {
        Self {
            stage: ConnectionStage::Disconnected,
            endpoint: None,
            last_attempt_ms: None,
            retry_interval_ms,
        }
    }

    pub fn stage(&self) -> ConnectionStage {
        self.stage
    }

    pub fn broker_endpoint(&self) -> Option<&BrokerEndpoint> {
        self.endpoint.as_ref()
    }

    // ── Network join (bounded, surfaced) ──────────────────────

    /// Join a network, blocking up to `timeout_ms` while polling the
    /// driver every `poll_ms`. Returns the outcome; never panics, never
    /// retries on its own.
    pub fn connect_network(
        &mut self,
        net: &mut impl NetworkPort,
        time: &impl TimePort,
        sink: &mut impl EventSink,
        ssid: &str,
        psk: &str,
        timeout_ms: u64,
        poll_ms: u64,
    ) -> bool {
        let prior = self.stage;
        self.set_stage(ConnectionStage::NetworkJoining, sink);
        info!("wifi: joining '{ssid}' (timeout {timeout_ms}ms)");

        net.begin_join(ssid, psk);
        let deadline = time.now_ms().saturating_add(timeout_ms);
        loop {
            if net.is_connected() {
                info!("wifi: joined '{ssid}'");
                self.set_stage(ConnectionStage::NetworkJoined, sink);
                return true;
            }
            if time.now_ms() >= deadline {
                break;
            }
            time.sleep_ms(poll_ms);
        }

        warn!("wifi: join '{ssid}' timed out");
        // Fall back to wherever we were before the attempt.
        self.set_stage(prior, sink);
        false
    }

    // ── Broker endpoint (intent only) ─────────────────────────

    /// Record the broker endpoint. Non-blocking: the handshake is owned
    /// by [`poll`](Self::poll), so this always reports success.
    pub fn connect_broker(
        &mut self,
        broker: &mut impl BrokerPort,
        sink: &mut impl EventSink,
        host: &str,
        port: u16,
    ) -> bool {
        info!("broker: endpoint set to {host}:{port}");
        broker.set_endpoint(host, port);
        self.endpoint = Some(BrokerEndpoint {
            host: host.to_owned(),
            port,
        });
        // Eligible for an immediate attempt on the next poll.
        self.last_attempt_ms = None;
        if self.stage >= ConnectionStage::NetworkJoined {
            self.set_stage(ConnectionStage::BrokerConnecting, sink);
        }
        true
    }

    /// Record that a subscription was just issued on a live connection,
    /// advancing `BrokerConnected` to `TopicsSubscribed`. The register
    /// path calls this; the reconnect poll derives the same stage on its
    /// own after a replay.
    pub fn note_topics_subscribed(&mut self, sink: &mut impl EventSink) {
        if self.stage == ConnectionStage::BrokerConnected {
            self.set_stage(ConnectionStage::TopicsSubscribed, sink);
        }
    }

    // ── Reconnect poll (transient, retried) ───────────────────

    /// One reconnect check, called once per scheduling pass.
    ///
    /// When an endpoint is configured and the transport is down, attempt
    /// a connect at most once per retry interval. On success, replay
    /// every registry subscription and advance the stage; on failure,
    /// log and wait for the next eligible tick.
    pub fn poll(
        &mut self,
        now_ms: u64,
        broker: &mut impl BrokerPort,
        registry: &mut TopicRegistry,
        sink: &mut impl EventSink,
    ) {
        if self.endpoint.is_none() {
            return;
        }
        if broker.is_connected() {
            return;
        }

        // Transport dropped underneath us — fall back one stage.
        if self.stage > ConnectionStage::BrokerConnecting {
            warn!("broker: connection lost, entering reconnect");
            self.set_stage(ConnectionStage::BrokerConnecting, sink);
        }

        if let Some(last) = self.last_attempt_ms {
            if now_ms.saturating_sub(last) < self.retry_interval_ms {
                return;
            }
        }
        self.last_attempt_ms = Some(now_ms);

        let client_id = random_client_id();
        info!("broker: connecting as '{client_id}'");
        if broker.connect(&client_id) {
            info!("broker: connected, replaying subscriptions");
            registry.resubscribe_all(broker);
            let stage = if registry.subscription_count() > 0 {
                ConnectionStage::TopicsSubscribed
            } else {
                ConnectionStage::BrokerConnected
            };
            self.set_stage(stage, sink);
        } else {
            warn!(
                "broker: connect failed, retrying in {}ms",
                self.retry_interval_ms
            );
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_stage(&mut self, to: ConnectionStage, sink: &mut impl EventSink) {
        if self.stage != to {
            let from = self.stage;
            self.stage = to;
            sink.emit(&AppEvent::StageChanged { from, to });
        }
    }
}

/// `"homelight-"` plus a random hex nonce.
pub fn random_client_id() -> String {
    format!("{CLIENT_ID_PREFIX}-{:04x}", random_nonce())
}

#[cfg(target_os = "espidf")]
fn random_nonce() -> u16 {
    (unsafe { esp_idf_svc::sys::esp_random() } & 0xffff) as u16
}

/// Simulation: nonce from the wall-clock sub-second, unique enough to
/// avoid client-id collisions against a local test broker.
#[cfg(not(target_os = "espidf"))]
fn random_nonce() -> u16 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| (d.subsec_nanos() & 0xffff) as u16)
        .unwrap_or(0)
}
