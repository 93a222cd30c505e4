//! Pairing-command router.
//!
//! Takes one assembled local-link frame, decodes it softly, dispatches
//! the action, and produces the serialized response. The contract is
//! deliberately forgiving (untrusted phone apps drive it mid-pairing):
//! missing fields default to their zero values and an undecodable frame
//! becomes the empty request — the reply is always a well-formed record,
//! worst case `{"success":false}`.
//!
//! Dispatch shape mirrors the wire protocol:
//!
//! - `getId` / `wifiStatus` / `scanWifi` short-circuit with their own
//!   result fields and no generic envelope afterward.
//! - The mutating actions (`connectWifi`, `registerBroker`, `register`,
//!   `toggle`) are evaluated in order and share a single
//!   `{reqId, success}` envelope; `success` reflects the last action
//!   evaluated, so callers should send one action per message.

use log::info;

use crate::connectivity::ConnectivityManager;
use crate::light::LightController;
use crate::protocol::{PairingRequest, PairingResponse};
use crate::registry::{StatusProducer, TopicHandler, TopicRegistry};

use super::events::AppEvent;
use super::ports::{BrokerPort, EventSink, LightPort, NetworkPort, TimePort};

pub struct CommandRouter {
    device_id: String,
    wifi_join_timeout_ms: u64,
    wifi_poll_interval_ms: u64,
    status_publish_interval_ms: u64,
}

impl CommandRouter {
    pub fn new(
        device_id: String,
        wifi_join_timeout_ms: u64,
        wifi_poll_interval_ms: u64,
        status_publish_interval_ms: u64,
    ) -> Self {
        Self {
            device_id,
            wifi_join_timeout_ms,
            wifi_poll_interval_ms,
            status_publish_interval_ms,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Dispatch one raw frame, returning the serialized response
    /// (without the newline terminator — the link adapter owns framing).
    #[allow(clippy::too_many_arguments)] // one argument per port, by construction
    pub fn dispatch(
        &self,
        raw: &[u8],
        conn: &mut ConnectivityManager,
        registry: &mut TopicRegistry,
        light: &mut LightController,
        net: &mut impl NetworkPort,
        broker: &mut impl BrokerPort,
        pin: &mut impl LightPort,
        time: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> Vec<u8> {
        info!("pairing: request {}", String::from_utf8_lossy(raw));
        let req = PairingRequest::decode(raw);
        let action = req.action().to_owned();
        let req_id = req.req_id.clone();

        // ── Query actions: immediate response, no generic envelope ──
        match action.as_str() {
            "getId" => {
                let mut resp = PairingResponse::envelope(req_id, true);
                resp.device_id = Some(self.device_id.clone());
                return self.finish(&action, resp, sink);
            }
            "wifiStatus" => {
                let mut resp = PairingResponse::envelope(req_id, true);
                resp.connected = Some(net.is_connected());
                return self.finish(&action, resp, sink);
            }
            "scanWifi" => {
                // Blocking scan; bounded by the driver, accepted stall.
                let mut resp = PairingResponse::envelope(req_id, true);
                resp.networks = Some(net.scan());
                return self.finish(&action, resp, sink);
            }
            _ => {}
        }

        // ── Mutating actions: shared envelope, last match wins ──
        let mut success = false;

        if action == "connectWifi" {
            let ssid = req.ssid.as_deref().unwrap_or("");
            let psk = req.psk.as_deref().unwrap_or("");
            success = if ssid.is_empty() {
                false
            } else {
                conn.connect_network(
                    net,
                    time,
                    sink,
                    ssid,
                    psk,
                    self.wifi_join_timeout_ms,
                    self.wifi_poll_interval_ms,
                )
            };
        }

        if action == "registerBroker" {
            let host = req.broker.as_deref().unwrap_or("");
            let port = req.port.unwrap_or(0);
            success = if host.is_empty() || port == 0 {
                false
            } else {
                conn.connect_broker(broker, sink, host, port)
            };
        }

        if action == "register" {
            let command_topic = req.command_topic.as_deref().unwrap_or("");
            let status_topic = req.status_topic.as_deref().unwrap_or("");
            success = if command_topic.is_empty() || status_topic.is_empty() {
                false
            } else {
                self.register_topics(command_topic, status_topic, conn, registry, broker, sink);
                true
            };
        }

        if action == "toggle" {
            let on = req.on.unwrap_or(false);
            let changed = if on {
                light.turn_on(pin)
            } else {
                light.turn_off(pin)
            };
            if changed {
                report_light_change(light, registry, broker, time.now_ms(), &self.device_id, sink);
            }
            success = true;
        }

        self.finish(&action, PairingResponse::envelope(req_id, success), sink)
    }

    /// Rebind the command and status topics (the canonical registration
    /// protocol). Replacing the command topic with a new name drops the
    /// old subscription, unsubscribing on the wire when connected. A
    /// subscription landing on a live connection completes the stage
    /// ladder.
    fn register_topics(
        &self,
        command_topic: &str,
        status_topic: &str,
        conn: &mut ConnectivityManager,
        registry: &mut TopicRegistry,
        broker: &mut impl BrokerPort,
        sink: &mut impl EventSink,
    ) {
        let old_cmd = registry
            .topic_for(TopicHandler::LightCommand)
            .map(str::to_owned);
        if let Some(old) = old_cmd.filter(|old| old != command_topic) {
            registry.remove(&old, broker);
        }
        registry.subscribe(command_topic, TopicHandler::LightCommand, broker);
        if broker.is_connected() {
            conn.note_topics_subscribed(sink);
        }

        let old_status = registry
            .periodic_topic(StatusProducer::LightState)
            .map(str::to_owned);
        if let Some(old) = old_status.filter(|old| old != status_topic) {
            registry.remove_periodic(&old);
        }
        registry.add_periodic(
            status_topic,
            self.status_publish_interval_ms,
            StatusProducer::LightState,
        );
    }

    fn finish(&self, action: &str, resp: PairingResponse, sink: &mut impl EventSink) -> Vec<u8> {
        sink.emit(&AppEvent::PairingHandled {
            action: action.to_owned(),
            success: resp.success,
        });
        resp.encode()
    }
}

/// Publish the light's state on the registered status topic, stamping
/// the periodic entry so the interval clock restarts from this change.
/// Shared by the local-link `toggle` path and the broker command path.
pub(crate) fn report_light_change(
    light: &LightController,
    registry: &mut TopicRegistry,
    broker: &mut impl BrokerPort,
    now_ms: u64,
    device_id: &str,
    sink: &mut impl EventSink,
) {
    sink.emit(&AppEvent::LightChanged { on: light.is_on() });
    let published = registry.publish_now(StatusProducer::LightState, now_ms, broker, |_| {
        Some(light.status_snapshot(device_id).encode())
    });
    if let Some(topic) = published {
        sink.emit(&AppEvent::StatusPublished { topic });
    }
}
