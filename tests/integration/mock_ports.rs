//! Mock port adapters for integration tests.
//!
//! Each mock records the full call history so tests can assert on what
//! crossed the port boundary, not just the end state. The clock is
//! manual: `sleep_ms` advances simulated time, so the bounded WiFi-join
//! poll terminates without real waiting.

use std::cell::Cell;
use std::collections::VecDeque;

use homelight::app::events::AppEvent;
use homelight::app::ports::{
    BrokerPort, EventSink, InboundPublish, LightPort, LinkPort, NetworkPort, TimePort,
};
use homelight::app::service::AppService;
use homelight::config::SystemConfig;
use homelight::protocol::NetworkInfo;

pub const DEVICE_ID: &str = "HL-TEST01";

// ── Pairing link ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockLink {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one request frame (terminator appended).
    pub fn push_frame(&mut self, json: &str) {
        self.inbound.extend(json.bytes());
        self.inbound.push_back(b'\n');
    }

    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    /// Drain everything written to the link, split on the terminator.
    pub fn take_responses(&mut self) -> Vec<String> {
        let out = std::mem::take(&mut self.outbound);
        out.split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }
}

impl LinkPort for MockLink {
    fn read_byte(&mut self) -> Option<u8> {
        self.inbound.pop_front()
    }

    fn write_all(&mut self, bytes: &[u8]) {
        self.outbound.extend_from_slice(bytes);
    }
}

// ── Network driver ────────────────────────────────────────────

pub struct MockNetwork {
    pub joined: bool,
    pub join_succeeds: bool,
    pub join_calls: Vec<(String, String)>,
    pub networks: Vec<NetworkInfo>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self {
            joined: false,
            join_succeeds: true,
            join_calls: Vec::new(),
            networks: Vec::new(),
        }
    }
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkPort for MockNetwork {
    fn begin_join(&mut self, ssid: &str, psk: &str) {
        self.join_calls.push((ssid.to_owned(), psk.to_owned()));
        self.joined = self.join_succeeds;
    }

    fn is_connected(&self) -> bool {
        self.joined
    }

    fn scan(&mut self) -> Vec<NetworkInfo> {
        self.networks.clone()
    }
}

// ── Broker client ─────────────────────────────────────────────

pub struct MockBroker {
    pub connected: bool,
    pub accept_connects: bool,
    pub connect_attempts: u32,
    pub endpoint: Option<(String, u16)>,
    pub subscribes: Vec<String>,
    pub unsubscribes: Vec<String>,
    pub publishes: Vec<(String, Vec<u8>)>,
    inbound: VecDeque<InboundPublish>,
}

#[allow(dead_code)]
impl MockBroker {
    pub fn new() -> Self {
        Self {
            connected: false,
            accept_connects: true,
            connect_attempts: 0,
            endpoint: None,
            subscribes: Vec::new(),
            unsubscribes: Vec::new(),
            publishes: Vec::new(),
            inbound: VecDeque::new(),
        }
    }

    /// Queue an inbound publish as if the broker delivered it.
    pub fn deliver(&mut self, topic: &str, payload: &[u8]) {
        self.inbound.push_back(InboundPublish {
            topic: topic.to_owned(),
            payload: payload.to_vec(),
        });
    }

    /// Broker-side disconnect.
    pub fn drop_connection(&mut self) {
        self.connected = false;
    }

    /// Payloads published on `topic`, as UTF-8.
    pub fn published_on(&self, topic: &str) -> Vec<String> {
        self.publishes
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| String::from_utf8_lossy(p).into_owned())
            .collect()
    }
}

impl Default for MockBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerPort for MockBroker {
    fn set_endpoint(&mut self, host: &str, port: u16) {
        self.endpoint = Some((host.to_owned(), port));
    }

    fn connect(&mut self, _client_id: &str) -> bool {
        self.connect_attempts += 1;
        if self.accept_connects && self.endpoint.is_some() {
            self.connected = true;
        }
        self.connected
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn subscribe(&mut self, topic: &str) -> bool {
        self.subscribes.push(topic.to_owned());
        true
    }

    fn unsubscribe(&mut self, topic: &str) {
        self.unsubscribes.push(topic.to_owned());
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        if !self.connected {
            return false;
        }
        self.publishes.push((topic.to_owned(), payload.to_vec()));
        true
    }

    fn poll_message(&mut self) -> Option<InboundPublish> {
        self.inbound.pop_front()
    }
}

// ── Light pin ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPin {
    pub level: bool,
    pub writes: u32,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LightPort for MockPin {
    fn set_on(&mut self, on: bool) {
        self.level = on;
        self.writes += 1;
    }
}

// ── Manual clock ──────────────────────────────────────────────

/// Simulated monotonic clock. `sleep_ms` advances time instead of
/// blocking, so in-dispatch polling loops run to their deadline
/// instantly.
pub struct MockClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimePort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn sleep_ms(&self, ms: u64) {
        self.advance(ms);
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Everything one test needs, pre-wired.
pub struct Harness {
    pub app: AppService,
    pub link: MockLink,
    pub net: MockNetwork,
    pub broker: MockBroker,
    pub pin: MockPin,
    pub clock: MockClock,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self {
            app: AppService::new(&SystemConfig::default(), DEVICE_ID.to_owned()),
            link: MockLink::new(),
            net: MockNetwork::new(),
            broker: MockBroker::new(),
            pin: MockPin::new(),
            clock: MockClock::new(),
            sink: RecordingSink::new(),
        }
    }

    pub fn tick(&mut self) {
        self.app.tick(
            &mut self.link,
            &mut self.net,
            &mut self.broker,
            &mut self.pin,
            &self.clock,
            &mut self.sink,
        );
    }

    /// Queue one request frame and run one tick.
    pub fn send(&mut self, json: &str) {
        self.link.push_frame(json);
        self.tick();
    }

    /// Queue one request frame, run one tick, return the single reply.
    pub fn roundtrip(&mut self, json: &str) -> String {
        self.send(json);
        let mut responses = self.link.take_responses();
        assert_eq!(responses.len(), 1, "expected exactly one reply");
        responses.remove(0)
    }

    /// Full bring-up: WiFi joined, broker connected, topics registered.
    pub fn bring_up(&mut self, command_topic: &str, status_topic: &str) {
        self.net.joined = true;
        assert_eq!(
            self.roundtrip(r#"{"action":"registerBroker","broker":"b.local","port":1883}"#),
            r#"{"success":true}"#
        );
        assert_eq!(
            self.roundtrip(&format!(
                r#"{{"action":"register","commandTopic":"{command_topic}","statusTopic":"{status_topic}"}}"#
            )),
            r#"{"success":true}"#
        );
        assert!(self.broker.is_connected());
        // The immediate first periodic publish has fired; discard it so
        // tests start from a clean publish log.
        self.broker.publishes.clear();
        self.sink.events.clear();
    }
}
