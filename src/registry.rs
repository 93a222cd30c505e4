//! Topic registry — subscriptions and scheduled publications.
//!
//! Keeps the durable record of (a) which command topics the device
//! listens on and (b) which periodic status publications it owes the
//! control channel. Entries survive broker reconnects: the connectivity
//! manager replays every subscription through
//! [`resubscribe_all`](TopicRegistry::resubscribe_all) after each
//! successful handshake.
//!
//! Handlers and producers are tagged unions, not captured closures —
//! the tick loop pulls messages and maps the tag back onto the owning
//! component, so no mutable aliasing crosses this module.

use log::{debug, info};

use crate::app::ports::BrokerPort;

/// What to do with a payload arriving on a subscribed topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicHandler {
    /// Decode a light command and apply it to the peripheral.
    LightCommand,
}

/// What a periodic publication entry publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusProducer {
    /// Snapshot of the light's on/off state.
    LightState,
}

/// One subscribed command topic. Unique per topic name.
#[derive(Debug, Clone)]
pub struct SubscriptionEntry {
    pub topic: String,
    pub handler: TopicHandler,
}

/// One scheduled publication.
#[derive(Debug, Clone)]
pub struct PeriodicPublishEntry {
    pub topic: String,
    pub interval_ms: u64,
    /// `None` = never fired, so the first eligible tick fires at once.
    last_fire_ms: Option<u64>,
    pub producer: StatusProducer,
}

pub struct TopicRegistry {
    subscriptions: Vec<SubscriptionEntry>,
    periodic: Vec<PeriodicPublishEntry>,
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            periodic: Vec::new(),
        }
    }

    // ── Subscriptions ─────────────────────────────────────────

    /// Register (or replace, by exact topic) a command-topic handler.
    /// Subscribes immediately when the broker is up; always recorded for
    /// replay after future reconnects.
    pub fn subscribe(&mut self, topic: &str, handler: TopicHandler, broker: &mut impl BrokerPort) {
        if let Some(entry) = self.subscriptions.iter_mut().find(|e| e.topic == topic) {
            entry.handler = handler;
            info!("registry: replaced handler for '{topic}'");
        } else {
            self.subscriptions.push(SubscriptionEntry {
                topic: topic.to_owned(),
                handler,
            });
            info!("registry: subscribed '{topic}'");
        }
        if broker.is_connected() {
            let _ = broker.subscribe(topic);
        }
    }

    /// Drop a subscription, unsubscribing on the wire if connected.
    pub fn remove(&mut self, topic: &str, broker: &mut impl BrokerPort) {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|e| e.topic != topic);
        if self.subscriptions.len() != before {
            info!("registry: removed '{topic}'");
            if broker.is_connected() {
                broker.unsubscribe(topic);
            }
        }
    }

    /// Topic currently bound to `handler`, if any.
    pub fn topic_for(&self, handler: TopicHandler) -> Option<&str> {
        self.subscriptions
            .iter()
            .find(|e| e.handler == handler)
            .map(|e| e.topic.as_str())
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Replay every subscription after a reconnect. Exactly one
    /// subscribe call per entry — repeated reconnects never accumulate
    /// duplicates because the entries themselves are deduplicated.
    pub fn resubscribe_all(&self, broker: &mut impl BrokerPort) {
        for entry in &self.subscriptions {
            let _ = broker.subscribe(&entry.topic);
        }
    }

    /// All handlers matching an inbound topic, exact string match.
    /// Unmatched topics yield an empty list and are ignored by the
    /// caller.
    pub fn dispatch(&self, topic: &str) -> Vec<TopicHandler> {
        let matched: Vec<TopicHandler> = self
            .subscriptions
            .iter()
            .filter(|e| e.topic == topic)
            .map(|e| e.handler)
            .collect();
        if matched.is_empty() {
            debug!("registry: no handler for '{topic}'");
        }
        matched
    }

    // ── Periodic publications ─────────────────────────────────

    /// Register (or replace, by topic) a scheduled publication. The
    /// first eligible tick may fire immediately.
    pub fn add_periodic(&mut self, topic: &str, interval_ms: u64, producer: StatusProducer) {
        self.periodic.retain(|e| e.topic != topic);
        self.periodic.push(PeriodicPublishEntry {
            topic: topic.to_owned(),
            interval_ms,
            last_fire_ms: None,
            producer,
        });
        info!("registry: periodic publish '{topic}' every {interval_ms}ms");
    }

    /// Drop the scheduled publication for `topic`.
    pub fn remove_periodic(&mut self, topic: &str) {
        self.periodic.retain(|e| e.topic != topic);
    }

    /// Topic of the periodic entry owned by `producer`, if any.
    pub fn periodic_topic(&self, producer: StatusProducer) -> Option<&str> {
        self.periodic
            .iter()
            .find(|e| e.producer == producer)
            .map(|e| e.topic.as_str())
    }

    /// One pass over the scheduled publications.
    ///
    /// For each due entry the producer is invoked; `Some(payload)`
    /// publishes and stamps `last_fire`, `None` leaves the stamp
    /// untouched so the producer is retried on the very next tick
    /// instead of waiting out a full interval.
    pub fn tick(
        &mut self,
        now_ms: u64,
        broker: &mut impl BrokerPort,
        mut produce: impl FnMut(StatusProducer) -> Option<Vec<u8>>,
    ) {
        for entry in &mut self.periodic {
            let due = match entry.last_fire_ms {
                None => true,
                Some(last) => now_ms.saturating_sub(last) >= entry.interval_ms,
            };
            if !due {
                continue;
            }
            if let Some(payload) = produce(entry.producer) {
                let _ = broker.publish(&entry.topic, &payload);
                entry.last_fire_ms = Some(now_ms);
            }
        }
    }

    /// Fire `producer`'s entry immediately (state-change publish),
    /// resetting its interval clock. No-op when the producer has no
    /// registered topic or yields nothing.
    pub fn publish_now(
        &mut self,
        producer: StatusProducer,
        now_ms: u64,
        broker: &mut impl BrokerPort,
        produce: impl FnOnce(StatusProducer) -> Option<Vec<u8>>,
    ) -> Option<String> {
        let entry = self.periodic.iter_mut().find(|e| e.producer == producer)?;
        let payload = produce(producer)?;
        let _ = broker.publish(&entry.topic, &payload);
        entry.last_fire_ms = Some(now_ms);
        Some(entry.topic.clone())
    }
}

// ── Tests ────────────────────────────────────────────────────
