//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the frame assembler, command router, connectivity
//! manager, topic registry, and light controller. It exposes one
//! [`tick`](AppService::tick) that the host loop drives repeatedly:
//!
//! ```text
//!  LinkPort ────▶ ┌──────────────────────────────┐ ◀──── NetworkPort
//!                 │         AppService           │
//!  BrokerPort ◀──▶│ framer · router · conn ·     │ ────▶ EventSink
//!  LightPort  ◀── │ registry · light             │
//!                 └──────────────────────────────┘
//! ```
//!
//! One tick performs, in order: drain the pairing link (dispatching each
//! completed frame synchronously), run the broker reconnect check, then
//! pull pending broker messages and the periodic-publish scan. Handlers
//! run to completion before the next event is considered; all mutation
//! happens on this single logical thread.

use crate::config::SystemConfig;
use crate::connectivity::{ConnectionStage, ConnectivityManager};
use crate::light::LightController;
use crate::link::FrameAssembler;
use crate::protocol::LightCommand;
use crate::registry::{StatusProducer, TopicHandler, TopicRegistry};

use super::ports::{BrokerPort, EventSink, LightPort, LinkPort, NetworkPort, TimePort};
use super::router::{report_light_change, CommandRouter};

pub struct AppService {
    framer: FrameAssembler,
    router: CommandRouter,
    conn: ConnectivityManager,
    registry: TopicRegistry,
    light: LightController,
}

impl AppService {
    pub fn new(config: &SystemConfig, device_id: String) -> Self {
        Self {
            framer: FrameAssembler::new(config.link_frame_max_bytes, config.link_stale_ms),
            router: CommandRouter::new(
                device_id,
                config.wifi_join_timeout_ms,
                config.wifi_poll_interval_ms,
                config.status_publish_interval_ms,
            ),
            conn: ConnectivityManager::new(config.broker_retry_interval_ms),
            registry: TopicRegistry::new(),
            light: LightController::new(),
        }
    }

    /// Record the configured default broker endpoint, exactly as a
    /// `registerBroker` request would. Call once at startup.
    pub fn apply_default_broker(
        &mut self,
        config: &SystemConfig,
        broker: &mut impl BrokerPort,
        sink: &mut impl EventSink,
    ) {
        if let Some(ep) = &config.default_broker {
            let _ = self.conn.connect_broker(broker, sink, &ep.host, ep.port);
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cooperative scheduling pass.
    #[allow(clippy::too_many_arguments)] // one argument per port, by construction
    pub fn tick(
        &mut self,
        link: &mut impl LinkPort,
        net: &mut impl NetworkPort,
        broker: &mut impl BrokerPort,
        pin: &mut impl LightPort,
        time: &impl TimePort,
        sink: &mut impl EventSink,
    ) {
        // 1. Drain pairing-link bytes; dispatch each completed frame
        //    before reading on.
        while let Some(byte) = link.read_byte() {
            if let Some(frame) = self.framer.feed(time.now_ms(), byte) {
                let response = self.router.dispatch(
                    &frame,
                    &mut self.conn,
                    &mut self.registry,
                    &mut self.light,
                    net,
                    broker,
                    pin,
                    time,
                    sink,
                );
                link.write_all(&response);
                link.write_all(b"\n");
            }
        }

        // 2. Broker reconnect check (rate-limited inside).
        self.conn
            .poll(time.now_ms(), broker, &mut self.registry, sink);

        // 3. Control channel: pull inbound messages, then the
        //    periodic-publish scan.
        if broker.is_connected() {
            while let Some(msg) = broker.poll_message() {
                self.handle_broker_message(&msg.topic, &msg.payload, broker, pin, time, sink);
            }

            let light = &self.light;
            let device_id = self.router.device_id();
            self.registry.tick(time.now_ms(), broker, |producer| match producer {
                StatusProducer::LightState => Some(light.status_snapshot(device_id).encode()),
            });
        }
    }

    fn handle_broker_message(
        &mut self,
        topic: &str,
        payload: &[u8],
        broker: &mut impl BrokerPort,
        pin: &mut impl LightPort,
        time: &impl TimePort,
        sink: &mut impl EventSink,
    ) {
        for handler in self.registry.dispatch(topic) {
            match handler {
                TopicHandler::LightCommand => {
                    let cmd = LightCommand::decode(payload);
                    // Commands addressed to other devices are not ours.
                    if cmd.device_id != self.router.device_id() {
                        continue;
                    }
                    if self.light.apply_command(&cmd.command, pin) {
                        report_light_change(
                            &self.light,
                            &mut self.registry,
                            broker,
                            time.now_ms(),
                            self.router.device_id(),
                            sink,
                        );
                    }
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn stage(&self) -> ConnectionStage {
        self.conn.stage()
    }

    pub fn light_on(&self) -> bool {
        self.light.is_on()
    }

    pub fn device_id(&self) -> &str {
        self.router.device_id()
    }

    pub fn subscription_count(&self) -> usize {
        self.registry.subscription_count()
    }
}
