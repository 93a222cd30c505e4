//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::PairingHandled { action, success } => {
                info!("PAIR  | action='{}' success={}", action, success);
            }
            AppEvent::StageChanged { from, to } => {
                info!("STAGE | {:?} -> {:?}", from, to);
            }
            AppEvent::LightChanged { on } => {
                info!("LIGHT | {}", if *on { "on" } else { "off" });
            }
            AppEvent::StatusPublished { topic } => {
                info!("STATUS| published on '{}'", topic);
            }
        }
    }
}
