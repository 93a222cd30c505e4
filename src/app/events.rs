//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, count in a test
//! recorder, etc.

use crate::connectivity::ConnectionStage;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A pairing request was dispatched on the local link.
    PairingHandled { action: String, success: bool },

    /// The connectivity bring-up moved between stages.
    StageChanged {
        from: ConnectionStage,
        to: ConnectionStage,
    },

    /// The light peripheral changed state.
    LightChanged { on: bool },

    /// A status payload was published on the control channel.
    StatusPublished { topic: String },
}
