//! Wire records for both control channels.
//!
//! - **Pairing channel** (local link): newline-delimited JSON
//!   request/response records, camelCase field names.
//! - **Control channel** (MQTT): command payloads on the registered
//!   command topic, one-field-per-message status updates on the status
//!   topic.
//!
//! Every request field is `Option` so a missing field decodes as absent
//! rather than failing the whole record; the router applies the
//! documented zero-value defaulting on top. An undecodable frame
//! (garbage, truncated by the link cap) degrades to the empty record via
//! `Default` — the pairing protocol never surfaces parse errors, only
//! `success:false`.

use serde::{Deserialize, Serialize};

// ── Pairing channel ──────────────────────────────────────────

/// One decoded pairing request. All fields optional by design.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PairingRequest {
    /// Opaque echo token; mirrored back in the response when present.
    pub req_id: Option<String>,
    pub action: Option<String>,
    // connectWifi
    pub ssid: Option<String>,
    pub psk: Option<String>,
    // registerBroker
    pub broker: Option<String>,
    pub port: Option<u16>,
    // register
    pub command_topic: Option<String>,
    pub status_topic: Option<String>,
    pub token: Option<String>,
    // toggle
    pub on: Option<bool>,
}

impl PairingRequest {
    /// Decode a raw frame, degrading to the empty record on any error.
    pub fn decode(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_default()
    }

    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or("")
    }
}

/// One pairing response. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_id: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<NetworkInfo>>,
}

impl PairingResponse {
    /// The generic `{reqId, success}` envelope for mutating actions.
    pub fn envelope(req_id: Option<String>, success: bool) -> Self {
        Self {
            req_id,
            success,
            device_id: None,
            connected: None,
            networks: None,
        }
    }

    /// Serialize without the trailing newline; the link adapter appends it.
    pub fn encode(&self) -> Vec<u8> {
        // A struct of scalars and strings cannot fail to serialize.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// One scanned access point, as reported by `scanWifi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub ssid: String,
    /// True when the AP requires no authentication.
    pub open: bool,
}

// ── Control channel (MQTT) ───────────────────────────────────

/// Command verb: turn the light on.
pub const CMD_TURN_ON: &str = "turnOn";
/// Command verb: turn the light off.
pub const CMD_TURN_OFF: &str = "turnOff";

/// Payload received on the command topic. Devices act only on payloads
/// whose `device_id` matches their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightCommand {
    pub device_id: String,
    pub command: String,
}

impl LightCommand {
    pub fn decode(payload: &[u8]) -> Self {
        serde_json::from_slice(payload).unwrap_or_default()
    }
}

/// Payload published on the status topic — one field per message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub device_id: String,
    pub field_name: String,
    pub field_value: String,
}

impl StatusUpdate {
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

// ── Tests ────────────────────────────────────────────────────
