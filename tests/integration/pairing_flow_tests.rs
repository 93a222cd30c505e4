//! Pairing-channel flows: newline-delimited JSON requests in over the
//! local link, one reply out per frame.

use homelight::app::events::AppEvent;
use homelight::app::ports::{BrokerPort, TimePort};
use homelight::connectivity::ConnectionStage;
use homelight::protocol::NetworkInfo;

use crate::mock_ports::{Harness, DEVICE_ID};

// ── Query actions ─────────────────────────────────────────────

#[test]
fn get_id_reports_device_identity() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"reqId":"1","action":"getId"}"#),
        r#"{"reqId":"1","success":true,"deviceId":"HL-TEST01"}"#
    );
}

#[test]
fn wifi_status_reflects_driver_state() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"action":"wifiStatus"}"#),
        r#"{"success":true,"connected":false}"#
    );
    h.net.joined = true;
    assert_eq!(
        h.roundtrip(r#"{"action":"wifiStatus"}"#),
        r#"{"success":true,"connected":true}"#
    );
}

#[test]
fn scan_wifi_lists_networks() {
    let mut h = Harness::new();
    h.net.networks = vec![
        NetworkInfo {
            ssid: "HomeNet".into(),
            open: false,
        },
        NetworkInfo {
            ssid: "CoffeeShop".into(),
            open: true,
        },
    ];
    assert_eq!(
        h.roundtrip(r#"{"reqId":"2","action":"scanWifi"}"#),
        r#"{"reqId":"2","success":true,"networks":[{"ssid":"HomeNet","open":false},{"ssid":"CoffeeShop","open":true}]}"#
    );
}

// ── connectWifi ───────────────────────────────────────────────

#[test]
fn connect_wifi_success_advances_stage() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"action":"connectWifi","ssid":"HomeNet","psk":"secret"}"#),
        r#"{"success":true}"#
    );
    assert_eq!(h.net.join_calls, vec![("HomeNet".to_owned(), "secret".to_owned())]);
    assert_eq!(h.app.stage(), ConnectionStage::NetworkJoined);
}

#[test]
fn connect_wifi_timeout_reports_failure_and_reverts_stage() {
    let mut h = Harness::new();
    h.net.join_succeeds = false;
    assert_eq!(
        h.roundtrip(r#"{"reqId":"3","action":"connectWifi","ssid":"HomeNet","psk":"wrong"}"#),
        r#"{"reqId":"3","success":false}"#
    );
    assert_eq!(h.app.stage(), ConnectionStage::Disconnected);
    // The bounded poll ran out the full join timeout on the simulated clock.
    assert!(h.clock.now_ms() >= 30_000);
}

#[test]
fn connect_wifi_without_ssid_fails_without_join_attempt() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"action":"connectWifi","psk":"secret"}"#),
        r#"{"success":false}"#
    );
    assert!(h.net.join_calls.is_empty());
}

// ── registerBroker / register ─────────────────────────────────

#[test]
fn register_broker_records_endpoint_and_connects_on_poll() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"action":"registerBroker","broker":"b.local","port":1883}"#),
        r#"{"success":true}"#
    );
    assert_eq!(h.broker.endpoint, Some(("b.local".to_owned(), 1883)));
    // The reconnect poll in the same tick performed the handshake.
    assert!(h.broker.is_connected());
    assert_eq!(h.app.stage(), ConnectionStage::BrokerConnected);
}

#[test]
fn register_broker_rejects_missing_port() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"action":"registerBroker","broker":"b.local"}"#),
        r#"{"success":false}"#
    );
    assert!(h.broker.endpoint.is_none());
}

#[test]
fn register_subscribes_command_topic() {
    let mut h = Harness::new();
    h.bring_up("home/cmd", "home/status");
    assert_eq!(h.broker.subscribes, vec!["home/cmd"]);
    assert_eq!(h.app.subscription_count(), 1);
    assert_eq!(h.app.stage(), ConnectionStage::TopicsSubscribed);
}

#[test]
fn reregister_with_new_command_topic_unsubscribes_old() {
    let mut h = Harness::new();
    h.bring_up("home/cmd", "home/status");
    assert_eq!(
        h.roundtrip(r#"{"action":"register","commandTopic":"home/cmd2","statusTopic":"home/status"}"#),
        r#"{"success":true}"#
    );
    assert_eq!(h.broker.unsubscribes, vec!["home/cmd"]);
    assert_eq!(h.broker.subscribes, vec!["home/cmd", "home/cmd2"]);
    assert_eq!(h.app.subscription_count(), 1);
}

#[test]
fn register_rejects_missing_topics() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"action":"register","commandTopic":"home/cmd"}"#),
        r#"{"success":false}"#
    );
    assert_eq!(h.app.subscription_count(), 0);
}

// ── toggle ────────────────────────────────────────────────────

#[test]
fn toggle_drives_pin_and_publishes_status() {
    let mut h = Harness::new();
    h.bring_up("home/cmd", "home/status");

    assert_eq!(
        h.roundtrip(r#"{"action":"toggle","on":true}"#),
        r#"{"success":true}"#
    );
    assert!(h.pin.level);
    assert!(h.app.light_on());
    assert_eq!(
        h.broker.published_on("home/status"),
        vec![format!(
            r#"{{"deviceId":"{DEVICE_ID}","fieldName":"on","fieldValue":"true"}}"#
        )]
    );
    assert!(h
        .sink
        .events
        .contains(&AppEvent::LightChanged { on: true }));
}

#[test]
fn toggle_without_on_field_defaults_to_off() {
    let mut h = Harness::new();
    h.pin.level = true;
    assert_eq!(h.roundtrip(r#"{"action":"toggle"}"#), r#"{"success":true}"#);
    assert!(!h.pin.level);
}

#[test]
fn toggle_before_registration_succeeds_without_publish() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"action":"toggle","on":true}"#),
        r#"{"success":true}"#
    );
    assert!(h.pin.level);
    assert!(h.broker.publishes.is_empty());
}

// ── Degraded input ────────────────────────────────────────────

#[test]
fn garbage_frame_still_gets_a_reply() {
    let mut h = Harness::new();
    assert_eq!(h.roundtrip(r#"{"action":"connec"#), r#"{"success":false}"#);
}

#[test]
fn unknown_action_fails_softly() {
    let mut h = Harness::new();
    assert_eq!(
        h.roundtrip(r#"{"reqId":"9","action":"selfDestruct"}"#),
        r#"{"reqId":"9","success":false}"#
    );
    assert!(h
        .sink
        .events
        .contains(&AppEvent::PairingHandled {
            action: "selfDestruct".to_owned(),
            success: false,
        }));
}

#[test]
fn two_frames_in_one_tick_get_two_replies() {
    let mut h = Harness::new();
    h.link.push_frame(r#"{"reqId":"a","action":"getId"}"#);
    h.link.push_frame(r#"{"reqId":"b","action":"getId"}"#);
    h.tick();
    let responses = h.link.take_responses();
    assert_eq!(responses.len(), 2);
    assert!(responses[0].contains(r#""reqId":"a""#));
    assert!(responses[1].contains(r#""reqId":"b""#));
}

#[test]
fn partial_frame_is_dropped_after_stale_gap() {
    let mut h = Harness::new();
    h.link.push_raw(br#"{"reqId":"x","#);
    h.tick();
    assert!(h.link.take_responses().is_empty());

    h.clock.advance(3001);
    h.send(r#"{"reqId":"y","action":"getId"}"#);
    let responses = h.link.take_responses();
    // Only the fresh frame decodes; the stale prefix never pollutes it.
    assert_eq!(responses.len(), 1);
    assert!(responses[0].contains(r#""reqId":"y""#));
}
