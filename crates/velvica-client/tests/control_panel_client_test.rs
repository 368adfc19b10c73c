//! Contract tests for ControlPanelClient.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `subscription/{id}/info` | `fetch_info_*` |
//! | GET    | `subscription/{id}/image` | `fetch_images_*` |
//! | POST   | `subscription/{id}/rebuild` | `rebuild_*` |
//! | POST   | `subscription/{id}/start` | `change_state_*` |
//! | POST   | `subscription/{id}/rescue/start` | `start_rescue_*` |
//! | GET    | `subscription/{id}/console/logs/{n}` | `fetch_logs_*` |

use serde_json::json;
use velvica_client::{ControlPanelClient, ControlPanelConfig, RebuildOptions, VpsLogFilter,
    VpsStateChange};
use wiremock::matchers::{body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBSCRIPTION_ID: &str = "SUBSCRIPTION_ID";

fn test_client(mock_server: &MockServer) -> ControlPanelClient {
    ControlPanelClient::new(ControlPanelConfig {
        endpoint: mock_server.uri(),
        subscription_id: SUBSCRIPTION_ID.into(),
        signature: "sig=AG_SIGN".into(),
    })
    .unwrap()
}

// ── GET subscription/{id}/info ───────────────────────────────────────

#[tokio::test]
async fn fetch_info_nests_under_the_subscription_and_carries_the_signature() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/info")))
        .and(query_param("sig", "AG_SIGN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "running"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body = client.fetch_info().await.unwrap();
    assert_eq!(body, json!({"state": "running"}));
}

#[tokio::test]
async fn fetch_images_hits_the_image_action() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/image")))
        .and(query_param("sig", "AG_SIGN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server).fetch_images().await.unwrap();
}

// ── POST subscription/{id}/rebuild ───────────────────────────────────

#[tokio::test]
async fn rebuild_sends_the_image_and_optional_key_as_a_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/rebuild")))
        .and(query_param("sig", "AG_SIGN"))
        .and(body_string("image_uuid=foo&ssh_key=bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client
        .rebuild(RebuildOptions {
            image_uuid: Some("foo".into()),
            ssh_key: Some("bar".into()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn rebuild_without_key_sends_only_the_image() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/rebuild")))
        .and(body_string("image_uuid=foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client
        .rebuild(RebuildOptions {
            image_uuid: Some("foo".into()),
            ssh_key: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn rebuild_without_image_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    let err = client.rebuild(RebuildOptions::default()).await.unwrap_err();

    assert_eq!(err.to_string(), "Cannot rebuild without imageUUID specified.");
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

// ── State changes ────────────────────────────────────────────────────

#[tokio::test]
async fn change_state_posts_to_the_mapped_action() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/start")))
        .and(query_param("sig", "AG_SIGN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/reboot/soft")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.change_state(VpsStateChange::TurnOn).await.unwrap();
    client
        .change_state(VpsStateChange::SoftReboot)
        .await
        .unwrap();
}

// ── Rescue mode ──────────────────────────────────────────────────────

#[tokio::test]
async fn start_rescue_carries_the_image_id_before_the_signature() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/rescue/start")))
        .and(query_param("image_id", "abc"))
        .and(query_param("sig", "AG_SIGN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server).start_rescue("abc").await.unwrap();
}

#[tokio::test]
async fn leave_rescue_posts_to_rescue_leave() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/rescue/leave")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server).leave_rescue().await.unwrap();
}

// ── Console ──────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_console_url_hits_console_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/subscription/{SUBSCRIPTION_ID}/console/url")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "wss://console"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = test_client(&mock_server).fetch_console_url().await.unwrap();
    assert_eq!(body, json!({"url": "wss://console"}));
}

#[tokio::test]
async fn fetch_logs_selects_the_filter_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/subscription/{SUBSCRIPTION_ID}/console/logs/all"
        )))
        .and(query_param("sig", "AG_SIGN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server)
        .fetch_logs(VpsLogFilter::All)
        .await
        .unwrap();
}
