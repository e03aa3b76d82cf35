//! Notification dispatch over the API

use crate::common::TestApp;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bloodlink::config::SmsConfig;

fn sms_config(api_base: String) -> SmsConfig {
    SmsConfig {
        account_sid: "ACtest".to_string(),
        auth_token: "secret".to_string(),
        from_phone: "+15550006789".to_string(),
        api_base,
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn notify_with_no_matches_is_a_success() {
    let app = TestApp::new().await;
    let (token, id) = app.create_request("AB-", "Salem", None).await;

    let response = app
        .post_json_auth(
            "/api/v1/notify/request-donors",
            json!({"request_id": id}),
            &token,
        )
        .await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["message"], "Notifications sent to 0 out of 0 donors");
    assert_eq!(body["total_matched"], 0);
    assert_eq!(body["delivered"], 0);
}

#[tokio::test]
async fn notify_unknown_request_is_not_found() {
    let app = TestApp::new().await;
    let token = app.register_user("requester").await;

    app.post_json_auth(
        "/api/v1/notify/request-donors",
        json!({"request_id": uuid::Uuid::new_v4()}),
        &token,
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn notify_without_sms_provider_records_failed_deliveries() {
    let app = TestApp::new().await;

    app.register_donor("O+", "Chennai", "+911111111111").await;
    let (token, id) = app.create_request("O+", "Chennai", None).await;

    let response = app
        .post_json_auth(
            "/api/v1/notify/request-donors",
            json!({"request_id": id}),
            &token,
        )
        .await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["message"], "Notifications sent to 0 out of 1 donors");
    assert_eq!(body["total_matched"], 1);
    assert_eq!(body["delivered"], 0);
    assert_eq!(body["notifications"][0]["delivered"], false);
    assert_eq!(body["notifications"][0]["phone"], "+911111111111");
}

#[tokio::test]
async fn notify_delivers_urgency_prefixed_alerts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/ACtest/Messages.json"))
        .and(body_string_contains("CRITICAL+Blood+needed"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM1"})))
        .expect(2)
        .mount(&server)
        .await;

    let app = TestApp::with_sms(Some(sms_config(server.uri()))).await;

    app.register_donor("O+", "Chennai", "+911111111111").await;
    app.register_donor("O+", "Chennai", "+912222222222").await;
    let (token, id) = app.create_request("O+", "Chennai", Some("critical")).await;

    let response = app
        .post_json_auth(
            "/api/v1/notify/request-donors",
            json!({"request_id": id}),
            &token,
        )
        .await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["message"], "Notifications sent to 2 out of 2 donors");
    assert_eq!(body["delivered"], 2);
}

#[tokio::test]
async fn one_failed_delivery_does_not_abort_the_run() {
    let server = MockServer::start().await;

    // First donor's number is rejected, second succeeds
    Mock::given(method("POST"))
        .and(body_string_contains("To=%2B911111111111"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad number"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("To=%2B912222222222"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM2"})))
        .mount(&server)
        .await;

    let app = TestApp::with_sms(Some(sms_config(server.uri()))).await;

    app.register_donor("O+", "Chennai", "+911111111111").await;
    app.register_donor("O+", "Chennai", "+912222222222").await;
    let (token, id) = app.create_request("O+", "Chennai", None).await;

    let response = app
        .post_json_auth(
            "/api/v1/notify/request-donors",
            json!({"request_id": id}),
            &token,
        )
        .await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["message"], "Notifications sent to 1 out of 2 donors");
    assert_eq!(body["total_matched"], 2);
    assert_eq!(body["delivered"], 1);

    let failed = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["phone"] == "+911111111111")
        .unwrap();
    assert_eq!(failed["delivered"], false);
}

#[tokio::test]
async fn contact_donor_without_message_returns_contact_details() {
    let server = MockServer::start().await;
    // No mock mounted: any delivery attempt would 404 and show up as failed

    let app = TestApp::with_sms(Some(sms_config(server.uri()))).await;
    let (_donor_token, donor_id) = app.register_donor("O+", "Chennai", "+911111111111").await;

    let token = app.register_user("requester").await;
    let response = app
        .post_json_auth(
            "/api/v1/notify/contact-donor",
            json!({"donor_id": donor_id}),
            &token,
        )
        .await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["message"], "Donor contact details");
    assert_eq!(body["donor"]["phone"], "+911111111111");
    assert!(body.get("sms_sent").is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn whitespace_message_counts_as_absent() {
    let app = TestApp::new().await;
    let (_donor_token, donor_id) = app.register_donor("O+", "Chennai", "+911111111111").await;

    let token = app.register_user("requester").await;
    let response = app
        .post_json_auth(
            "/api/v1/notify/contact-donor",
            json!({"donor_id": donor_id, "message": "   "}),
            &token,
        )
        .await;
    response.assert_ok();
    assert!(response.json().get("sms_sent").is_none());
}

#[tokio::test]
async fn contact_donor_with_message_relays_sms() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("BloodLink%3A+need+O%2B+tomorrow"))
        .and(body_string_contains("Requester+contact%3A+%2B919876543210"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM3"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_sms(Some(sms_config(server.uri()))).await;
    let (_donor_token, donor_id) = app.register_donor("O+", "Chennai", "+911111111111").await;

    let token = app.register_user("requester").await;
    let response = app
        .post_json_auth(
            "/api/v1/notify/contact-donor",
            json!({"donor_id": donor_id, "message": "need O+ tomorrow"}),
            &token,
        )
        .await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["message"], "Message sent to donor");
    assert_eq!(body["sms_sent"], true);
}

#[tokio::test]
async fn contacting_unavailable_donor_conflicts() {
    let app = TestApp::new().await;
    let (donor_token, donor_id) = app.register_donor("O+", "Chennai", "+911111111111").await;

    app.post_auth("/api/v1/donors/deactivate", &donor_token)
        .await
        .assert_ok();

    let token = app.register_user("requester").await;
    app.post_json_auth(
        "/api/v1/notify/contact-donor",
        json!({"donor_id": donor_id, "message": "hello"}),
        &token,
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn contacting_unknown_donor_is_not_found() {
    let app = TestApp::new().await;
    let token = app.register_user("requester").await;

    app.post_json_auth(
        "/api/v1/notify/contact-donor",
        json!({"donor_id": uuid::Uuid::new_v4()}),
        &token,
    )
    .await
    .assert_not_found();
}
