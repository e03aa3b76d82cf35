//! Blood request lifecycle over the API

use crate::common::TestApp;
use serde_json::json;

#[tokio::test]
async fn create_reports_matching_donor_count() {
    let app = TestApp::new().await;

    app.register_donor("O+", "Chennai", "+911111111111").await;
    app.register_donor("O+", "Chennai", "+912222222222").await;
    app.register_donor("O+", "Madurai", "+913333333333").await;

    let token = app.register_user("requester").await;
    let response = app
        .post_json_auth(
            "/api/v1/requests/create",
            json!({
                "requester_name": "Kumar",
                "blood_group": "O+",
                "district": "Chennai",
                "hospital": "Apollo",
                "phone": "+914412345678",
            }),
            &token,
        )
        .await;
    response.assert_created();

    let body = response.json();
    assert_eq!(body["matching_donors_count"], 2);
    assert_eq!(body["request"]["status"], "pending");
    assert_eq!(body["request"]["urgency"], "normal");
}

#[tokio::test]
async fn unknown_urgency_falls_back_to_normal() {
    let app = TestApp::new().await;
    let token = app.register_user("requester").await;

    let response = app
        .post_json_auth(
            "/api/v1/requests/create",
            json!({
                "requester_name": "Kumar",
                "blood_group": "O+",
                "district": "Chennai",
                "hospital": "Apollo",
                "phone": "+914412345678",
                "urgency": "catastrophic",
            }),
            &token,
        )
        .await;
    response.assert_created();
    assert_eq!(response.json()["request"]["urgency"], "normal");
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/v1/requests/create",
        json!({
            "requester_name": "Kumar",
            "blood_group": "O+",
            "district": "Chennai",
            "hospital": "Apollo",
            "phone": "+914412345678",
        }),
    )
    .await
    .assert_unauthorized();
}

#[tokio::test]
async fn fulfill_is_one_way() {
    let app = TestApp::new().await;
    let (token, id) = app.create_request("O+", "Chennai", None).await;

    let fulfilled = app
        .post_auth(&format!("/api/v1/requests/{}/fulfill", id), &token)
        .await;
    fulfilled.assert_ok();

    let body = fulfilled.json();
    assert_eq!(body["request"]["status"], "fulfilled");
    let first_fulfilled_at = body["request"]["fulfilled_at"].clone();
    assert!(!first_fulfilled_at.is_null());

    // Second attempt conflicts and leaves the timestamp alone
    app.post_auth(&format!("/api/v1/requests/{}/fulfill", id), &token)
        .await
        .assert_conflict();

    let stored = app.get(&format!("/api/v1/requests/{}", id)).await;
    assert_eq!(stored.json()["fulfilled_at"], first_fulfilled_at);
}

#[tokio::test]
async fn fulfill_unknown_request_is_not_found() {
    let app = TestApp::new().await;
    let token = app.register_user("requester").await;

    app.post_auth(
        &format!("/api/v1/requests/{}/fulfill", uuid::Uuid::new_v4()),
        &token,
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn listing_filters_by_status() {
    let app = TestApp::new().await;

    let (token, fulfilled_id) = app.create_request("O+", "Chennai", None).await;
    app.create_request("A-", "Madurai", Some("urgent")).await;

    app.post_auth(&format!("/api/v1/requests/{}/fulfill", fulfilled_id), &token)
        .await
        .assert_ok();

    let all = app.get("/api/v1/requests/all").await;
    all.assert_ok();
    assert_eq!(all.json()["count"], 2);

    let pending = app.get("/api/v1/requests/all?status=pending").await;
    assert_eq!(pending.json()["count"], 1);
    assert_eq!(pending.json()["requests"][0]["urgency"], "urgent");
}

#[tokio::test]
async fn my_requests_lists_only_own() {
    let app = TestApp::new().await;

    let (mine, _) = app.create_request("O+", "Chennai", None).await;
    app.create_request("A-", "Madurai", None).await;

    let response = app.get_auth("/api/v1/requests/my-requests", &mine).await;
    response.assert_ok();
    assert_eq!(response.json()["count"], 1);
    assert_eq!(response.json()["requests"][0]["blood_group"], "O+");
}

#[tokio::test]
async fn match_donors_uses_exact_equality() {
    let app = TestApp::new().await;

    app.register_donor("O+", "Chennai", "+911111111111").await;
    app.register_donor("O-", "Chennai", "+912222222222").await;
    app.register_donor("O+", "Madurai", "+913333333333").await;

    let (_token, id) = app.create_request("O+", "Chennai", None).await;

    let response = app
        .get(&format!("/api/v1/requests/{}/match-donors", id))
        .await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["donors"][0]["phone"], "+911111111111");
}

#[tokio::test]
async fn match_donors_excludes_deactivated() {
    let app = TestApp::new().await;

    let (donor_token, _) = app.register_donor("O+", "Chennai", "+911111111111").await;
    app.post_auth("/api/v1/donors/deactivate", &donor_token)
        .await
        .assert_ok();

    let (_token, id) = app.create_request("O+", "Chennai", None).await;

    let response = app
        .get(&format!("/api/v1/requests/{}/match-donors", id))
        .await;
    response.assert_ok();
    assert_eq!(response.json()["count"], 0);
}
