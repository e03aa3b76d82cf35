//! Donor lifecycle over the API

use chrono::{Duration, Utc};
use crate::common::TestApp;
use serde_json::json;

use bloodlink::services::DonorService;

fn profile_body(blood_group: &str, district: &str) -> serde_json::Value {
    json!({
        "name": "Asha",
        "blood_group": blood_group,
        "phone": "+919876543210",
        "district": district,
        "hospital": "General Hospital",
    })
}

#[tokio::test]
async fn donor_can_register_and_renew_profile() {
    let app = TestApp::new().await;
    let token = app.register_user("donor").await;

    let created = app
        .post_json_auth(
            "/api/v1/donors/register",
            profile_body("O+", "Chennai"),
            &token,
        )
        .await;
    created.assert_created();
    assert_eq!(created.json()["message"], "Donor profile created");

    // Renewal overwrites every field and answers 200
    let renewed = app
        .post_json_auth(
            "/api/v1/donors/register",
            profile_body("B-", "Madurai"),
            &token,
        )
        .await;
    renewed.assert_ok();

    let body = renewed.json();
    assert_eq!(body["message"], "Donor profile renewed");
    assert_eq!(body["donor"]["blood_group"], "B-");
    assert_eq!(body["donor"]["district"], "Madurai");
    assert_eq!(body["donor"]["is_available"], true);
    assert_eq!(body["donor"]["id"], created.json()["donor"]["id"]);
}

#[tokio::test]
async fn requester_cannot_register_donor_profile() {
    let app = TestApp::new().await;
    let token = app.register_user("requester").await;

    app.post_json_auth(
        "/api/v1/donors/register",
        profile_body("O+", "Chennai"),
        &token,
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn invalid_blood_group_is_rejected() {
    let app = TestApp::new().await;
    let token = app.register_user("donor").await;

    let response = app
        .post_json_auth(
            "/api/v1/donors/register",
            profile_body("C+", "Chennai"),
            &token,
        )
        .await;
    assert!(response.status.is_client_error(), "body: {}", response.text());
}

#[tokio::test]
async fn deactivate_hides_donor_from_default_listing() {
    let app = TestApp::new().await;
    let (token, _id) = app.register_donor("O+", "Chennai", "+919876543210").await;

    let response = app.post_auth("/api/v1/donors/deactivate", &token).await;
    response.assert_ok();
    assert_eq!(response.json()["donor"]["is_available"], false);

    let listing = app.get("/api/v1/donors/all").await;
    listing.assert_ok();
    assert_eq!(listing.json()["count"], 0);

    let all = app.get("/api/v1/donors/all?available_only=false").await;
    assert_eq!(all.json()["count"], 1);
}

#[tokio::test]
async fn deactivate_without_profile_is_not_found() {
    let app = TestApp::new().await;
    let token = app.register_user("donor").await;

    app.post_auth("/api/v1/donors/deactivate", &token)
        .await
        .assert_not_found();
}

#[tokio::test]
async fn my_profile_roundtrip() {
    let app = TestApp::new().await;
    let token = app.register_user("donor").await;

    app.get_auth("/api/v1/donors/my-profile", &token)
        .await
        .assert_not_found();

    app.post_json_auth(
        "/api/v1/donors/register",
        profile_body("AB+", "Chennai"),
        &token,
    )
    .await
    .assert_created();

    let response = app.get_auth("/api/v1/donors/my-profile", &token).await;
    response.assert_ok();
    assert_eq!(response.json()["blood_group"], "AB+");
}

#[tokio::test]
async fn donor_is_publicly_readable_by_id() {
    let app = TestApp::new().await;
    let (_token, id) = app.register_donor("O-", "Salem", "+919876543210").await;

    let response = app.get(&format!("/api/v1/donors/{}", id)).await;
    response.assert_ok();
    assert_eq!(response.json()["district"], "Salem");

    app.get(&format!("/api/v1/donors/{}", uuid::Uuid::new_v4()))
        .await
        .assert_not_found();
}

#[tokio::test]
async fn map_listing_only_shows_located_donors() {
    let app = TestApp::new().await;

    app.register_donor("O+", "Chennai", "+919876543210").await;

    let token = app.register_user("donor").await;
    let mut located = profile_body("O+", "Chennai");
    located["latitude"] = json!(13.0827);
    located["longitude"] = json!(80.2707);
    app.post_json_auth("/api/v1/donors/register", located, &token)
        .await
        .assert_created();

    let response = app.get("/api/v1/donors/map").await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["donors"][0]["latitude"], 13.0827);
}

#[tokio::test]
async fn expired_donor_drops_out_after_sweep_and_returns_on_renewal() {
    let app = TestApp::new().await;
    let (token, _id) = app.register_donor("O+", "Chennai", "+919876543210").await;

    // Backdate the profile 15 days
    let registered = Utc::now() - Duration::days(15);
    sqlx::query("UPDATE donors SET registered_at = ?, auto_remove_date = ?")
        .bind(registered.to_rfc3339())
        .bind((registered + Duration::days(14)).to_rfc3339())
        .execute(&app.state.db)
        .await
        .unwrap();

    let service = DonorService::new(app.state.db.clone(), 14);
    assert_eq!(service.sweep_expired(Utc::now()).await.unwrap(), 1);
    assert_eq!(service.sweep_expired(Utc::now()).await.unwrap(), 0);

    assert_eq!(app.get("/api/v1/donors/all").await.json()["count"], 0);

    // Renewal restores availability with a fresh window
    app.post_json_auth(
        "/api/v1/donors/register",
        profile_body("O+", "Chennai"),
        &token,
    )
    .await
    .assert_ok();

    assert_eq!(app.get("/api/v1/donors/all").await.json()["count"], 1);
}

#[tokio::test]
async fn listing_filters_by_group_and_district() {
    let app = TestApp::new().await;

    app.register_donor("O+", "Chennai", "+911111111111").await;
    app.register_donor("O+", "Madurai", "+912222222222").await;
    app.register_donor("A-", "Chennai", "+913333333333").await;

    let filtered = app
        .get("/api/v1/donors/all?blood_group=O%2B&district=Chennai")
        .await;
    filtered.assert_ok();
    assert_eq!(filtered.json()["count"], 1);
    assert_eq!(filtered.json()["donors"][0]["phone"], "+911111111111");
}
