//! Health and dashboard endpoints

use crate::common::TestApp;

#[tokio::test]
async fn health_reports_service_and_version() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/health").await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "bloodlink");
}

#[tokio::test]
async fn detailed_health_reports_components() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/health/detailed").await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "ok");
    assert_eq!(body["sms"]["status"], "not_configured");
}

#[tokio::test]
async fn dashboard_stats_count_donors_and_requests() {
    let app = TestApp::new().await;

    let (donor_token, _) = app.register_donor("O+", "Chennai", "+911111111111").await;
    app.register_donor("A-", "Madurai", "+912222222222").await;
    app.post_auth("/api/v1/donors/deactivate", &donor_token)
        .await
        .assert_ok();

    let (token, id) = app.create_request("O+", "Chennai", None).await;
    app.create_request("A-", "Madurai", None).await;
    app.post_auth(&format!("/api/v1/requests/{}/fulfill", id), &token)
        .await
        .assert_ok();

    let response = app.get("/api/v1/dashboard/stats").await;
    response.assert_ok();

    let body = response.json();
    assert_eq!(body["total_donors"], 2);
    assert_eq!(body["available_donors"], 1);
    assert_eq!(body["total_requests"], 2);
    assert_eq!(body["fulfilled_requests"], 1);
    assert_eq!(body["pending_requests"], 1);
}
