//! Health and dashboard endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db;
use crate::services::{DonorService, RequestService};
use crate::utils::error::AppResult;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ComponentStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub database: ComponentStatus,
    pub sms: ComponentStatus,
}

#[derive(Serialize)]
pub struct DashboardStats {
    pub total_donors: i64,
    pub available_donors: i64,
    pub total_requests: i64,
    pub fulfilled_requests: i64,
    pub pending_requests: i64,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let database = match db::check_health(&state.db).await {
        Ok(()) => ComponentStatus {
            status: "ok",
            detail: None,
        },
        Err(e) => ComponentStatus {
            status: "error",
            detail: Some(e.to_string()),
        },
    };

    let sms = if state.sms.is_some() {
        ComponentStatus {
            status: "configured",
            detail: None,
        }
    } else {
        ComponentStatus {
            status: "not_configured",
            detail: Some("SMS deliveries will be recorded as failed".to_string()),
        }
    };

    let status = if database.status == "ok" { "ok" } else { "degraded" };

    Json(DetailedHealthResponse {
        status,
        database,
        sms,
    })
}

/// GET /dashboard/stats
pub async fn dashboard_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let donors = DonorService::new(state.db.clone(), state.config.donor.expiry_days);
    let requests = RequestService::new(state.db.clone());

    let total_donors = donors.count_total().await?;
    let available_donors = donors.count_available().await?;
    let total_requests = requests.count_total().await?;
    let fulfilled_requests = requests.count_fulfilled().await?;
    let pending_requests = requests.count_pending().await?;

    Ok(Json(DashboardStats {
        total_donors,
        available_donors,
        total_requests,
        fulfilled_requests,
        pending_requests,
    }))
}
