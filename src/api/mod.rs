//! HTTP API handlers
//!
//! Routes are split into a public router (registration, login, read-only
//! listings, health) and a protected router that runs behind the JWT
//! middleware.

pub mod auth;
pub mod donors;
pub mod health;
pub mod notify;
pub mod requests;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/donors/all", get(donors::list_donors))
        .route("/donors/map", get(donors::map_donors))
        .route("/donors/{id}", get(donors::get_donor))
        .route("/requests/all", get(requests::list_requests))
        .route("/requests/{id}", get(requests::get_request))
        .route("/requests/{id}/match-donors", get(requests::match_donors))
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::health_detailed))
        .route("/dashboard/stats", get(health::dashboard_stats))
}

/// Routes behind the authentication middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/donors/register", post(donors::register_donor))
        .route("/donors/deactivate", post(donors::deactivate_donor))
        .route("/donors/my-profile", get(donors::my_profile))
        .route("/requests/create", post(requests::create_request))
        .route("/requests/my-requests", get(requests::my_requests))
        .route("/requests/{id}/fulfill", post(requests::fulfill_request))
        .route("/notify/request-donors", post(notify::request_donors))
        .route("/notify/contact-donor", post(notify::contact_donor))
}
