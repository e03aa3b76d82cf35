//! BloodLink backend
//!
//! Matches blood donors with requesters by blood group and district, relays
//! SMS alerts to matched donors and expires stale donor profiles in the
//! background.

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::middleware::{
    api_rate_limit_config, auth_middleware, auth_rate_limit_config, rate_limit_middleware,
    RateLimitState,
};
use crate::services::SmsClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    /// Absent when no SMS provider is configured; dispatch then records
    /// every delivery as failed instead of erroring
    pub sms: Option<Arc<SmsClient>>,
}

/// Build the application router
///
/// Public routes carry the tight auth rate limit, protected routes run
/// behind the JWT middleware plus the standard API limit.
pub fn create_router(state: AppState) -> Router {
    let auth_limiter = RateLimitState::new(auth_rate_limit_config());
    let api_limiter = RateLimitState::new(api_rate_limit_config());

    middleware::rate_limit::spawn_rate_limit_cleanup(auth_limiter.clone());
    middleware::rate_limit::spawn_rate_limit_cleanup(api_limiter.clone());

    let public = api::public_routes().layer(axum_middleware::from_fn_with_state(
        auth_limiter,
        rate_limit_middleware,
    ));

    let protected = api::protected_routes()
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            api_limiter,
            rate_limit_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
