//! Rate limiting middleware
//!
//! Per-IP limiting via governor. Auth endpoints get a tighter budget than the
//! rest of the API to slow down credential stuffing.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::utils::error::ErrorResponse;

type IpLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Rate limiter configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Tight budget for login/registration endpoints
pub fn auth_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        requests_per_second: 2,
        burst_size: 5,
    }
}

/// Standard budget for the rest of the API
pub fn api_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        requests_per_second: 30,
        burst_size: 60,
    }
}

/// Shared map of per-IP limiters
#[derive(Clone)]
pub struct RateLimitState {
    limiters: Arc<RwLock<HashMap<IpAddr, Arc<IpLimiter>>>>,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            limiters: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    async fn limiter_for(&self, ip: IpAddr) -> Arc<IpLimiter> {
        if let Some(limiter) = self.limiters.read().await.get(&ip) {
            return limiter.clone();
        }

        let mut limiters = self.limiters.write().await;
        if let Some(limiter) = limiters.get(&ip) {
            return limiter.clone();
        }

        let quota = Quota::per_second(
            NonZeroU32::new(self.config.requests_per_second).unwrap_or(NonZeroU32::MIN),
        )
        .allow_burst(NonZeroU32::new(self.config.burst_size).unwrap_or(NonZeroU32::MIN));

        let limiter = Arc::new(RateLimiter::direct(quota));
        limiters.insert(ip, limiter.clone());
        limiter
    }

    /// Cap the number of tracked IPs; governor limiters have no idle notion,
    /// so the map is halved once it grows past the cap.
    pub async fn cleanup(&self) {
        const MAX_TRACKED_IPS: usize = 10_000;

        let mut limiters = self.limiters.write().await;
        if limiters.len() > MAX_TRACKED_IPS {
            let to_remove: Vec<_> = limiters.keys().take(limiters.len() / 2).cloned().collect();
            for ip in to_remove {
                limiters.remove(&ip);
            }
        }
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = addr.ip();

    match state.limiter_for(ip).await.check() {
        Ok(_) => next.run(request).await,
        Err(_) => {
            warn!(ip = %ip, "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", "1")],
                Json(ErrorResponse::new(
                    "rate_limited",
                    "Too many requests. Please try again later.",
                )),
            )
                .into_response()
        }
    }
}

/// Spawn the periodic cleanup task for a limiter map
pub fn spawn_rate_limit_cleanup(state: RateLimitState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            state.cleanup().await;
        }
    });
}
