//! Middleware components

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthUser, Claims};
pub use rate_limit::{
    api_rate_limit_config, auth_rate_limit_config, rate_limit_middleware, RateLimitState,
};
