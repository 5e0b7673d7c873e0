//! Request admission (C14): rate limiting, API key and origin checks, and
//! CORS preflight, combined per endpoint.

pub mod api_key;
pub mod cors;
pub mod origin;
pub mod rate_limit;

use std::time::Duration;

use axum::http::HeaderMap;

use crate::config::AdmissionConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::utils::header_utils::extract_client_ip_or_remote;

pub use rate_limit::FixedWindowLimiter;

/// Process-wide admission state: one rate limiter per endpoint class plus
/// the static configuration (allow-lists, production flag). Cloning is
/// cheap — the limiters are `Arc`-backed `DashMap`s.
#[derive(Clone)]
pub struct Admission {
    config: AdmissionConfig,
    production: bool,
    chat_limiter: FixedWindowLimiter,
    health_limiter: FixedWindowLimiter,
}

impl Admission {
    pub fn new(config: AdmissionConfig, production: bool) -> Self {
        Self {
            config,
            production,
            chat_limiter: FixedWindowLimiter::new(),
            health_limiter: FixedWindowLimiter::new(),
        }
    }

    /// Full admission for `POST /chat`: rate limit, then API key, then
    /// origin, in that order, short-circuiting on the first failure.
    pub fn check_chat(
        &self,
        headers: &HeaderMap,
        remote: Option<std::net::SocketAddr>,
    ) -> ServiceResult<()> {
        let client_ip = extract_client_ip_or_remote(headers, remote);
        self.chat_limiter
            .check(
                &client_ip,
                Duration::from_secs(self.config.chat_rate_limit_window_secs),
                self.config.chat_rate_limit_max,
            )
            .map_err(|retry_after_secs| ServiceError::RateLimited { retry_after_secs })?;

        api_key::check(headers, &self.config.api_keys, self.production)?;
        origin::check(
            headers.get("origin").and_then(|v| v.to_str().ok()),
            &self.config.allowed_origins,
            self.production,
        )?;
        Ok(())
    }

    /// `GET /health` is rate-limited only, at its own (more generous) quota.
    pub fn check_health(
        &self,
        headers: &HeaderMap,
        remote: Option<std::net::SocketAddr>,
    ) -> ServiceResult<()> {
        let client_ip = extract_client_ip_or_remote(headers, remote);
        self.health_limiter
            .check(
                &client_ip,
                Duration::from_secs(self.config.health_rate_limit_window_secs),
                self.config.health_rate_limit_max,
            )
            .map_err(|retry_after_secs| ServiceError::RateLimited { retry_after_secs })
    }

    /// Drop stale rate-limit windows; invoked by the periodic sweep task.
    pub fn sweep(&self) {
        self.chat_limiter.sweep();
        self.health_limiter.sweep();
    }
}
