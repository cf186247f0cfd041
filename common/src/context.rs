//! Per-request context attached by the first middleware.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::IpAddr;
use uuid::Uuid;

/// Who asked for what, and when.
///
/// Created once per request and read-only afterwards; handlers and loggers
/// read it from the request extensions.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub client_ip: Option<IpAddr>,
    pub user_agent: Option<String>,
    pub path: String,
    pub method: String,
}

impl RequestContext {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        client_ip: Option<IpAddr>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            started_at: Utc::now(),
            client_ip,
            user_agent,
            path: path.into(),
            method: method.into(),
        }
    }

    /// Milliseconds since the request was first seen.
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }

    /// Client IP for display, `"unknown"` when not available.
    pub fn client_ip_display(&self) -> String {
        self.client_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Client address: first `X-Forwarded-For` hop if it parses, else the peer.
pub fn client_ip_from(forwarded_for: Option<&str>, peer: Option<IpAddr>) -> Option<IpAddr> {
    forwarded_for
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or(peer)
}
