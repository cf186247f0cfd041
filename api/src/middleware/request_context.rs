//! First middleware in the stack: builds the [`RequestContext`].

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header::USER_AGENT, HeaderValue},
    middleware::Next,
    response::Response,
};
use common::{client_ip_from, RequestContext};
use tracing::Instrument;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attach a [`RequestContext`] to the request extensions, run the rest of the
/// stack inside a span carrying the request id, and log the outcome.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let forwarded_for = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let ctx = RequestContext::new(
        req.method().as_str(),
        req.uri().path(),
        client_ip_from(forwarded_for, peer),
        user_agent,
    );
    req.extensions_mut().insert(ctx.clone());

    let span = tracing::info_span!("request", request_id = %ctx.request_id);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    tracing::info!(
        request_id = %ctx.request_id,
        method = %ctx.method,
        path = %ctx.path,
        status = response.status().as_u16(),
        elapsed_ms = ctx.elapsed_ms(),
        client_ip = %ctx.client_ip_display(),
        "Request completed"
    );

    response
}
