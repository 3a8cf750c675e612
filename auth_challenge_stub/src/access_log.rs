//! Access-log lines in the classic `host ident user [time] "request" status size` shape.

use axum::{
    extract::{ConnectInfo, Request},
    http::{Method, StatusCode, Uri, Version},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Local, TimeZone};
use std::{fmt::Display, net::SocketAddr};
use tracing::info;

pub fn format_access_line<Tz>(
    peer: &str,
    at: &DateTime<Tz>,
    method: &Method,
    uri: &Uri,
    version: Version,
    status: StatusCode,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{peer} - - [{}] \"{method} {uri} {version:?}\" {} -",
        at.format("%d/%b/%Y %H:%M:%S"),
        status.as_u16()
    )
}

/// Middleware logging one line per request once the response is known.
pub async fn log_access(request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let response = next.run(request).await;

    let line = format_access_line(
        &peer,
        &Local::now(),
        &method,
        &uri,
        version,
        response.status(),
    );
    info!(target: "access", "{}", line);
    response
}
