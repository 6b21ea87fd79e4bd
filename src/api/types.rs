//! API response types.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap, Version},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

// ==================== Errors ====================

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================== Request Metadata ====================

/// A header value. Headers sent more than once are reported as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderField {
    Single(String),
    Multiple(Vec<String>),
}

/// Server and request details reported for `GET` requests.
///
/// The field set is fixed: unknown values serialize as `null`.
#[derive(Debug, Serialize)]
pub struct RequestMetadata {
    pub server_software: String,
    pub server_name: String,
    pub server_addr: Option<String>,
    pub server_port: Option<u16>,
    pub remote_addr: Option<String>,
    pub remote_port: Option<u16>,
    pub method: String,
    pub uri: String,
    pub path: String,
    pub query: Option<String>,
    pub protocol: String,
    pub host: Option<String>,
    pub headers: BTreeMap<String, HeaderField>,
    pub request_time: String,
    pub request_time_float: f64,
}

impl RequestMetadata {
    /// Capture metadata for `request` as seen at `now`.
    pub fn capture(request: &Request, state: &AppState, now: DateTime<Utc>) -> Self {
        let uri = request.uri();
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let host = request
            .headers()
            .get(header::HOST)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .or_else(|| uri.authority().map(|a| a.to_string()));

        Self {
            server_software: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            server_name: state.server_name.clone(),
            server_addr: state.local_addr.map(|a| a.ip().to_string()),
            server_port: state.local_addr.map(|a| a.port()),
            remote_addr: peer.map(|a| a.ip().to_string()),
            remote_port: peer.map(|a| a.port()),
            method: request.method().to_string(),
            uri: uri.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            protocol: protocol_name(request.version()).to_string(),
            host,
            headers: collect_headers(request.headers()),
            request_time: now.to_rfc3339(),
            request_time_float: now.timestamp_micros() as f64 / 1_000_000.0,
        }
    }
}

/// Protocol string as sent on the request line.
pub fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP",
    }
}

/// Group header values by name, keeping arrival order within a name.
pub fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, HeaderField> {
    let mut fields = BTreeMap::new();

    for name in headers.keys() {
        let mut values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();

        let field = if values.len() == 1 {
            HeaderField::Single(values.remove(0))
        } else {
            HeaderField::Multiple(values)
        };
        fields.insert(name.as_str().to_string(), field);
    }

    fields
}
