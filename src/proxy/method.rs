//! Which verbs the proxy forwards, and whether they carry a body.

use axum::http::Method;

/// How a forwarded method treats the inbound body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// No body is sent upstream.
    Empty,
    /// The inbound body is streamed upstream verbatim.
    Streamed,
}

const WEBDAV: [&str; 7] = [
    "PROPFIND", "PROPPATCH", "MKCOL", "MOVE", "COPY", "LOCK", "UNLOCK",
];

/// Classify `method`, returning `None` for verbs the proxy refuses.
pub fn body_mode(method: &Method) -> Option<BodyMode> {
    match *method {
        Method::GET | Method::HEAD => Some(BodyMode::Empty),
        Method::POST
        | Method::PUT
        | Method::DELETE
        | Method::PATCH
        | Method::OPTIONS
        | Method::TRACE
        | Method::CONNECT => Some(BodyMode::Streamed),
        _ if WEBDAV.contains(&method.as_str()) => Some(BodyMode::Streamed),
        _ => None,
    }
}
