//! Proxy failures and the responses they turn into.

use std::error::Error as _;

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};

/// Failure of an outbound call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("{}", describe(.0))]
    Http(#[from] reqwest::Error),
    /// A transport-specific failure without a richer error type.
    #[error("{0}")]
    Other(String),
}

/// The error followed by its causes, which for reqwest carry the detail
/// (refused, timed out, dns failure, ...).
fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Terminal states of a proxy call other than a forwarded response.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// `x-modreq` is missing or not an absolute http(s) URL.
    #[error("x-modreq is invalid url: '{target}' ({reason})")]
    InvalidTarget { target: String, reason: String },

    /// The inbound verb has no forwarding rule.
    #[error("request method is not supported: {0}")]
    UnsupportedMethod(Method),

    /// The upstream call failed; nothing was received.
    #[error("fail to proxy, network error, reason: {0}")]
    Upstream(#[from] TransportError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget { .. } => StatusCode::BAD_REQUEST,
            ProxyError::UnsupportedMethod(_) => StatusCode::NOT_ACCEPTABLE,
            ProxyError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
