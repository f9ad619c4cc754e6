//! Building the outbound request from an inbound one.

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::{Method, Request};
use url::Url;

use super::error::ProxyError;
use super::headers::{rewrite_headers, target_of};
use super::method::{body_mode, BodyMode};

/// Everything the transport needs to perform one upstream call.
#[derive(Debug)]
pub struct OutboundRequest {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    /// Streamed verbatim when present; length unknown.
    pub body: Option<Body>,
}

/// An outbound request together with the overrides for its response.
#[derive(Debug)]
pub struct Prepared {
    pub request: OutboundRequest,
    pub response_overrides: HeaderMap,
}

/// Parse a proxy target. Only absolute `http`/`https` URLs are accepted.
pub fn parse_target(raw: &str) -> Result<Url, ProxyError> {
    let url = Url::parse(raw).map_err(|e| ProxyError::InvalidTarget {
        target: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        scheme => Err(ProxyError::InvalidTarget {
            target: raw.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

/// Validate an inbound proxy request and turn it into an outbound one.
///
/// Fails before touching the body, so a rejected request never causes I/O.
pub fn prepare(request: Request<Body>) -> Result<Prepared, ProxyError> {
    let (parts, body) = request.into_parts();

    let raw_target = target_of(&parts.headers);
    let url = parse_target(raw_target)?;
    let target = HeaderValue::from_str(raw_target).map_err(|e| ProxyError::InvalidTarget {
        target: raw_target.to_string(),
        reason: e.to_string(),
    })?;

    let mode = body_mode(&parts.method)
        .ok_or_else(|| ProxyError::UnsupportedMethod(parts.method.clone()))?;

    let rewrite = rewrite_headers(&parts.headers, &target);
    let mut headers = rewrite.outbound;

    let body = match mode {
        BodyMode::Empty => None,
        BodyMode::Streamed => {
            headers
                .entry(header::CONTENT_TYPE)
                .or_insert_with(|| HeaderValue::from_static("application/octet-stream"));
            Some(body)
        }
    };

    Ok(Prepared {
        request: OutboundRequest {
            url,
            method: parts.method,
            headers,
            body,
        },
        response_overrides: rewrite.response_overrides,
    })
}
