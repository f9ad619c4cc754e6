//! Header rewrite directives.
//!
//! Clients of the proxy endpoint steer header handling with reserved
//! prefixes:
//!
//! | inbound header        | effect                                        |
//! |-----------------------|-----------------------------------------------|
//! | `x-modreq`            | target URL, never forwarded                   |
//! | `x-modreq-<name>`     | sent upstream as `<name>`                     |
//! | `x-modres-<name>`     | set on the final response as `<name>`         |
//! | `host`                | dropped, the client sets the target's host    |
//! | anything else         | forwarded unchanged                           |
//!
//! Rewriting reads an immutable snapshot and builds fresh maps.

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Header carrying the proxy target URL.
pub const TARGET_HEADER: &str = "x-modreq";
/// Prefix for headers that override the outbound request.
pub const REQUEST_PREFIX: &str = "x-modreq-";
/// Prefix for headers that override the final response.
pub const RESPONSE_PREFIX: &str = "x-modres-";

/// Result of splitting inbound headers into their two destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderRewrite {
    /// Headers for the outbound request.
    pub outbound: HeaderMap,
    /// Headers to force onto the final response.
    pub response_overrides: HeaderMap,
}

/// Read the raw target URL. Missing or non-UTF-8 values read as empty.
pub fn target_of(headers: &HeaderMap) -> &str {
    headers
        .get(TARGET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Split `inbound` into outbound request headers and response overrides.
///
/// `referer` defaults to `target`. Framing headers are not copied since the
/// outbound body is re-framed by the transport. A directive wins over a plain
/// header with the same resulting name, `referer` included.
pub fn rewrite_headers(inbound: &HeaderMap, target: &HeaderValue) -> HeaderRewrite {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    let mut request_overrides = HeaderMap::new();
    let mut response_overrides = HeaderMap::new();

    for (name, value) in inbound {
        let key = name.as_str();
        if key == TARGET_HEADER
            || name == header::HOST
            || name == header::CONTENT_LENGTH
            || name == header::TRANSFER_ENCODING
        {
            continue;
        }

        if let Some(stripped) = key.strip_prefix(REQUEST_PREFIX) {
            if let Some(renamed) = rename(stripped) {
                request_overrides.append(renamed, value.clone());
            }
        } else if let Some(stripped) = key.strip_prefix(RESPONSE_PREFIX) {
            if let Some(renamed) = rename(stripped) {
                response_overrides.append(renamed, value.clone());
            }
        } else {
            outbound.append(name.clone(), value.clone());
        }
    }

    outbound.insert(header::REFERER, target.clone());
    overlay(&mut outbound, request_overrides);

    HeaderRewrite {
        outbound,
        response_overrides,
    }
}

/// Replace every header in `base` that `overrides` names.
///
/// All values of an overriding header survive; all values it replaces are
/// dropped. Multi-valued headers are therefore replaced, never merged.
pub fn overlay(base: &mut HeaderMap, overrides: HeaderMap) {
    let mut current: Option<HeaderName> = None;
    for (name, value) in overrides {
        match name {
            Some(name) => {
                base.insert(name.clone(), value);
                current = Some(name);
            }
            None => {
                if let Some(name) = &current {
                    base.append(name.clone(), value);
                }
            }
        }
    }
}

fn rename(stripped: &str) -> Option<HeaderName> {
    // A nested directive would surface as a literal `x-modreq*`/`x-modres*`.
    if stripped.starts_with(TARGET_HEADER) || stripped.starts_with("x-modres") {
        return None;
    }
    // `x-modreq-` alone leaves an empty name.
    HeaderName::from_bytes(stripped.as_bytes()).ok()
}
