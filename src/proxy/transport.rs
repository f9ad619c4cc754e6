//! Outbound HTTP transport.
//!
//! The proxy endpoint hands a finished [`OutboundRequest`] to a
//! [`Transport`] and gets back the upstream response with a streaming body.
//! The production transport is a shared, pooled `reqwest` client; tests plug
//! in their own.

use std::time::Duration;

use axum::body::Body;
use axum::http::Response;
use futures_util::future::BoxFuture;

use crate::config::TimeoutConfig;

use super::error::TransportError;
use super::request::OutboundRequest;

/// Executes outbound requests. Shared by every connection, so it must be
/// safe for concurrent use.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: OutboundRequest)
        -> BoxFuture<'static, Result<Response<Body>, TransportError>>;
}

/// [`Transport`] backed by `reqwest`.
///
/// Redirects are returned to the caller rather than followed, and system
/// proxy settings are ignored.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        request: OutboundRequest,
    ) -> BoxFuture<'static, Result<Response<Body>, TransportError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let OutboundRequest {
                url,
                method,
                headers,
                body,
            } = request;

            let mut builder = client.request(method, url).headers(headers);
            if let Some(body) = body {
                builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
            }

            let upstream = builder.send().await?;

            let mut response = Response::new(Body::empty());
            *response.status_mut() = upstream.status();
            *response.headers_mut() = upstream.headers().clone();
            // carries a non-canonical reason phrase through to the client
            *response.extensions_mut() = upstream.extensions().clone();
            *response.body_mut() = Body::from_stream(upstream.bytes_stream());
            Ok(response)
        })
    }
}
