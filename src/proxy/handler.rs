//! The `/api/proxy` endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};

use super::error::ProxyError;
use super::headers::overlay;
use super::request::prepare;
use super::transport::Transport;

/// Forward one inbound request to the URL named by its `x-modreq` header.
///
/// Client mistakes are rejected before any network I/O. Transport failures
/// become a 503 carrying the failure reason. On success the upstream status
/// and body are passed through and `x-modres-*` overrides are laid over the
/// upstream headers.
pub async fn forward(
    transport: Arc<dyn Transport>,
    request: Request<Body>,
) -> Result<Response<Body>, ProxyError> {
    let start = Instant::now();
    let method = request.method().clone();

    let prepared = prepare(request).inspect_err(|e| {
        tracing::warn!(method = %method, error = %e, "Rejected proxy request");
    })?;
    let url = prepared.request.url.clone();

    tracing::debug!(method = %method, url = %url, "Forwarding");

    let mut response = match transport.execute(prepared.request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                method = %method,
                url = %url,
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream error"
            );
            return Err(ProxyError::Upstream(e));
        }
    };

    overlay(response.headers_mut(), prepared.response_overrides);

    tracing::debug!(
        method = %method,
        url = %url,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Forwarded"
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::error::TransportError;
    use crate::proxy::request::OutboundRequest;
    use axum::body::to_bytes;
    use axum::http::{HeaderMap, Method, StatusCode};
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Seen {
        method: Method,
        url: String,
        headers: HeaderMap,
        body: Option<bytes::Bytes>,
    }

    /// Records calls and answers with a fixed upstream response.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<Seen>>,
    }

    impl Transport for Recording {
        fn execute(
            &self,
            request: OutboundRequest,
        ) -> BoxFuture<'static, Result<Response<Body>, TransportError>> {
            let body = request.body.map(|b| {
                futures_util::FutureExt::now_or_never(to_bytes(b, usize::MAX))
                    .and_then(Result::ok)
                    .unwrap_or_default()
            });
            self.calls.lock().unwrap().push(Seen {
                method: request.method,
                url: request.url.to_string(),
                headers: request.headers,
                body,
            });
            Box::pin(async {
                Ok(Response::builder()
                    .status(StatusCode::CREATED)
                    .header("x-custom", "upstream")
                    .header("server", "mock")
                    .body(Body::from("upstream body"))
                    .unwrap())
            })
        }
    }

    struct Refusing;

    impl Transport for Refusing {
        fn execute(
            &self,
            _request: OutboundRequest,
        ) -> BoxFuture<'static, Result<Response<Body>, TransportError>> {
            Box::pin(async { Err(TransportError::Other("connection refused".into())) })
        }
    }

    fn request(method: &str, headers: &[(&str, &str)], body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri("/api/proxy");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn invalid_target_never_reaches_transport() {
        let transport = Arc::new(Recording::default());
        let err = forward(transport.clone(), request("GET", &[("x-modreq", "not a url")], ""))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = forward(transport.clone(), request("GET", &[], "")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsupported_method_never_reaches_transport() {
        let transport = Arc::new(Recording::default());
        let err = forward(
            transport.clone(),
            request("BREW", &[("x-modreq", "http://example.test/")], ""),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_ACCEPTABLE);
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rewrites_and_overrides() {
        let transport = Arc::new(Recording::default());
        let response = forward(
            transport.clone(),
            request(
                "GET",
                &[
                    ("x-modreq", "http://example.test/path"),
                    ("host", "localhost:8123"),
                    ("x-modreq-Accept", "text/plain"),
                    ("x-modres-X-Custom", "injected"),
                ],
                "",
            ),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-custom"], "injected");
        assert_eq!(response.headers().get_all("x-custom").iter().count(), 1);
        assert_eq!(response.headers()["server"], "mock");
        assert!(response.headers().get("x-modres-x-custom").is_none());

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let seen = &calls[0];
        assert_eq!(seen.method, Method::GET);
        assert_eq!(seen.url, "http://example.test/path");
        assert_eq!(seen.headers["accept"], "text/plain");
        assert!(seen.headers.get("x-modreq").is_none());
        assert!(seen.headers.get("x-modreq-accept").is_none());
        assert!(seen.headers.get("host").is_none());
        assert!(seen.body.is_none());
    }

    #[tokio::test]
    async fn post_body_is_handed_over() {
        let transport = Arc::new(Recording::default());
        forward(
            transport.clone(),
            request("POST", &[("x-modreq", "http://example.test/echo")], "hello upstream"),
        )
        .await
        .unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].body.as_deref(), Some(&b"hello upstream"[..]));
        assert_eq!(calls[0].headers["content-type"], "application/octet-stream");
    }

    #[tokio::test]
    async fn transport_failure_is_service_unavailable() {
        let err = forward(
            Arc::new(Refusing),
            request("GET", &[("x-modreq", "http://example.test/")], ""),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("connection refused"));
    }
}
