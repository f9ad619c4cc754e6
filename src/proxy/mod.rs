//! Header-rewriting forward proxy.
//!
//! # Data Flow
//! ```text
//! inbound request on /api/proxy
//!     → request.rs (validate x-modreq, classify method)
//!     → headers.rs (split directives into outbound / response overrides)
//!     → transport.rs (execute OutboundRequest)
//!     → handler.rs (overlay overrides on upstream headers)
//!     → streamed back to the client
//!
//! Call states:
//!     Received → Validating → (Rejected | Forwarding)
//!              → (NetworkFailure | Forwarded) → ResponseSent
//! ```
//!
//! # Design Decisions
//! - Rejections happen before the body is touched; no I/O for bad requests
//! - No retries: the browsing client decides whether to try again
//! - Hop-by-hop response headers are passed through unfiltered

pub mod error;
pub mod handler;
pub mod headers;
pub mod method;
pub mod request;
pub mod transport;

pub use error::{ProxyError, TransportError};
pub use handler::forward;
pub use headers::{rewrite_headers, HeaderRewrite};
pub use request::OutboundRequest;
pub use transport::{HttpTransport, Transport};
