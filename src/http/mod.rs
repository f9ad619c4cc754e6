//! HTTP front of the embedded server.
//!
//! # Data Flow
//! ```text
//! TCP connection (one task per connection)
//!     → server.rs (Axum router, path dispatch)
//!     → static_files.rs (asset + 404 fallback chain)
//!       or proxy::forward (header-rewriting proxy)
//!     → Send to client
//! ```

pub mod server;
pub mod static_files;

pub use server::{AppState, LocalServer, ServerError, ServerHandle};
