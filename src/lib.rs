//! Embedded local HTTP server: bundled assets plus a header-rewriting proxy.

pub mod assets;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use assets::{Asset, AssetLoader, DirAssetLoader, MemoryAssets};
pub use config::ServerConfig;
pub use http::{LocalServer, ServerHandle};
pub use lifecycle::Shutdown;
