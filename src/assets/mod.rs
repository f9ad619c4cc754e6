//! Asset store subsystem.
//!
//! The host application owns the assets; the server only needs a way to
//! open one by relative path. [`AssetLoader`] is that seam.
//!
//! # Implementations
//! - [`DirAssetLoader`]: files below a directory (used by the binary)
//! - [`MemoryAssets`]: a map of path to bytes (embedding, tests)
//! - [`AssetFn`]: any `Fn(&str) -> io::Result<Asset>`

pub mod dir;
pub mod loader;
pub mod memory;

pub use dir::DirAssetLoader;
pub use loader::{Asset, AssetFn, AssetLoader};
pub use memory::MemoryAssets;
