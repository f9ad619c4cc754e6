//! In-memory asset store.

use std::collections::HashMap;
use std::io;

use bytes::Bytes;
use futures_util::future::BoxFuture;

use super::loader::{not_found, Asset, AssetLoader};

/// A fixed set of assets held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Bytes>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Bytes>) -> &mut Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn with(mut self, path: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetLoader for MemoryAssets {
    fn open<'a>(&'a self, path: &'a str) -> BoxFuture<'a, io::Result<Asset>> {
        let result = self
            .files
            .get(path)
            .cloned()
            .map(Asset::from_bytes)
            .ok_or_else(|| not_found(path));
        Box::pin(async move { result })
    }
}
