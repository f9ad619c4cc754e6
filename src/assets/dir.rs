//! Assets served from a directory on disk.

use std::io;
use std::path::{Component, Path, PathBuf};

use futures_util::future::BoxFuture;

use super::loader::{not_found, Asset, AssetLoader};

/// Loads assets from files below a root directory.
///
/// Paths are resolved relative to the root. Anything that would leave the
/// root (`..`, absolute paths, drive prefixes) is reported as not found,
/// and so are directories.
#[derive(Debug, Clone)]
pub struct DirAssetLoader {
    root: PathBuf,
}

impl DirAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

impl AssetLoader for DirAssetLoader {
    fn open<'a>(&'a self, path: &'a str) -> BoxFuture<'a, io::Result<Asset>> {
        Box::pin(async move {
            let full = self.resolve(path).ok_or_else(|| not_found(path))?;
            let file = tokio::fs::File::open(&full).await?;
            if file.metadata().await?.is_dir() {
                return Err(not_found(path));
            }
            Ok(Asset::from_reader(file))
        })
    }
}
