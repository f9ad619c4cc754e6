//! Asset loader contract and the assets it hands back.

use std::fmt;
use std::io;
use std::pin::Pin;

use axum::body::Body;
use bytes::Bytes;
use futures_util::future::BoxFuture;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// An opened asset, ready to be streamed into a response body.
pub struct Asset {
    source: Source,
}

enum Source {
    Bytes(Bytes),
    Reader(Pin<Box<dyn AsyncRead + Send>>),
}

impl Asset {
    /// An asset held fully in memory. Sent with a fixed content length.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            source: Source::Bytes(bytes.into()),
        }
    }

    /// An asset read incrementally. Sent chunked.
    pub fn from_reader(reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            source: Source::Reader(Box::pin(reader)),
        }
    }

    /// Convert into a response body without buffering reader-backed assets.
    pub fn into_body(self) -> Body {
        match self.source {
            Source::Bytes(bytes) => Body::from(bytes),
            Source::Reader(reader) => Body::from_stream(ReaderStream::new(reader)),
        }
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Bytes(bytes) => f.debug_struct("Asset").field("len", &bytes.len()).finish(),
            Source::Reader(_) => f.debug_struct("Asset").field("len", &"streamed").finish(),
        }
    }
}

/// Maps a relative asset path (no leading slash) to a readable byte stream.
///
/// Implementations must fail with [`io::ErrorKind::NotFound`] when the path
/// does not name an asset. The server treats every error as a miss, but
/// only `NotFound` is considered routine.
pub trait AssetLoader: Send + Sync + 'static {
    fn open<'a>(&'a self, path: &'a str) -> BoxFuture<'a, io::Result<Asset>>;
}

/// Adapts a plain function into an [`AssetLoader`].
///
/// This is the shape a host application usually has at hand: something like
/// "open this bundled file".
pub struct AssetFn<F>(pub F);

impl<F> AssetLoader for AssetFn<F>
where
    F: Fn(&str) -> io::Result<Asset> + Send + Sync + 'static,
{
    fn open<'a>(&'a self, path: &'a str) -> BoxFuture<'a, io::Result<Asset>> {
        let result = (self.0)(path);
        Box::pin(async move { result })
    }
}

impl<F> fmt::Debug for AssetFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AssetFn")
    }
}

pub(crate) fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("asset not found: {path}"))
}
