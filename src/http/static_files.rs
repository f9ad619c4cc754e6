//! Static asset responses.
//!
//! # Fallback chain
//! ```text
//! open(path)      → 200, type from the file extension
//! open(404 page)  → 404, text/html
//! otherwise       → 404, text/plain "404"
//! ```

use std::io;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::assets::AssetLoader;

/// Content type for an asset path, by extension only.
pub fn mime_for(path: &str) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}

/// Serve `path` from `loader`, falling back to `not_found_page`.
pub async fn serve_asset(loader: &dyn AssetLoader, not_found_page: &str, path: &str) -> Response {
    let miss = match loader.open(path).await {
        Ok(asset) => {
            return (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime_for(path))],
                asset.into_body(),
            )
                .into_response();
        }
        Err(e) => e,
    };

    if miss.kind() == io::ErrorKind::NotFound {
        tracing::debug!(path = %path, "Asset not found");
    } else {
        tracing::warn!(path = %path, error = %miss, "Asset failed to open");
    }

    match loader.open(not_found_page).await {
        Ok(page) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html")],
            page.into_body(),
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "404",
        )
            .into_response(),
    }
}
