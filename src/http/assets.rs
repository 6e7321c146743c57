//! Static front end.
//!
//! The `assets/` directory is compiled into the binary and served as the
//! router's fallback. A configured directory (`ASSETS_DIR` or `[assets].dir`)
//! replaces it with files read from disk through `ServeDir`.

use std::fmt;
use std::path::{Path, PathBuf};

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use rust_embed::Embed;
use tower_http::services::ServeDir;

/// Front-end files compiled from `assets/`.
#[derive(Embed)]
#[folder = "assets/"]
struct BundledAssets;

const INDEX: &str = "index.html";

/// Where static requests are answered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Files compiled into the binary.
    Bundled,
    /// An on-disk override.
    Directory(PathBuf),
}

impl AssetSource {
    /// Use the configured directory when it exists, else the bundled files.
    pub fn resolve(configured: Option<&Path>) -> Self {
        match configured {
            Some(path) if path.is_dir() => {
                tracing::info!(path = %path.display(), "Serving assets from configured directory");
                AssetSource::Directory(path.to_path_buf())
            }
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "Configured assets directory does not exist; serving bundled assets"
                );
                AssetSource::Bundled
            }
            None => AssetSource::Bundled,
        }
    }

    /// Install this source as the router's fallback.
    pub fn attach<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self {
            AssetSource::Bundled => router.fallback(serve_bundled),
            AssetSource::Directory(dir) => router.fallback_service(ServeDir::new(dir)),
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Bundled => write!(f, "bundled"),
            AssetSource::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

async fn serve_bundled(uri: Uri) -> Response {
    let mut path = uri.path().trim_start_matches('/').to_string();
    if path.is_empty() || path.ends_with('/') {
        path.push_str(INDEX);
    }

    match BundledAssets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 page not found\n").into_response(),
    }
}
