//! Static file serving from the deck directory

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Serves files below a root directory
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the file at `rel`, relative to the root.
    pub async fn serve(&self, rel: &str) -> Response {
        let rel = rel.trim_start_matches('/');
        if rel.is_empty() {
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }

        let escapes = Path::new(rel)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            debug!("Refusing {:?}: leaves the deck directory", rel);
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }

        // Symlinks may still point outside the root.
        let Ok(canon_root) = self.root.canonicalize() else {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Bad deck dir").into_response();
        };
        let Ok(canon_req) = self.root.join(rel).canonicalize() else {
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        };
        if !canon_req.starts_with(&canon_root) {
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }

        match tokio::fs::read(&canon_req).await {
            Ok(bytes) => {
                let content_type = guess_content_type(rel);
                (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, content_type)],
                    bytes,
                )
                    .into_response()
            }
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    }
}

fn guess_content_type(path: &str) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() == mime_guess::mime::TEXT {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_string()
    }
}
