//! Deck server implementation

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use flipview_common::{ViewerConfig, DEFAULT_VIEWER_PAGE};
use flipview_viewer::DirFetcher;

use crate::deck::summarize;
use crate::static_files::StaticFiles;

/// Default listen address
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:8002";

/// Deck server configuration
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Directory holding the deck and the viewer page
    pub deck_dir: PathBuf,
    /// Page `/` redirects to
    pub index_page: String,
    /// Asset names used by the deck summary
    pub viewer: ViewerConfig,
}

impl WebServerConfig {
    /// Read `FLIPVIEW_DECK_DIR` and `FLIPVIEW_INDEX_PAGE`.
    pub fn from_env() -> Self {
        let deck_dir = std::env::var("FLIPVIEW_DECK_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let index_page = std::env::var("FLIPVIEW_INDEX_PAGE")
            .ok()
            .map(|v| v.trim().trim_start_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VIEWER_PAGE.to_string());

        Self {
            deck_dir,
            index_page,
            viewer: ViewerConfig::default(),
        }
    }
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            deck_dir: PathBuf::from("."),
            index_page: DEFAULT_VIEWER_PAGE.to_string(),
            viewer: ViewerConfig::default(),
        }
    }
}

pub async fn serve(addr: SocketAddr, cfg: WebServerConfig) -> anyhow::Result<()> {
    DeckServer::new(cfg).serve(addr).await
}

/// Web server state
#[derive(Clone)]
pub struct DeckServer {
    state: Arc<DeckServerState>,
}

struct DeckServerState {
    cfg: WebServerConfig,
    static_files: StaticFiles,
    fetcher: DirFetcher,
}

impl DeckServer {
    pub fn new(cfg: WebServerConfig) -> Self {
        Self {
            state: Arc::new(DeckServerState {
                static_files: StaticFiles::new(cfg.deck_dir.clone()),
                fetcher: DirFetcher::new(cfg.deck_dir.clone()),
                cfg,
            }),
        }
    }

    pub fn config(&self) -> &WebServerConfig {
        &self.state.cfg
    }

    /// Create router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/api/deck", get(deck_handler))
            .fallback(static_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        info!(
            "Deck server starting on http://{} (serving {})",
            addr,
            self.state.cfg.deck_dir.display()
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn root_handler(State(state): State<Arc<DeckServerState>>) -> Redirect {
    Redirect::temporary(&format!("/{}", state.cfg.index_page))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "flipview-web",
        "version": flipview_common::VERSION,
    }))
}

async fn deck_handler(State(state): State<Arc<DeckServerState>>) -> Response {
    match summarize(&state.fetcher, &state.cfg.viewer).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Deck summary failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn static_handler(State(state): State<Arc<DeckServerState>>, uri: Uri) -> Response {
    state.static_files.serve(uri.path()).await
}
