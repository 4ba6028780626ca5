use std::net::SocketAddr;

use tracing::info;

use flipview_web::server::{WebServerConfig, DEFAULT_WEB_ADDR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let web_addr: SocketAddr = std::env::var("FLIPVIEW_WEB_ADDR")
        .unwrap_or_else(|_| DEFAULT_WEB_ADDR.to_string())
        .parse()?;

    let cfg = WebServerConfig::from_env();
    if !cfg.deck_dir.is_dir() {
        anyhow::bail!("deck directory {} does not exist", cfg.deck_dir.display());
    }

    info!(
        "Starting FlipView deck server on http://{} (index: {})",
        web_addr, cfg.index_page
    );

    flipview_web::server::serve(web_addr, cfg).await
}
