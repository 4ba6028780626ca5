//! Smoke runner entry point
//!
//! Run against a live server with:
//! `flipview-smoke --base-url http://127.0.0.1:8002`
//! or let it spawn one for a deck directory with `--deck-dir`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use flipview_common::ViewerConfig;
use flipview_e2e::server::ServerConfig;
use flipview_e2e::{E2eResult, RunnerConfig, SmokeRunner};

#[derive(Parser, Debug)]
#[command(name = "flipview-smoke")]
#[command(about = "Smoke diagnostics for a FlipView deck server")]
struct Args {
    /// Probe a running server instead of spawning one
    #[arg(short, long, env = "FLIPVIEW_SMOKE_URL")]
    base_url: Option<String>,

    /// Probe suite file or directory (built-in deck suite when omitted)
    #[arg(short, long)]
    suite: Option<PathBuf>,

    /// Path to deck server binary
    #[arg(long, default_value = "target/debug/flipview-web")]
    server_binary: PathBuf,

    /// Deck directory for a spawned server
    #[arg(long, default_value = ".")]
    deck_dir: PathBuf,

    /// Viewer page
    #[arg(long, default_value = flipview_common::DEFAULT_VIEWER_PAGE)]
    index_page: String,

    /// Port to run server on (0 = auto)
    #[arg(long, default_value = "0")]
    port: u16,

    /// Seconds to wait for a spawned server to become healthy
    #[arg(long, default_value = "30")]
    startup_timeout: u64,

    /// Viewer configuration (TOML) naming the deck assets
    #[arg(long)]
    viewer_config: Option<PathBuf>,

    /// Skip the manifest/markup consistency check
    #[arg(long)]
    no_consistency: bool,

    /// Skip the headless walk through every page
    #[arg(long)]
    no_walk: bool,

    /// Output directory for results
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = tokio::runtime::Runtime::new()
        .map_err(flipview_e2e::E2eError::from)
        .and_then(|rt| rt.block_on(async_main(args)));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let viewer = match &args.viewer_config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let config = RunnerConfig {
        base_url: args.base_url,
        server: ServerConfig {
            binary_path: args.server_binary,
            deck_dir: args.deck_dir,
            index_page: args.index_page,
            port: if args.port == 0 { None } else { Some(args.port) },
            startup_timeout: Duration::from_secs(args.startup_timeout),
        },
        suites: args.suite,
        viewer,
        consistency: !args.no_consistency,
        walk: !args.no_walk,
        output_dir: args.output,
    };

    let mut runner = SmokeRunner::with_config(config);
    let report = runner.run().await?;
    runner.write_results(&report)?;

    Ok(report.is_success())
}
