//! Smoke runner: probes, deck consistency and the headless walk against one server

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

use flipview_common::ViewerConfig;
use flipview_viewer::HttpFetcher;

use crate::deck::deck_results;
use crate::error::{E2eError, E2eResult};
use crate::probe::{ProbeClient, ProbeResult};
use crate::server::{ServerConfig, ServerHandle};
use crate::suite::{ProbeSuite, SuiteOptions};
use crate::walk::walk_result;

/// Result of a whole smoke run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeReport {
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Advisory results that did not pass
    pub warned: usize,
    pub duration_ms: u64,
    pub results: Vec<ProbeResult>,
}

impl SmokeReport {
    pub fn from_results(base_url: &str, results: Vec<ProbeResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        let warned = results.iter().filter(|r| !r.success && r.advisory).count();
        let failed = results.len() - passed - warned;
        Self {
            base_url: base_url.to_string(),
            total: results.len(),
            passed,
            failed,
            warned,
            duration_ms,
            results,
        }
    }

    /// Share of non-advisory results that passed, rounded to a whole percent.
    pub fn success_rate(&self) -> u32 {
        let counted = self.passed + self.failed;
        if counted == 0 {
            return 0;
        }
        ((self.passed as f64 / counted as f64) * 100.0).round() as u32
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Configuration for the smoke runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Probe an already running server instead of spawning one
    pub base_url: Option<String>,
    pub server: ServerConfig,
    /// Suite file or directory; the built-in suite when unset
    pub suites: Option<PathBuf>,
    pub viewer: ViewerConfig,
    pub consistency: bool,
    pub walk: bool,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            server: ServerConfig::default(),
            suites: None,
            viewer: ViewerConfig::default(),
            consistency: true,
            walk: true,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Main smoke runner
pub struct SmokeRunner {
    config: RunnerConfig,
    server: Option<ServerHandle>,
}

impl SmokeRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            config,
            server: None,
        }
    }

    /// Spawn the server unless a base URL was given; returns the URL to probe.
    pub async fn start_server(&mut self) -> E2eResult<String> {
        if let Some(url) = &self.config.base_url {
            return Ok(url.trim_end_matches('/').to_string());
        }
        if let Some(server) = &self.server {
            return Ok(server.base_url().to_string());
        }

        let server = ServerHandle::spawn(self.config.server.clone()).await?;
        let url = server.base_url().to_string();
        self.server = Some(server);
        Ok(url)
    }

    pub fn stop_server(&mut self) -> E2eResult<()> {
        if let Some(mut server) = self.server.take() {
            server.stop()?;
        }
        Ok(())
    }

    fn suites(&self) -> E2eResult<Vec<ProbeSuite>> {
        match &self.config.suites {
            Some(path) => {
                let suites = ProbeSuite::load_all(path)?;
                if suites.is_empty() {
                    return Err(E2eError::SuiteParse(format!(
                        "no suites found in {}",
                        path.display()
                    )));
                }
                Ok(suites)
            }
            None => {
                let options =
                    SuiteOptions::new(self.config.viewer.clone(), &self.config.server.index_page);
                Ok(vec![ProbeSuite::builtin(&options)])
            }
        }
    }

    /// Run every suite plus the enabled diagnostics.
    pub async fn run(&mut self) -> E2eResult<SmokeReport> {
        let start = Instant::now();
        let suites = self.suites()?;
        let base_url = self.start_server().await?;
        let client = ProbeClient::new(&base_url)?;

        let mut results = Vec::new();
        for suite in &suites {
            info!("Running suite {} ({} probes)", suite.name, suite.probes.len());
            for probe in &suite.probes {
                let result = client.run(probe).await;
                log_result(&result);
                results.push(result);
            }
        }

        if self.config.consistency || self.config.walk {
            let fetcher = HttpFetcher::with_client(client.client().clone(), base_url.clone());

            if self.config.consistency {
                for result in deck_results(&fetcher, &self.config.viewer).await {
                    log_result(&result);
                    results.push(result);
                }
            }

            if self.config.walk {
                let result = walk_result(&fetcher, self.config.viewer.clone()).await;
                log_result(&result);
                results.push(result);
            }
        }

        let report =
            SmokeReport::from_results(&base_url, results, start.elapsed().as_millis() as u64);

        info!("");
        info!(
            "Smoke results: {} passed, {} failed, {} warnings ({} ms)",
            report.passed, report.failed, report.warned, report.duration_ms
        );
        info!("Success rate: {}%", report.success_rate());

        Ok(report)
    }

    /// Write results to JSON file
    pub fn write_results(&self, report: &SmokeReport) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("smoke-results.json");
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for SmokeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SmokeRunner {
    fn drop(&mut self) {
        let _ = self.stop_server();
    }
}

fn log_result(result: &ProbeResult) {
    let detail = result.error.as_deref().unwrap_or("unknown error");
    if result.success {
        info!("✓ {} ({} ms)", result.name, result.duration_ms);
    } else if result.advisory {
        warn!("⚠ {} - {}", result.name, detail);
    } else {
        error!("✗ {} - {}", result.name, detail);
    }
}
