//! HTTP probe execution

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::suite::{Expectation, Probe};

/// Result of one expectation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: String,
    pub passed: bool,
    pub detail: String,
}

/// Result of running a single probe or diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub name: String,
    pub success: bool,
    #[serde(default)]
    pub advisory: bool,
    pub duration_ms: u64,
    #[serde(default)]
    pub checks: Vec<CheckResult>,
    pub error: Option<String>,
}

impl ProbeResult {
    /// A result whose success is the conjunction of `checks`.
    pub fn from_checks(name: impl Into<String>, advisory: bool, checks: Vec<CheckResult>) -> Self {
        let failed: Vec<&str> = checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.check.as_str())
            .collect();
        let error = (!failed.is_empty()).then(|| format!("failed: {}", failed.join("; ")));
        Self {
            name: name.into(),
            success: failed.is_empty(),
            advisory,
            duration_ms: 0,
            checks,
            error,
        }
    }

    pub fn failure(name: impl Into<String>, advisory: bool, error: impl ToString) -> Self {
        Self {
            name: name.into(),
            success: false,
            advisory,
            duration_ms: 0,
            checks: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }
}

/// Issues probes against one server
#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProbeClient {
    pub fn new(base_url: &str) -> E2eResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and return the body, failing on a non-success status.
    pub async fn get_text(&self, path: &str) -> E2eResult<String> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(E2eError::ProbeFailed {
                probe: path.to_string(),
                reason: format!("HTTP {}", status),
            });
        }
        Ok(response.text().await?)
    }

    /// Run one probe. Transport and status errors become a failed result.
    pub async fn run(&self, probe: &Probe) -> ProbeResult {
        let start = Instant::now();
        let body = match self.get_text(&probe.path).await {
            Ok(body) => body,
            Err(e) => {
                return ProbeResult::failure(&probe.name, probe.advisory, e)
                    .with_duration(start.elapsed())
            }
        };

        let mut checks = vec![CheckResult {
            check: format!("GET {}", probe.path),
            passed: true,
            detail: format!("{} bytes", body.len()),
        }];
        for expectation in &probe.expect {
            checks.push(self.check(expectation, &body).await);
        }

        ProbeResult::from_checks(&probe.name, probe.advisory, checks).with_duration(start.elapsed())
    }

    async fn check(&self, expectation: &Expectation, body: &str) -> CheckResult {
        let check = expectation.describe();
        let outcome = match expectation {
            Expectation::AssetReachable { .. } => match expectation.asset_reference(body) {
                Ok(Some(asset)) => match self.get_text_len(&asset).await {
                    Ok(len) => Ok((true, format!("{} reachable ({} bytes)", asset, len))),
                    Err(e) => Ok((false, format!("{} unreachable: {}", asset, e))),
                },
                Ok(None) => Ok((true, "no asset referenced".to_string())),
                Err(e) => Err(e),
            },
            _ => expectation.evaluate(body).map(|e| (e.passed, e.detail)),
        };

        match outcome {
            Ok((passed, detail)) => CheckResult {
                check,
                passed,
                detail,
            },
            Err(e) => CheckResult {
                check,
                passed: false,
                detail: e.to_string(),
            },
        }
    }

    async fn get_text_len(&self, path: &str) -> E2eResult<usize> {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(E2eError::ProbeFailed {
                probe: path.to_string(),
                reason: format!("HTTP {}", status),
            });
        }
        Ok(response.bytes().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, passed: bool) -> CheckResult {
        CheckResult {
            check: name.to_string(),
            passed,
            detail: String::new(),
        }
    }

    #[test]
    fn test_from_checks() {
        let ok = ProbeResult::from_checks("ok", false, vec![check("a", true), check("b", true)]);
        assert!(ok.success);
        assert!(ok.error.is_none());

        let bad = ProbeResult::from_checks("bad", true, vec![check("a", true), check("b", false)]);
        assert!(!bad.success);
        assert!(bad.advisory);
        assert_eq!(bad.error.as_deref(), Some("failed: b"));
    }

    #[test]
    fn test_url_joining() {
        let client = ProbeClient::with_client(reqwest::Client::new(), "http://127.0.0.1:8002/");
        assert_eq!(client.url("/metadata.json"), "http://127.0.0.1:8002/metadata.json");
        assert_eq!(client.url("images/a.png"), "http://127.0.0.1:8002/images/a.png");
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_probe() {
        let client = ProbeClient::new("http://127.0.0.1:9").unwrap();
        let probe = Probe {
            name: "manifest".to_string(),
            path: "metadata.json".to_string(),
            advisory: false,
            expect: Vec::new(),
        };
        let result = client.run(&probe).await;
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}
