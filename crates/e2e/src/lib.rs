//! FlipView Smoke Diagnostics
//!
//! Checks a running deck server the way a browser viewer would use it:
//! - Spawns the deck server as a subprocess, or probes a given URL
//! - Runs declarative YAML probe suites (or the built-in deck suite)
//! - Cross-checks the manifest against the markup source
//! - Walks every page with the real viewer controller on a headless surface
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Smoke Runner (Rust)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SmokeRunner                                                │
//! │    ├── start_server() -> base URL                           │
//! │    ├── ProbeClient::run(probe) -> ProbeResult               │
//! │    ├── deck_results(fetcher) -> [ProbeResult]               │
//! │    └── walk_result(fetcher) -> ProbeResult                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ProbeSuite (YAML)                                          │
//! │    ├── name, description                                    │
//! │    └── probes: [Probe { name, path, advisory, expect }]     │
//! │          ├── contains { text }                              │
//! │          ├── any_of { texts }                               │
//! │          ├── regex { pattern, min_count }                   │
//! │          ├── json_field { field }                           │
//! │          └── asset_reachable { pattern }                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod deck;
pub mod error;
pub mod probe;
pub mod runner;
pub mod server;
pub mod suite;
pub mod walk;

pub use error::{E2eError, E2eResult};
pub use probe::{CheckResult, ProbeClient, ProbeResult};
pub use runner::{RunnerConfig, SmokeReport, SmokeRunner};
pub use suite::{Expectation, Probe, ProbeSuite, SuiteOptions};
