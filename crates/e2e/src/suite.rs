//! Declarative YAML probe suites

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use flipview_common::ViewerConfig;

use crate::error::{E2eError, E2eResult};

/// A set of HTTP probes parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSuite {
    /// Unique name for this suite
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Probes to run in order
    pub probes: Vec<Probe>,
}

/// One GET request and the expectations on its body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Probe {
    pub name: String,

    /// Path relative to the server base URL
    pub path: String,

    /// Advisory probes warn instead of failing the run
    #[serde(default)]
    pub advisory: bool,

    #[serde(default)]
    pub expect: Vec<Expectation>,
}

/// A check on a probe's response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Expectation {
    /// Body contains the text
    Contains { text: String },

    /// Body contains at least one of the texts
    AnyOf { texts: Vec<String> },

    /// Body matches the pattern at least `min_count` times
    Regex {
        pattern: String,
        #[serde(default = "default_min_count")]
        min_count: usize,
    },

    /// Body is a JSON object with a non-null `field`
    JsonField { field: String },

    /// The first capture of `pattern` in the body names an asset that must
    /// be reachable. Passes when nothing matches.
    AssetReachable { pattern: String },
}

fn default_min_count() -> usize {
    1
}

/// Outcome of a body-only check
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub passed: bool,
    pub detail: String,
}

impl Evaluation {
    fn pass(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: detail.into(),
        }
    }
}

impl Expectation {
    /// Short label for reports
    pub fn describe(&self) -> String {
        match self {
            Expectation::Contains { text } => format!("contains {:?}", text),
            Expectation::AnyOf { texts } => format!("contains any of {:?}", texts),
            Expectation::Regex { pattern, min_count } => {
                format!("matches /{}/ at least {}x", pattern, min_count)
            }
            Expectation::JsonField { field } => format!("has JSON field {:?}", field),
            Expectation::AssetReachable { pattern } => format!("asset /{}/ reachable", pattern),
        }
    }

    /// Evaluate against `body`. `AssetReachable` needs a second request and
    /// is resolved by the runner through [`Expectation::asset_reference`].
    pub fn evaluate(&self, body: &str) -> E2eResult<Evaluation> {
        let evaluation = match self {
            Expectation::Contains { text } => {
                if body.contains(text.as_str()) {
                    Evaluation::pass("found")
                } else {
                    Evaluation::fail(format!("{:?} not found", text))
                }
            }
            Expectation::AnyOf { texts } => match texts.iter().find(|t| body.contains(t.as_str())) {
                Some(found) => Evaluation::pass(format!("found {:?}", found)),
                None => Evaluation::fail("none found"),
            },
            Expectation::Regex { pattern, min_count } => {
                let re = Regex::new(pattern)?;
                let count = re.find_iter(body).count();
                let samples: Vec<&str> = re.find_iter(body).take(5).map(|m| m.as_str()).collect();
                let detail = format!("{} matches ({})", count, samples.join(", "));
                if count >= *min_count {
                    Evaluation::pass(detail)
                } else {
                    Evaluation::fail(detail)
                }
            }
            Expectation::JsonField { field } => {
                let value: serde_json::Value = serde_json::from_str(body)?;
                match value.get(field) {
                    Some(v) if !v.is_null() => Evaluation::pass(format!("{} = {}", field, v)),
                    _ => Evaluation::fail(format!("{} missing", field)),
                }
            }
            Expectation::AssetReachable { .. } => {
                return Err(E2eError::SuiteParse(
                    "asset checks need the runner".to_string(),
                ))
            }
        };
        Ok(evaluation)
    }

    /// First asset path referenced in `body`, for `AssetReachable`.
    pub fn asset_reference(&self, body: &str) -> E2eResult<Option<String>> {
        let Expectation::AssetReachable { pattern } = self else {
            return Ok(None);
        };
        let re = Regex::new(pattern)?;
        Ok(re
            .captures(body)
            .and_then(|c| c.get(1).or_else(|| c.get(0)))
            .map(|m| m.as_str().to_string()))
    }
}

/// Names the built-in suite probes
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    pub viewer: ViewerConfig,
    /// The viewer page
    pub index_page: String,
    /// The viewer's own stylesheet
    pub viewer_stylesheet: String,
    /// The viewer's own script
    pub viewer_script: String,
}

impl SuiteOptions {
    /// Options for `index_page`, whose stylesheet and script share its stem.
    pub fn new(viewer: ViewerConfig, index_page: &str) -> Self {
        let stem = index_page
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(index_page);
        Self {
            viewer,
            index_page: index_page.to_string(),
            viewer_stylesheet: format!("{}.css", stem),
            viewer_script: format!("{}.js", stem),
        }
    }
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self::new(ViewerConfig::default(), flipview_common::DEFAULT_VIEWER_PAGE)
    }
}

impl ProbeSuite {
    /// Parse a suite from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let suite: Self = serde_yaml::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Parse a suite from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load a suite file, or every suite below a directory
    pub fn load_all(path: &Path) -> E2eResult<Vec<Self>> {
        if path.is_file() {
            return Ok(vec![Self::from_file(path)?]);
        }

        let mut entries: Vec<_> = walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        entries.sort_by(|a, b| a.path().cmp(b.path()));

        entries
            .iter()
            .map(|entry| Self::from_file(entry.path()))
            .collect()
    }

    fn validate(&self) -> E2eResult<()> {
        for probe in &self.probes {
            for expectation in &probe.expect {
                let pattern = match expectation {
                    Expectation::Regex { pattern, .. } | Expectation::AssetReachable { pattern } => {
                        pattern
                    }
                    _ => continue,
                };
                Regex::new(pattern).map_err(|e| {
                    E2eError::SuiteParse(format!("{}: {}", probe.name, e))
                })?;
            }
        }
        Ok(())
    }

    /// The deck smoke suite.
    pub fn builtin(options: &SuiteOptions) -> Self {
        let viewer = &options.viewer;
        let id_pattern = format!(r#"id="{}\d+""#, regex::escape(&viewer.slide_id_prefix));

        let probes = vec![
            Probe {
                name: "manifest".to_string(),
                path: viewer.manifest.clone(),
                advisory: false,
                expect: vec![
                    Expectation::JsonField {
                        field: "total_slides".to_string(),
                    },
                    Expectation::JsonField {
                        field: "slides".to_string(),
                    },
                ],
            },
            Probe {
                name: "markup-slides".to_string(),
                path: viewer.markup.clone(),
                advisory: false,
                expect: vec![Expectation::Regex {
                    pattern: id_pattern,
                    min_count: 1,
                }],
            },
            Probe {
                name: "markup-content-blocks".to_string(),
                path: viewer.markup.clone(),
                advisory: true,
                expect: vec![
                    Expectation::Contains {
                        text: r#"class="text-block""#.to_string(),
                    },
                    Expectation::Contains {
                        text: r#"class="image-block""#.to_string(),
                    },
                ],
            },
            Probe {
                name: "viewer-page".to_string(),
                path: options.index_page.clone(),
                advisory: false,
                expect: vec![Expectation::Contains {
                    text: r#"id="flipbook""#.to_string(),
                }],
            },
            Probe {
                name: "viewer-widget".to_string(),
                path: options.index_page.clone(),
                advisory: true,
                expect: vec![
                    Expectation::Contains {
                        text: "jquery".to_string(),
                    },
                    Expectation::AnyOf {
                        texts: vec!["turn.js".to_string(), "turn.min.js".to_string()],
                    },
                ],
            },
            Probe {
                name: "viewer-script".to_string(),
                path: options.viewer_script.clone(),
                advisory: false,
                expect: Vec::new(),
            },
            Probe {
                name: "viewer-stylesheet".to_string(),
                path: options.viewer_stylesheet.clone(),
                advisory: false,
                expect: vec![Expectation::AnyOf {
                    texts: vec!["page-curl".to_string(), "turning".to_string()],
                }],
            },
            Probe {
                name: "slide-stylesheet".to_string(),
                path: viewer.stylesheet.clone(),
                advisory: true,
                expect: ["slide", "text-block", "image-block"]
                    .iter()
                    .map(|class| Expectation::Regex {
                        pattern: format!(r"\.{}\s*\{{", class),
                        min_count: 1,
                    })
                    .collect(),
            },
            Probe {
                name: "first-image".to_string(),
                path: viewer.markup.clone(),
                advisory: false,
                expect: vec![Expectation::AssetReachable {
                    pattern: r#"src="(images/[^"]+)""#.to_string(),
                }],
            },
        ];

        Self {
            name: "deck-smoke".to_string(),
            description: "Deck assets served and shaped as the viewer expects".to_string(),
            probes,
        }
    }
}
