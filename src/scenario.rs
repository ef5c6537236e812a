//! Scenario model and declarative YAML scenario files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

fn default_assert_timeout() -> u64 {
    5000 // Assertions fail fast rather than riding the global default
}

/// A single step in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a path relative to the base URL.
    Navigate { path: String },

    /// Assert the final URL (after redirects) is base URL plus this path.
    ExpectUrl {
        path: String,
        #[serde(default = "default_assert_timeout")]
        timeout_ms: u64,
    },

    /// Assert that at least one of the selectors matches a visible element.
    ///
    /// Selectors are tried in order; the first match wins. Fallback lists
    /// tolerate multiple acceptable markup shapes.
    ExpectVisible {
        selectors: Vec<String>,
        #[serde(default = "default_assert_timeout")]
        timeout_ms: u64,
    },

    /// Click the first visible match, then assert the URL; if no selector
    /// matches a visible element, complete without action or failure.
    ClickIfVisible {
        selectors: Vec<String>,
        then_expect_path: String,
        #[serde(default = "default_assert_timeout")]
        timeout_ms: u64,
    },
}

impl Step {
    /// Short human-readable label for logging.
    pub fn label(&self) -> String {
        match self {
            Step::Navigate { path } => format!("navigate:{}", path),
            Step::ExpectUrl { path, .. } => format!("expect_url:{}", path),
            Step::ExpectVisible { selectors, .. } => {
                format!("expect_visible:{}", selectors.first().map(String::as_str).unwrap_or(""))
            }
            Step::ClickIfVisible { then_expect_path, .. } => {
                format!("click_if_visible->{}", then_expect_path)
            }
        }
    }
}

/// One independent end-to-end scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name within its group.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Group this scenario belongs to; part of the scenario identifier.
    #[serde(default)]
    pub group: Option<String>,

    /// Tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,

    /// When set, the scenario is reported Skipped with this reason instead
    /// of executing.
    #[serde(default)]
    pub skip: Option<String>,

    /// Steps to execute in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            group: None,
            tags: Vec::new(),
            skip: None,
            steps: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Mark the scenario as a placeholder that must not execute.
    pub fn skipped(mut self, reason: impl Into<String>) -> Self {
        self.skip = Some(reason.into());
        self
    }

    /// Fully-qualified identifier: group plus name.
    ///
    /// This is the string failure artifacts are named after, so it must be
    /// unique per scenario and stable across runs.
    pub fn id(&self) -> String {
        match &self.group {
            Some(group) => format!("{}::{}", group, self.name),
            None => self.name.clone(),
        }
    }

    /// Parse a scenario from YAML.
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a scenario from a YAML file.
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load all scenario files from a directory tree.
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            scenarios.push(Self::from_file(entry.path())?);
        }

        Ok(scenarios)
    }
}

/// Phase of the scenario lifecycle in which an outcome was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before the browser script ran (dirs, script write, spawn).
    Setup,
    /// The scenario's primary execution.
    Execution,
    /// Cleanup after the result was produced.
    Teardown,
}

/// Pass/fail/skip result of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
}

/// What the browser script reported about the failure screenshot attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Whether a page handle existed when the outcome was produced.
    pub page_available: bool,

    /// Path the capture was written to, if one was taken.
    pub screenshot: Option<PathBuf>,

    /// Error from the capture attempt, if it failed.
    pub error: Option<String>,
}

/// Finalized outcome of one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Fully-qualified scenario identifier.
    pub id: String,
    pub status: Status,
    pub phase: Phase,
    pub duration_ms: u64,

    /// Diagnostic message for failures.
    pub error: Option<String>,

    #[serde(default)]
    pub capture: CaptureReport,
}

impl ScenarioOutcome {
    pub fn skipped(id: impl Into<String>, reason: &str) -> Self {
        Self {
            id: id.into(),
            status: Status::Skipped,
            phase: Phase::Setup,
            duration_ms: 0,
            error: Some(reason.to_string()),
            capture: CaptureReport::default(),
        }
    }
}
