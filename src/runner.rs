//! Suite runner: sequential scenario execution, reporting, artifact hook

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::artifact::ScreenshotHook;
use crate::config::SuiteConfig;
use crate::error::E2eResult;
use crate::playwright::{Browser, PlaywrightRunner};
use crate::scenario::{CaptureReport, Phase, Scenario, ScenarioOutcome, Status};

/// Aggregate result of a suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteResult {
    pub fn all_green(&self) -> bool {
        self.failed == 0
    }
}

/// Executes scenarios one at a time against a running application.
pub struct SuiteRunner {
    config: SuiteConfig,
    playwright: PlaywrightRunner,
    hook: ScreenshotHook,
}

impl SuiteRunner {
    pub fn new(config: SuiteConfig, browser: Browser) -> Self {
        let playwright = PlaywrightRunner::new(&config, browser);
        let hook = ScreenshotHook::new(config.screenshot_dir.clone());
        Self { config, playwright, hook }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Best-effort pre-flight check that the application answers at the base
    /// URL. Only warns; an unreachable app will surface as scenario failures
    /// with their own diagnostics.
    pub async fn probe_base_url(&self) {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Could not build probe client: {}", e);
                return;
            }
        };

        match client.get(&self.config.base_url).send().await {
            Ok(resp) if resp.status().is_success() || resp.status().is_redirection() => {}
            Ok(resp) => warn!(
                "Base URL {} answered with {}",
                self.config.base_url,
                resp.status()
            ),
            Err(e) => warn!(
                "Base URL {} not reachable: {}",
                self.config.base_url, e
            ),
        }
    }

    /// Run every scenario in order.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> E2eResult<SuiteResult> {
        PlaywrightRunner::check_installed()?;
        self.probe_base_url().await;

        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(scenarios.len());
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        info!(
            "Running {} scenario(s) against {}",
            scenarios.len(),
            self.config.base_url
        );

        for scenario in scenarios {
            let outcome = self.run_scenario(scenario).await;

            match outcome.status {
                Status::Passed => {
                    passed += 1;
                    info!("✓ {} ({} ms)", outcome.id, outcome.duration_ms);
                }
                Status::Failed => {
                    failed += 1;
                    error!(
                        "✗ {} - {}",
                        outcome.id,
                        outcome.error.as_deref().unwrap_or("unknown error")
                    );
                }
                Status::Skipped => {
                    skipped += 1;
                    info!(
                        "- {} skipped: {}",
                        outcome.id,
                        outcome.error.as_deref().unwrap_or("")
                    );
                }
            }

            outcomes.push(outcome);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms
        );

        Ok(SuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            outcomes,
        })
    }

    /// Run only scenarios carrying a tag.
    pub async fn run_tagged(&self, scenarios: &[Scenario], tag: &str) -> E2eResult<SuiteResult> {
        let filtered: Vec<Scenario> = scenarios
            .iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .cloned()
            .collect();
        self.run_all(&filtered).await
    }

    /// Run a single scenario and finalize its outcome.
    ///
    /// The screenshot hook observes the finalized outcome exactly once, here,
    /// and never changes it.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioOutcome {
        let id = scenario.id();

        if let Some(reason) = &scenario.skip {
            let outcome = ScenarioOutcome::skipped(id, reason);
            self.hook.observe(&outcome);
            return outcome;
        }

        let start = Instant::now();
        let capture_path = self.hook.capture_path(&id);

        let outcome = match self
            .playwright
            .run_scenario(scenario, Some(capture_path.as_path()))
            .await
        {
            Ok(report) => ScenarioOutcome {
                id,
                status: if report.success { Status::Passed } else { Status::Failed },
                phase: Phase::Execution,
                duration_ms: start.elapsed().as_millis() as u64,
                error: if report.success {
                    None
                } else {
                    Some(report.failure_message())
                },
                capture: report.capture_report(),
            },
            // Script never ran: the browser was not reached, so there is no
            // page and nothing to capture.
            Err(e) => ScenarioOutcome {
                id,
                status: Status::Failed,
                phase: Phase::Setup,
                duration_ms: start.elapsed().as_millis() as u64,
                error: Some(e.to_string()),
                capture: CaptureReport::default(),
            },
        };

        self.hook.observe(&outcome);
        outcome
    }

    /// Write the machine-readable results file.
    pub fn write_results(&self, result: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.results_dir)?;

        let path = self.config.results_dir.join("results.json");
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skipped_scenario_never_executes() {
        let runner = SuiteRunner::new(SuiteConfig::default(), Browser::Chromium);
        let scenario = Scenario::new("placeholder")
            .group("settings_navigation")
            .skipped("requires admin authentication");

        let outcome = runner.run_scenario(&scenario).await;

        assert_eq!(outcome.status, Status::Skipped);
        assert_eq!(outcome.id, "settings_navigation::placeholder");
        assert_eq!(outcome.error.as_deref(), Some("requires admin authentication"));
        assert!(outcome.capture.screenshot.is_none());
    }

    #[test]
    fn test_suite_result_green() {
        let result = SuiteResult {
            total: 2,
            passed: 1,
            failed: 0,
            skipped: 1,
            duration_ms: 10,
            outcomes: vec![],
        };
        assert!(result.all_green());
    }
}
