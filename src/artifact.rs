//! Failure screenshot hook
//!
//! Guarantees that every failing scenario with a live page leaves a visual
//! artifact behind, without ever altering the scenario's reported result.
//! Capture errors are contained here: they are logged as warnings and never
//! surface as additional failures.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::scenario::{Phase, ScenarioOutcome, Status};

/// Observer that persists a screenshot for execution-phase failures.
#[derive(Debug, Clone)]
pub struct ScreenshotHook {
    dir: PathBuf,
}

impl ScreenshotHook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Derive the artifact filename from a scenario identifier.
    ///
    /// Every `::` separator and every path separator becomes an underscore,
    /// then `.png` is appended. Deterministic and stable, so repeated
    /// failures of the same scenario overwrite rather than accumulate.
    pub fn artifact_file_name(scenario_id: &str) -> String {
        let sanitized = scenario_id.replace("::", "_").replace(['/', '\\'], "_");
        format!("{}.png", sanitized)
    }

    /// Destination path for a scenario's failure screenshot.
    ///
    /// Pure derivation, no filesystem side effects: the directory is created
    /// on demand at capture time, inside the capture's own error boundary,
    /// so a fully passing run writes nothing to disk.
    pub fn capture_path(&self, scenario_id: &str) -> PathBuf {
        self.dir.join(Self::artifact_file_name(scenario_id))
    }

    /// Observe a finalized outcome. Runs exactly once per scenario, after
    /// the result is final; pure observer, never a gate.
    ///
    /// Acts only on execution-phase failures. Failures without a page handle
    /// (the page was never created) are skipped silently.
    pub fn observe(&self, outcome: &ScenarioOutcome) {
        if outcome.phase != Phase::Execution || outcome.status != Status::Failed {
            return;
        }
        if !outcome.capture.page_available {
            return;
        }

        if let Some(path) = &outcome.capture.screenshot {
            info!("Screenshot saved: {}", path.display());
        } else if let Some(err) = &outcome.capture.error {
            warn!("Failed to capture screenshot for {}: {}", outcome.id, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("user_journey::home_redirects_to_login", "user_journey_home_redirects_to_login.png"; "group separator")]
    #[test_case("suites/settings::tabs", "suites_settings_tabs.png"; "path and group separators")]
    #[test_case("plain", "plain.png"; "no separators")]
    #[test_case("a\\b/c", "a_b_c.png"; "both path separator kinds")]
    fn test_artifact_file_name(id: &str, expected: &str) {
        assert_eq!(ScreenshotHook::artifact_file_name(id), expected);
    }

    #[test]
    fn test_file_name_stable_across_calls() {
        let a = ScreenshotHook::artifact_file_name("user_journey::signup_navigation");
        let b = ScreenshotHook::artifact_file_name("user_journey::signup_navigation");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_ids_distinct_names() {
        let a = ScreenshotHook::artifact_file_name("user_journey::home");
        let b = ScreenshotHook::artifact_file_name("user_journey::settings");
        assert_ne!(a, b);
    }
}
