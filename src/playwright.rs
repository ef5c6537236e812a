//! Playwright browser automation
//!
//! Each scenario compiles to one self-contained Playwright script: context
//! creation from the merged options, the scenario's steps, and a failure
//! block that captures a full-page screenshot before the outcome is
//! reported. The script runs under `node` and prints a single JSON report
//! line on stdout.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::scenario::{CaptureReport, Scenario, Step};

#[derive(Debug, Clone, Copy, Default)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(E2eError::ScenarioParse(format!("Unknown browser: {}", other))),
        }
    }
}

/// What the generated script reports back on its single stdout JSON line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptReport {
    pub success: bool,
    pub failed_step: Option<String>,
    pub error: Option<String>,
    pub page_available: bool,
    pub screenshot: Option<String>,
    pub screenshot_error: Option<String>,
}

impl ScriptReport {
    pub fn capture_report(&self) -> CaptureReport {
        CaptureReport {
            page_available: self.page_available,
            screenshot: self.screenshot.as_ref().map(Into::into),
            error: self.screenshot_error.clone(),
        }
    }

    /// Diagnostic message for a failed run.
    pub fn failure_message(&self) -> String {
        let error = self.error.as_deref().unwrap_or("unknown error");
        match &self.failed_step {
            Some(step) => format!("{} ({})", error, step),
            None => error.to_string(),
        }
    }
}

/// Generates and executes one Playwright script per scenario.
pub struct PlaywrightRunner {
    base_url: String,
    default_timeout: Duration,
    headless: bool,
    browser: Browser,
    context_options: String,
}

impl PlaywrightRunner {
    pub fn new(config: &SuiteConfig, browser: Browser) -> Self {
        let options = config.context.to_options();
        Self {
            base_url: config.base_url.clone(),
            default_timeout: config.default_timeout,
            headless: config.headless,
            browser,
            context_options: serde_json::Value::Object(options).to_string(),
        }
    }

    /// Check that Playwright is installed.
    pub fn check_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Build the complete script for a scenario.
    ///
    /// `capture_path` is the pre-derived failure screenshot destination;
    /// `None` disables capture for this run.
    pub fn build_script(&self, scenario: &Scenario, capture_path: Option<&Path>) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');

(async () => {{
  const report = {{
    success: false,
    failedStep: null,
    error: null,
    pageAvailable: false,
    screenshot: null,
    screenshotError: null,
  }};
  const browser = await {browser}.launch({{ headless: {headless} }});
  let page = null;
  try {{
    const context = await browser.newContext({options});
    page = await context.newPage();
    page.setDefaultTimeout({default_timeout});
    const baseUrl = {base_url};
"#,
            browser = self.browser.as_str(),
            headless = self.headless,
            options = self.context_options,
            default_timeout = self.default_timeout.as_millis(),
            base_url = js_str(&self.base_url),
        ));

        for (i, step) in scenario.steps.iter().enumerate() {
            script.push_str(&format!(
                "\n    report.failedStep = {};\n",
                js_str(&step.label())
            ));
            script.push_str(&self.step_to_js(step, i));
            script.push('\n');
        }

        script.push_str(
            r#"
    report.failedStep = null;
    report.success = true;
  } catch (error) {
    report.error = error.message;
    report.pageAvailable = page !== null && !page.isClosed();
"#,
        );

        if let Some(path) = capture_path {
            // Directory creation happens here, on demand: a passing run must
            // leave no artifact directory behind. Capture errors, mkdir
            // included, stay inside this inner try: the original failure
            // must remain the only reported failure.
            let mkdir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| {
                    format!(
                        "        require('fs').mkdirSync({}, {{ recursive: true }});\n",
                        js_str(&p.to_string_lossy())
                    )
                })
                .unwrap_or_default();
            script.push_str(&format!(
                r#"    if (report.pageAvailable) {{
      try {{
{mkdir}        await page.screenshot({{ path: {path}, fullPage: true }});
        report.screenshot = {path};
      }} catch (captureError) {{
        report.screenshotError = captureError.message;
      }}
    }}
"#,
                mkdir = mkdir,
                path = js_str(&path.to_string_lossy()),
            ));
        }

        script.push_str(
            r#"  } finally {
    try {
      await browser.close();
    } catch (closeError) {
      // A teardown error must not replace the execution result
    }
  }
  console.log(JSON.stringify(report));
  process.exitCode = report.success ? 0 : 1;
})();
"#,
        );

        script
    }

    /// Convert a step to JavaScript code.
    fn step_to_js(&self, step: &Step, step_index: usize) -> String {
        match step {
            Step::Navigate { path } => {
                format!("    await page.goto(baseUrl + {});", js_str(path))
            }
            Step::ExpectUrl { path, timeout_ms } => {
                format!(
                    "    await page.waitForURL(baseUrl + {}, {{ timeout: {} }});",
                    js_str(path),
                    timeout_ms
                )
            }
            Step::ExpectVisible { selectors, timeout_ms } => {
                format!(
                    "    await page.locator({}).first().waitFor({{ state: 'visible', timeout: {} }});",
                    js_str(&selectors.join(", ")),
                    timeout_ms
                )
            }
            Step::ClickIfVisible { selectors, then_expect_path, timeout_ms } => {
                format!(
                    r#"    const candidate{i} = page.locator({selector}).first();
    if (await candidate{i}.isVisible()) {{
      await candidate{i}.click();
      await page.waitForURL(baseUrl + {path}, {{ timeout: {timeout} }});
    }}"#,
                    i = step_index,
                    selector = js_str(&selectors.join(", ")),
                    path = js_str(then_expect_path),
                    timeout = timeout_ms,
                )
            }
        }
    }

    /// Run a scenario's script under `node` and parse its report line.
    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        capture_path: Option<&Path>,
    ) -> E2eResult<ScriptReport> {
        let script = self.build_script(scenario, capture_path);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_report_line(&stdout) {
            Some(report) => Ok(report),
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(E2eError::Playwright(format!(
                    "Script produced no report:\nstdout: {}\nstderr: {}",
                    stdout, stderr
                )))
            }
        }
    }
}

/// Quote a string as a JS single-quoted literal.
fn js_str(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n");
    format!("'{}'", escaped)
}

/// Find the report line in script stdout (last parseable JSON object line).
fn parse_report_line(stdout: &str) -> Option<ScriptReport> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str(line).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner_with_base(base_url: &str) -> PlaywrightRunner {
        let config = SuiteConfig {
            base_url: base_url.to_string(),
            ..SuiteConfig::default()
        };
        PlaywrightRunner::new(&config, Browser::Chromium)
    }

    fn sample_scenario() -> Scenario {
        Scenario::new("home")
            .step(Step::Navigate { path: "/".to_string() })
            .step(Step::ExpectUrl { path: "/login".to_string(), timeout_ms: 5000 })
    }

    #[test]
    fn test_script_targets_configured_base_url() {
        let runner = runner_with_base("http://example.test");
        let script = runner.build_script(&sample_scenario(), None);

        assert!(script.contains("const baseUrl = 'http://example.test';"));
        assert!(script.contains("await page.goto(baseUrl + '/');"));
        assert!(!script.contains("localhost:5173"));
    }

    #[test]
    fn test_script_context_options() {
        let runner = runner_with_base("http://localhost:5173");
        let script = runner.build_script(&sample_scenario(), None);

        assert!(script.contains(r#""width":1280"#));
        assert!(script.contains(r#""height":720"#));
        assert!(script.contains(r#""locale":"pt-BR""#));
        assert!(script.contains(r#""timezoneId":"America/Sao_Paulo""#));
        assert!(!script.contains("recordVideo"));
        assert!(script.contains("page.setDefaultTimeout(10000);"));
    }

    #[test]
    fn test_script_assertion_timeouts() {
        let runner = runner_with_base("http://localhost:5173");
        let script = runner.build_script(&sample_scenario(), None);

        assert!(script.contains("waitForURL(baseUrl + '/login', { timeout: 5000 })"));
    }

    #[test]
    fn test_script_fallback_selectors() {
        let scenario = Scenario::new("login").step(Step::ExpectVisible {
            selectors: vec![
                "input[type=\"email\"]".to_string(),
                "input[type=\"text\"]".to_string(),
            ],
            timeout_ms: 5000,
        });
        let runner = runner_with_base("http://localhost:5173");
        let script = runner.build_script(&scenario, None);

        assert!(script
            .contains(r#"page.locator('input[type="email"], input[type="text"]').first()"#));
    }

    #[test]
    fn test_script_conditional_click_guard() {
        let scenario = Scenario::new("signup").step(Step::ClickIfVisible {
            selectors: vec!["a[href*=\"signup\"]".to_string()],
            then_expect_path: "/signup".to_string(),
            timeout_ms: 5000,
        });
        let runner = runner_with_base("http://localhost:5173");
        let script = runner.build_script(&scenario, None);

        assert!(script.contains("if (await candidate0.isVisible())"));
        assert!(script.contains("waitForURL(baseUrl + '/signup', { timeout: 5000 })"));
    }

    #[test]
    fn test_script_capture_block_only_with_path() {
        let runner = runner_with_base("http://localhost:5173");

        let without = runner.build_script(&sample_scenario(), None);
        assert!(!without.contains("screenshot({"));

        let with = runner.build_script(
            &sample_scenario(),
            Some(Path::new("test-results/screenshots/home.png")),
        );
        assert!(with.contains("page.screenshot({ path: 'test-results/screenshots/home.png', fullPage: true })"));
        assert!(with.contains("catch (captureError)"));
        assert!(with.contains("report.screenshotError = captureError.message;"));
    }

    #[test]
    fn test_script_creates_artifact_directory_only_on_failure() {
        let runner = runner_with_base("http://localhost:5173");
        let script = runner.build_script(
            &sample_scenario(),
            Some(Path::new("test-results/screenshots/home.png")),
        );

        let mkdir = "require('fs').mkdirSync('test-results/screenshots', { recursive: true })";
        assert!(script.contains(mkdir));

        // The mkdir lives inside the failure block, after the catch, and
        // inside the capture's own try: a passing run never reaches it and a
        // mkdir error is contained like any other capture error.
        let catch_pos = script.find("} catch (error) {").unwrap();
        let capture_try_pos = script.find("try {\n        require('fs')").unwrap();
        let mkdir_pos = script.find(mkdir).unwrap();
        assert!(catch_pos < capture_try_pos);
        assert!(capture_try_pos < mkdir_pos);
    }

    #[test]
    fn test_script_teardown_cannot_eat_the_report() {
        let runner = runner_with_base("http://localhost:5173");
        let script = runner.build_script(&sample_scenario(), None);

        // browser.close() is wrapped so a rejected close still lets the
        // report line print; the exit code is set without cutting stdout off.
        assert!(script.contains("catch (closeError)"));
        assert!(script.contains("process.exitCode = report.success ? 0 : 1;"));
        assert!(!script.contains("process.exit("));

        let close_pos = script.find("await browser.close();").unwrap();
        let report_pos = script.find("console.log(JSON.stringify(report));").unwrap();
        assert!(close_pos < report_pos);
    }

    #[test]
    fn test_parse_report_line() {
        let stdout = "noise\n{\"success\":false,\"error\":\"timeout\",\"pageAvailable\":true}\n";
        let report = parse_report_line(stdout).unwrap();
        assert!(!report.success);
        assert!(report.page_available);
        assert_eq!(report.error.as_deref(), Some("timeout"));
        assert!(report.screenshot.is_none());
    }

    #[test]
    fn test_parse_report_line_missing() {
        assert!(parse_report_line("no json here\n").is_none());
    }

    #[test]
    fn test_js_str_escaping() {
        assert_eq!(js_str("a'b"), r"'a\'b'");
        assert_eq!(js_str(r"a\b"), r"'a\\b'");
    }
}
