//! Previso E2E Test Runner
//!
//! A Rust-controlled browser E2E runner for the Previso web app that:
//! - Generates one Playwright script per scenario and runs it under `node`
//! - Configures every browser context with a fixed viewport, locale, and
//!   timezone for deterministic rendering
//! - Captures a full-page screenshot whenever a scenario fails with a live
//!   page, without ever masking the original failure
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SuiteRunner (Rust)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  run_all(scenarios)                                         │
//! │    ├── probe_base_url()        best-effort reachability     │
//! │    ├── run_scenario(s)  ──►  PlaywrightRunner               │
//! │    │     build_script ─► node ─► JSON report line           │
//! │    └── ScreenshotHook.observe(outcome)                      │
//! │          execution-phase failure + live page ─► artifact    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario                                                   │
//! │    ├── navigate { path }                                    │
//! │    ├── expect_url { path, timeout_ms }                      │
//! │    ├── expect_visible { selectors[], timeout_ms }           │
//! │    └── click_if_visible { selectors[], then_expect_path }   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scenarios are independent: each one gets a fresh browser context inside
//! its own script process, torn down on every exit path. The application
//! under test is expected to already be running at the configured base URL
//! (`BASE_URL`, default `http://localhost:5173`).

pub mod artifact;
pub mod config;
pub mod error;
pub mod playwright;
pub mod runner;
pub mod scenario;
pub mod suite;

pub use artifact::ScreenshotHook;
pub use config::{ContextConfig, SuiteConfig, Viewport, DEFAULT_BASE_URL};
pub use error::{E2eError, E2eResult};
pub use playwright::{Browser, PlaywrightRunner};
pub use runner::{SuiteResult, SuiteRunner};
pub use scenario::{Phase, Scenario, ScenarioOutcome, Status, Step};
pub use suite::{previso_suite, INTEGRATION_TAG};
