//! Suite and browser-context configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Default application origin when `BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5173";

/// Fixed browser window size for deterministic layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Options applied to every browser context the suite creates.
///
/// These are overlaid onto whatever base options the harness supplies; base
/// keys this struct does not recognize pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    pub viewport: Viewport,

    /// Language/region tag affecting rendered text and formatting.
    pub locale: String,

    /// IANA timezone identifier affecting any displayed dates/times.
    pub timezone: String,

    /// Directory for video recordings; `None` disables recording.
    pub record_video_dir: Option<PathBuf>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            locale: "pt-BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            // Off by default to avoid unnecessary artifact volume
            record_video_dir: None,
        }
    }
}

impl ContextConfig {
    /// Overlay this configuration onto a base option map.
    ///
    /// Merge, not replace: unrecognized base keys survive. When recording is
    /// disabled, any `recordVideo` option in the base is dropped as well.
    pub fn merged_into(&self, base: Map<String, Value>) -> Map<String, Value> {
        let mut merged = base;
        merged.insert(
            "viewport".to_string(),
            json!({ "width": self.viewport.width, "height": self.viewport.height }),
        );
        merged.insert("locale".to_string(), json!(self.locale));
        merged.insert("timezoneId".to_string(), json!(self.timezone));
        match &self.record_video_dir {
            Some(dir) => {
                merged.insert(
                    "recordVideo".to_string(),
                    json!({ "dir": dir.to_string_lossy() }),
                );
            }
            None => {
                merged.remove("recordVideo");
            }
        }
        merged
    }

    /// Context options as a standalone map (empty base).
    pub fn to_options(&self) -> Map<String, Value> {
        self.merged_into(Map::new())
    }
}

/// Configuration for a whole suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Application origin all scenarios navigate against.
    pub base_url: String,

    /// Directory for failure screenshots.
    pub screenshot_dir: PathBuf,

    /// Directory for the machine-readable results file.
    pub results_dir: PathBuf,

    /// Global per-operation default; assertions may override with a shorter
    /// explicit timeout.
    pub default_timeout: Duration,

    /// Run the browser headless.
    pub headless: bool,

    /// Browser context options.
    pub context: ContextConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            results_dir: PathBuf::from("test-results"),
            default_timeout: Duration::from_secs(10),
            headless: true,
            context: ContextConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Build the default configuration with the origin taken from the
    /// `BASE_URL` environment variable. Read once, at suite load.
    pub fn from_env() -> Self {
        Self {
            base_url: base_url_or_default(std::env::var("BASE_URL").ok()),
            ..Self::default()
        }
    }
}

/// Resolve the application origin from an optional override.
pub fn base_url_or_default(var: Option<String>) -> String {
    match var {
        Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let ctx = ContextConfig::default();
        assert_eq!(ctx.viewport.width, 1280);
        assert_eq!(ctx.viewport.height, 720);
        assert_eq!(ctx.locale, "pt-BR");
        assert_eq!(ctx.timezone, "America/Sao_Paulo");
        assert!(ctx.record_video_dir.is_none());
    }

    #[test]
    fn test_merge_preserves_unrecognized_base_keys() {
        let mut base = Map::new();
        base.insert("ignoreHTTPSErrors".to_string(), json!(true));
        base.insert("colorScheme".to_string(), json!("dark"));

        let merged = ContextConfig::default().merged_into(base);

        assert_eq!(merged["ignoreHTTPSErrors"], json!(true));
        assert_eq!(merged["colorScheme"], json!("dark"));
        assert_eq!(merged["viewport"]["width"], json!(1280));
        assert_eq!(merged["locale"], json!("pt-BR"));
        assert_eq!(merged["timezoneId"], json!("America/Sao_Paulo"));
    }

    #[test]
    fn test_merge_drops_base_video_when_disabled() {
        let mut base = Map::new();
        base.insert("recordVideo".to_string(), json!({ "dir": "videos" }));

        let merged = ContextConfig::default().merged_into(base);
        assert!(!merged.contains_key("recordVideo"));
    }

    #[test]
    fn test_merge_sets_video_dir_when_enabled() {
        let ctx = ContextConfig {
            record_video_dir: Some(PathBuf::from("test-results/videos")),
            ..ContextConfig::default()
        };
        let merged = ctx.to_options();
        assert_eq!(merged["recordVideo"]["dir"], json!("test-results/videos"));
    }

    #[test]
    fn test_base_url_override() {
        assert_eq!(
            base_url_or_default(Some("http://example.test".to_string())),
            "http://example.test"
        );
        assert_eq!(
            base_url_or_default(Some("http://example.test/".to_string())),
            "http://example.test"
        );
        assert_eq!(base_url_or_default(None), DEFAULT_BASE_URL);
        assert_eq!(base_url_or_default(Some("  ".to_string())), DEFAULT_BASE_URL);
    }
}
