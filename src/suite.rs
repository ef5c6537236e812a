//! Built-in Previso scenarios: login and settings navigation journeys

use crate::scenario::{Scenario, Step};

/// Tag registered for harness-level filtering. Defined for selective runs
/// (`--tag integration`); the built-in suite does not currently apply it.
pub const INTEGRATION_TAG: &str = "integration";

const ASSERT_TIMEOUT_MS: u64 = 5000;
const URL_TIMEOUT_MS: u64 = 10_000;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The full Previso scenario set, in execution order.
pub fn previso_suite() -> Vec<Scenario> {
    vec![
        home_redirects_to_login(),
        settings_redirects_to_login(),
        login_page_elements(),
        signup_navigation(),
        settings_tabs_exist_for_admin(),
        settings_dashboard_to_data_navigation(),
    ]
}

/// Unauthenticated `/` lands on the login page with a visible heading.
pub fn home_redirects_to_login() -> Scenario {
    Scenario::new("home_redirects_to_login")
        .group("user_journey")
        .describe("Home page redirects unauthenticated users to /login")
        .step(Step::Navigate { path: "/".to_string() })
        .step(Step::ExpectUrl { path: "/login".to_string(), timeout_ms: URL_TIMEOUT_MS })
        .step(Step::ExpectVisible {
            selectors: strings(&["h1:has-text(\"Login\")", "h2:has-text(\"Login\")"]),
            timeout_ms: ASSERT_TIMEOUT_MS,
        })
}

/// Unauthenticated `/settings` also lands on the login page. Authenticated
/// admins would be redirected to /settings/dashboard instead.
pub fn settings_redirects_to_login() -> Scenario {
    Scenario::new("settings_redirects_to_login")
        .group("user_journey")
        .describe("Settings redirects unauthenticated users to /login")
        .step(Step::Navigate { path: "/settings".to_string() })
        .step(Step::ExpectUrl { path: "/login".to_string(), timeout_ms: URL_TIMEOUT_MS })
}

/// The login form exposes its three required controls.
pub fn login_page_elements() -> Scenario {
    Scenario::new("login_page_elements")
        .group("user_journey")
        .describe("Login page has email/username, password, and submit controls")
        .step(Step::Navigate { path: "/login".to_string() })
        .step(Step::ExpectVisible {
            selectors: strings(&["input[type=\"email\"]", "input[type=\"text\"]"]),
            timeout_ms: ASSERT_TIMEOUT_MS,
        })
        .step(Step::ExpectVisible {
            selectors: strings(&["input[type=\"password\"]"]),
            timeout_ms: ASSERT_TIMEOUT_MS,
        })
        .step(Step::ExpectVisible {
            selectors: strings(&["button[type=\"submit\"]"]),
            timeout_ms: ASSERT_TIMEOUT_MS,
        })
}

/// If the login page offers a signup link it must lead to /signup; a missing
/// link is not a failure.
pub fn signup_navigation() -> Scenario {
    Scenario::new("signup_navigation")
        .group("user_journey")
        .describe("Signup link on the login page navigates to /signup when present")
        .step(Step::Navigate { path: "/login".to_string() })
        .step(Step::ClickIfVisible {
            selectors: strings(&[
                "a[href*=\"signup\"]",
                "button:has-text(\"cadastr\")",
                "button:has-text(\"Cadastr\")",
                "button:has-text(\"Sign up\")",
            ]),
            then_expect_path: "/signup".to_string(),
            timeout_ms: ASSERT_TIMEOUT_MS,
        })
}

/// Placeholder for the admin settings tab structure. Skipped until the suite
/// can authenticate as admin; expected behavior: /settings/dashboard shows a
/// Dashboard tab (`data-testid="tab-dashboard"`) and a Data Management tab
/// (`data-testid="tab-data"`).
pub fn settings_tabs_exist_for_admin() -> Scenario {
    Scenario::new("settings_tabs_exist_for_admin")
        .group("settings_navigation")
        .describe("Settings tabs exist for admin users")
        .skipped("requires admin authentication, which this suite does not implement")
}

/// Placeholder for tab-to-tab navigation. Skipped until the suite can
/// authenticate as admin; expected behavior: clicking the Data Management tab
/// on /settings/dashboard changes the URL to /settings/data and swaps the
/// tab content.
pub fn settings_dashboard_to_data_navigation() -> Scenario {
    Scenario::new("settings_dashboard_to_data_navigation")
        .group("settings_navigation")
        .describe("Navigation between settings tabs updates URL and content")
        .skipped("requires admin authentication, which this suite does not implement")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_suite_shape() {
        let suite = previso_suite();
        assert_eq!(suite.len(), 6);

        let ids: HashSet<String> = suite.iter().map(Scenario::id).collect();
        assert_eq!(ids.len(), suite.len(), "scenario ids must be unique");
    }

    #[test]
    fn test_placeholders_are_skipped() {
        let suite = previso_suite();
        let skipped: Vec<&Scenario> = suite.iter().filter(|s| s.skip.is_some()).collect();

        assert_eq!(skipped.len(), 2);
        for scenario in skipped {
            assert_eq!(scenario.group.as_deref(), Some("settings_navigation"));
            assert!(scenario.steps.is_empty());
        }
    }

    #[test]
    fn test_executable_scenarios_start_with_navigation() {
        for scenario in previso_suite().iter().filter(|s| s.skip.is_none()) {
            match scenario.steps.first() {
                Some(Step::Navigate { .. }) => {}
                other => panic!("{} does not start with navigate: {:?}", scenario.id(), other),
            }
        }
    }

    #[test]
    fn test_integration_tag_unused_by_builtin_suite() {
        for scenario in previso_suite() {
            assert!(!scenario.tags.iter().any(|t| t == INTEGRATION_TAG));
        }
    }
}
