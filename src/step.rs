//! Declarative UI step model
//!
//! A scenario is an ordered list of [`Step`]s. Selectors are Playwright
//! selector strings and pass through to `page.locator()` unchanged, so CSS,
//! `text=`, `role=...` and `>>` chains are all available to flows.

use serde::{Deserialize, Serialize};

/// Default timeout for element-visibility waits.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

fn default_wait_timeout() -> u64 {
    DEFAULT_WAIT_TIMEOUT_MS
}

/// A single browser action or assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a URL. Relative URLs are resolved against the base URL.
    Navigate { url: String },

    /// Click an element.
    Click {
        selector: String,
        /// Zero-based match index when the selector is ambiguous.
        #[serde(default)]
        nth: Option<usize>,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Fill an input field.
    Fill { selector: String, value: String },

    /// Wait for an element to become visible.
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
    },

    /// Wait for the page to reach an exact URL (relative to the base URL).
    WaitForUrl { url: String },

    /// Assert the current URL exactly (relative to the base URL).
    AssertUrl { url: String },

    /// Assert the current URL against a path regex anchored at the base URL.
    AssertUrlMatches { pattern: String },

    /// Assert something about an element.
    Assert {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text_contains: Option<String>,
        /// Minimum number of matching elements.
        #[serde(default)]
        min_count: Option<usize>,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Attach a local file through the file chooser opened by clicking.
    UploadFile { selector: String, path: String },

    /// Take a full-page screenshot.
    Screenshot { name: String },

    /// Log a message into the script output.
    Log { message: String },
}

impl Step {
    /// Short label used in progress logs and failure reports.
    pub fn label(&self) -> String {
        match self {
            Step::Navigate { url } => format!("navigate:{url}"),
            Step::Click { selector, .. } => format!("click:{selector}"),
            Step::Fill { selector, .. } => format!("fill:{selector}"),
            Step::Wait { selector, .. } => format!("wait:{selector}"),
            Step::WaitForUrl { url } => format!("wait_for_url:{url}"),
            Step::AssertUrl { url } => format!("assert_url:{url}"),
            Step::AssertUrlMatches { pattern } => format!("assert_url_matches:{pattern}"),
            Step::Assert { selector, .. } => format!("assert:{selector}"),
            Step::UploadFile { selector, .. } => format!("upload_file:{selector}"),
            Step::Screenshot { name } => format!("screenshot:{name}"),
            Step::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_step_list() {
        // The selector `"#` sequence would close a single-hash raw string.
        let json = r##"[
            { "action": "navigate", "url": "/login/" },
            { "action": "fill", "selector": "[placeholder=\"Email Address\"]", "value": "user@example.org" },
            { "action": "click", "selector": "role=button[name=\"Log in\"]" },
            { "action": "wait", "selector": "#user-profile-dropdown" }
        ]"##;
        let steps: Vec<Step> = serde_json::from_str(json).unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(&steps[0], Step::Navigate { url } if url == "/login/"));
        assert!(matches!(
            &steps[3],
            Step::Wait { timeout_ms, .. } if *timeout_ms == DEFAULT_WAIT_TIMEOUT_MS
        ));
    }

    #[test]
    fn parse_assert_with_bounded_timeout() {
        let json = r#"{
            "action": "assert",
            "selector": ".progress.success",
            "visible": true,
            "timeout_ms": 30000
        }"#;
        let step: Step = serde_json::from_str(json).unwrap();
        match step {
            Step::Assert {
                visible,
                timeout_ms,
                ..
            } => {
                assert_eq!(visible, Some(true));
                assert_eq!(timeout_ms, Some(30_000));
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn labels_identify_the_target() {
        let step = Step::Click {
            selector: "#quick-create-dropdown".into(),
            nth: None,
            timeout_ms: None,
        };
        assert_eq!(step.label(), "click:#quick-create-dropdown");

        let step = Step::UploadFile {
            selector: "role=button[name=\"Upload files\"]".into(),
            path: "tests/data/test_example.txt".into(),
        };
        assert!(step.label().starts_with("upload_file:"));
    }

    #[test]
    fn log_label_truncates_on_char_boundaries() {
        // Byte 30 of this message falls inside a two-byte character.
        let step = Step::Log {
            message: format!("a{}", "é".repeat(40)),
        };
        assert_eq!(step.label(), format!("log:a{}", "é".repeat(29)));
    }
}
