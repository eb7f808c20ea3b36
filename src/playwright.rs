//! Playwright script generation and execution
//!
//! A whole scenario compiles into one generated Node script so a single
//! browser context carries the login session across every step. The script
//! reports its outcome as a JSON line on stdout; on failure it records the
//! index of the step that threw and captures a full-page screenshot for
//! diagnostics.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use regex::Regex;
use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};
use crate::scenario::Scenario;
use crate::step::Step;

/// Playwright browser handle
pub struct PlaywrightHandle {
    base_url: String,
    screenshot_dir: PathBuf,
    viewport_width: u32,
    viewport_height: u32,
    browser: Browser,
    headless: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
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

    fn from_str(s: &str) -> E2eResult<Self> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(E2eError::Config(format!("Unknown browser `{other}`."))),
        }
    }
}

/// Outcome line printed by the generated script.
#[derive(Debug, Deserialize)]
struct ScriptReport {
    success: bool,
    #[serde(default)]
    step: usize,
    #[serde(default)]
    error: Option<String>,
}

impl PlaywrightHandle {
    /// Create a new Playwright handle
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;

        std::fs::create_dir_all(&config.screenshot_dir)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            screenshot_dir: config.screenshot_dir,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            browser: config.browser,
            headless: config.headless,
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
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

    /// Run a whole scenario as one generated script.
    pub async fn run(&self, scenario: &Scenario) -> E2eResult<()> {
        let script = self.build_script(scenario.name(), scenario.steps())?;
        let report = self.run_script(&script).await?;

        if report.success {
            return Ok(());
        }

        let index = report.step;
        let label = scenario
            .steps()
            .get(index)
            .map(Step::label)
            .unwrap_or_else(|| "unknown".to_string());
        Err(E2eError::StepFailed {
            index,
            label,
            reason: report.error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Build the Playwright script for a named step sequence.
    pub fn build_script(&self, name: &str, steps: &[Step]) -> E2eResult<String> {
        let mut script = String::new();

        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');
const {{ expect }} = require('@playwright/test');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const baseUrl = '{base_url}';
  const escBase = baseUrl.replace(/[.*+?^${{}}()|[\]\\]/g, '\\$&');
  let step = 0;

  try {{
"#,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = self.viewport_width,
            height = self.viewport_height,
            base_url = js_str(&self.base_url),
        ));

        for (i, s) in steps.iter().enumerate() {
            script.push_str(&format!("\n    // step {}: {}\n", i, s.label()));
            script.push_str(&format!("    step = {i};\n"));
            script.push_str(&self.step_to_js(s, i)?);
            script.push('\n');
        }

        let failure_shot = self
            .screenshot_dir
            .join(format!("{name}-failure.png"))
            .to_string_lossy()
            .to_string();

        script.push_str(&format!(
            r#"
    console.log(JSON.stringify({{ success: true, steps: {count} }}));
  }} catch (error) {{
    await page.screenshot({{ path: '{shot}', fullPage: true }}).catch(() => {{}});
    console.log(JSON.stringify({{ success: false, step, error: error.message }}));
    process.exitCode = 1;
  }} finally {{
    await browser.close();
  }}
}})();
"#,
            count = steps.len(),
            shot = js_str(&failure_shot),
        ));

        Ok(script)
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &Step, index: usize) -> E2eResult<String> {
        let js = match step {
            Step::Navigate { url } => {
                format!("    await page.goto({});", js_url(url))
            }
            Step::Click {
                selector,
                nth,
                timeout_ms,
            } => {
                let timeout = timeout_ms.unwrap_or(crate::step::DEFAULT_WAIT_TIMEOUT_MS);
                let nth = nth.map(|n| format!(".nth({n})")).unwrap_or_default();
                format!(
                    "    await page.locator('{}'){}.click({{ timeout: {} }});",
                    js_str(selector),
                    nth,
                    timeout
                )
            }
            Step::Fill { selector, value } => {
                format!(
                    "    await page.locator('{}').fill('{}');",
                    js_str(selector),
                    js_str(value)
                )
            }
            Step::Wait {
                selector,
                timeout_ms,
            } => {
                format!(
                    "    await page.locator('{}').waitFor({{ state: 'visible', timeout: {} }});",
                    js_str(selector),
                    timeout_ms
                )
            }
            Step::WaitForUrl { url } => {
                format!("    await page.waitForURL({});", js_url(url))
            }
            Step::AssertUrl { url } => {
                format!("    await expect(page).toHaveURL({});", js_url(url))
            }
            Step::AssertUrlMatches { pattern } => {
                // Reject malformed patterns here rather than inside the browser.
                Regex::new(pattern).map_err(|e| E2eError::InvalidUrlPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                format!(
                    "    await expect(page).toHaveURL(new RegExp(escBase + '{}'));",
                    js_str(pattern)
                )
            }
            Step::Assert {
                selector,
                visible,
                text_contains,
                min_count,
                timeout_ms,
            } => {
                let opts = timeout_ms
                    .map(|t| format!("{{ timeout: {t} }}"))
                    .unwrap_or_default();
                let mut assertions = Vec::new();

                if let Some(vis) = visible {
                    let matcher = if *vis { "toBeVisible" } else { "toBeHidden" };
                    assertions.push(format!(
                        "    await expect(page.locator('{}')).{}({});",
                        js_str(selector),
                        matcher,
                        opts
                    ));
                }
                if let Some(text) = text_contains {
                    assertions.push(format!(
                        "    await expect(page.locator('{}')).toContainText('{}'{});",
                        js_str(selector),
                        js_str(text),
                        if opts.is_empty() {
                            String::new()
                        } else {
                            format!(", {opts}")
                        }
                    ));
                }
                if let Some(min) = min_count {
                    assertions.push(format!(
                        "    expect(await page.locator('{}').count()).toBeGreaterThanOrEqual({});",
                        js_str(selector),
                        min
                    ));
                }
                assertions.join("\n")
            }
            Step::UploadFile { selector, path } => {
                format!(
                    r#"    const [chooser{index}] = await Promise.all([
      page.waitForEvent('filechooser'),
      page.locator('{}').click(),
    ]);
    await chooser{index}.setFiles('{}');"#,
                    js_str(selector),
                    js_str(path)
                )
            }
            Step::Screenshot { name } => {
                let path = self.screenshot_dir.join(format!("{name}.png"));
                format!(
                    "    await page.screenshot({{ path: '{}', fullPage: true }});",
                    js_str(&path.to_string_lossy())
                )
            }
            Step::Log { message } => {
                format!("    console.log('[test] {}');", js_str(message))
            }
        };
        Ok(js)
    }

    /// Execute a generated script and parse its outcome line.
    async fn run_script(&self, script: &str) -> E2eResult<ScriptReport> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        // The outcome is the last stdout line that parses as a report; the
        // script may log freely before it.
        let report = stdout
            .lines()
            .rev()
            .find_map(|line| serde_json::from_str::<ScriptReport>(line).ok());

        match report {
            Some(report) => {
                if !report.success {
                    info!(
                        "Scenario failed at step {}: {}",
                        report.step,
                        report.error.as_deref().unwrap_or("unknown error")
                    );
                }
                Ok(report)
            }
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(E2eError::Playwright(format!(
                    "Script produced no outcome:\nstdout: {stdout}\nstderr: {stderr}"
                )))
            }
        }
    }
}

/// Escape a string for embedding in a single-quoted JS literal.
fn js_str(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

/// Emit a JS expression for a step URL: absolute URLs pass through,
/// relative paths resolve against `baseUrl`.
fn js_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        format!("'{}'", js_str(url))
    } else {
        format!("baseUrl + '{}'", js_str(url))
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub browser: Browser,
    pub headless: bool,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "https://inveniordm.web.cern.ch".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            // Wide enough for the desktop layout of the target UI.
            viewport_width: 1500,
            viewport_height: 1080,
            browser: Browser::Chromium,
            headless: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> PlaywrightHandle {
        // Bypasses the npx check; script generation needs no installation.
        PlaywrightHandle {
            base_url: "https://inveniordm.web.cern.ch".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            viewport_width: 1500,
            viewport_height: 1080,
            browser: Browser::Chromium,
            headless: true,
        }
    }

    #[test]
    fn script_carries_viewport_and_expect_import() {
        let steps = vec![Step::Navigate {
            url: "/login/".into(),
        }];
        let script = handle().build_script("login", &steps).unwrap();
        assert!(script.contains("require('@playwright/test')"));
        assert!(script.contains("width: 1500, height: 1080"));
        assert!(script.contains("await page.goto(baseUrl + '/login/');"));
    }

    #[test]
    fn absolute_urls_bypass_the_base() {
        let steps = vec![Step::Navigate {
            url: "https://example.org/".into(),
        }];
        let script = handle().build_script("nav", &steps).unwrap();
        assert!(script.contains("await page.goto('https://example.org/');"));
    }

    #[test]
    fn click_uses_nth_and_timeout() {
        let steps = vec![Step::Click {
            selector: "text=\"No\"".into(),
            nth: Some(0),
            timeout_ms: Some(10_000),
        }];
        let script = handle().build_script("doi", &steps).unwrap();
        assert!(script.contains(".nth(0).click({ timeout: 10000 });"));
    }

    #[test]
    fn upload_waits_for_the_file_chooser() {
        let steps = vec![Step::UploadFile {
            selector: "role=button[name=\"Upload files\"]".into(),
            path: "tests/data/test_example.txt".into(),
        }];
        let script = handle().build_script("upload", &steps).unwrap();
        assert!(script.contains("page.waitForEvent('filechooser')"));
        assert!(script.contains(".setFiles('tests/data/test_example.txt');"));
    }

    #[test]
    fn url_pattern_is_anchored_at_the_base() {
        let steps = vec![Step::AssertUrlMatches {
            pattern: "/records/[a-zA-Z0-9]+".into(),
        }];
        let script = handle().build_script("record", &steps).unwrap();
        assert!(script.contains("new RegExp(escBase + '/records/[a-zA-Z0-9]+')"));
    }

    #[test]
    fn malformed_url_pattern_is_rejected() {
        let steps = vec![Step::AssertUrlMatches {
            pattern: "/records/[".into(),
        }];
        let err = handle().build_script("bad", &steps).unwrap_err();
        assert!(matches!(err, E2eError::InvalidUrlPattern { .. }));
    }

    #[test]
    fn selectors_with_quotes_are_escaped() {
        let steps = vec![Step::Click {
            selector: "label.field-label-class:has-text(\"Public\")".into(),
            nth: None,
            timeout_ms: None,
        }];
        let script = handle().build_script("community", &steps).unwrap();
        assert!(script.contains(r#"page.locator('label.field-label-class:has-text("Public")')"#));
    }

    #[test]
    fn js_str_escapes_quotes_and_backslashes() {
        assert_eq!(js_str("it's"), "it\\'s");
        assert_eq!(js_str(r"a\b"), r"a\\b");
    }

    #[test]
    fn step_indices_are_tracked_for_failure_reports() {
        let steps = vec![
            Step::Navigate { url: "/".into() },
            Step::Wait {
                selector: "#user-profile-dropdown".into(),
                timeout_ms: 5_000,
            },
        ];
        let script = handle().build_script("track", &steps).unwrap();
        assert!(script.contains("step = 0;"));
        assert!(script.contains("step = 1;"));
        assert!(script.contains(r#"JSON.stringify({ success: false, step, error: error.message })"#));
    }
}
