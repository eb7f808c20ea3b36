//! Scenario execution and reporting
//!
//! The runner preflights the hosted target for reachability, executes
//! scenarios fail-fast, and writes a JSON results file with per-scenario
//! timing and the failing step, when any.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightConfig, PlaywrightHandle};
use crate::scenario::Scenario;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub failed_step: Option<FailedStep>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedStep {
    pub index: usize,
    pub label: String,
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub playwright: PlaywrightConfig,
    pub output_dir: PathBuf,
    pub preflight_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            playwright: PlaywrightConfig::default(),
            output_dir: PathBuf::from("test-results"),
            preflight_timeout: Duration::from_secs(30),
        }
    }
}

/// Executes scenarios against the hosted target.
pub struct ScenarioRunner {
    playwright_config: PlaywrightConfig,
    output_dir: PathBuf,
    preflight_timeout: Duration,
}

impl ScenarioRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            playwright_config: config.playwright,
            output_dir: config.output_dir,
            preflight_timeout: config.preflight_timeout,
        }
    }

    /// Check the target responds before any browser action. The target is a
    /// hosted instance, so this only distinguishes "down or unreachable"
    /// from scenario failures.
    pub async fn preflight(&self) -> E2eResult<()> {
        let url = &self.playwright_config.base_url;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        while start.elapsed() < self.preflight_timeout {
            attempts += 1;

            match client.get(url.as_str()).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("Target reachable at {}", url);
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("Target returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for target {}...", url);
                    }
                    if !e.is_connect() && !e.is_timeout() {
                        warn!("Preflight error: {}", e);
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        Err(E2eError::TargetUnreachable {
            url: url.clone(),
            attempts,
        })
    }

    /// Run one scenario end to end. Step failures become a failed result;
    /// setup errors (missing Playwright, IO) propagate.
    pub async fn run_scenario(&self, scenario: &Scenario) -> E2eResult<ScenarioResult> {
        let start = Instant::now();
        info!("Running scenario: {} ({} steps)", scenario.name(), scenario.len());

        let playwright = PlaywrightHandle::new(self.playwright_config.clone())?;
        let outcome = playwright.run(scenario).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        Ok(result_from_outcome(scenario.name(), duration_ms, outcome))
    }

    /// Run scenarios strictly sequentially, each owning its own session.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> E2eResult<SuiteResult> {
        let start = Instant::now();

        self.preflight().await?;

        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await?;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Scenario results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(SuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Write suite results to a JSON file in the output directory.
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("scenario-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

fn result_from_outcome(
    name: &str,
    duration_ms: u64,
    outcome: E2eResult<()>,
) -> ScenarioResult {
    match outcome {
        Ok(()) => ScenarioResult {
            name: name.to_string(),
            success: true,
            duration_ms,
            failed_step: None,
            error: None,
        },
        Err(E2eError::StepFailed {
            index,
            label,
            reason,
        }) => ScenarioResult {
            name: name.to_string(),
            success: false,
            duration_ms,
            failed_step: Some(FailedStep { index, label }),
            error: Some(reason),
        },
        Err(e) => ScenarioResult {
            name: name.to_string(),
            success: false,
            duration_ms,
            failed_step: None,
            error: Some(e.to_string()),
        },
    }
}
