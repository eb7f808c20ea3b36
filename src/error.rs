//! Error types for the E2E runner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    /// A required credential or setting is missing before any browser action.
    #[error("{0}")]
    Config(String),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Step {index} failed: {label} - {reason}")]
    StepFailed {
        index: usize,
        label: String,
        reason: String,
    },

    #[error("Invalid URL pattern `{pattern}`: {reason}")]
    InvalidUrlPattern { pattern: String, reason: String },

    #[error("Target {url} unreachable after {attempts} attempts")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
