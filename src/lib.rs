//! Browser E2E tests for an InvenioRDM research-data repository
//!
//! This crate drives a hosted InvenioRDM instance through its web UI with
//! Playwright, controlled from Rust:
//! - Loads two test accounts from environment variables
//! - Builds declarative step sequences for the UI flows (login, community
//!   creation, record upload, community submission, request acceptance)
//! - Compiles each scenario into one Playwright script so a single browser
//!   session spans every step
//! - Reports results as JSON with the failing step identified
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Scenario Runner (Rust)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                             │
//! │    ├── preflight() -> target reachability check             │
//! │    ├── run_scenario(scenario) -> ScenarioResult             │
//! │    └── write_results(suite) -> JSON report                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (built by flows)                                  │
//! │    ├── login / logout                                       │
//! │    ├── create_community -> settings URL assertion           │
//! │    ├── create_record -> upload + publish + title assertion  │
//! │    ├── submit_to_community -> consent + review request      │
//! │    └── accept_request -> record listed in community         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightHandle                                           │
//! │    ├── build_script(steps) -> Node/Playwright script        │
//! │    └── run(scenario) -> outcome with failing step index     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod env;
pub mod error;
pub mod flows;
pub mod playwright;
pub mod runner;
pub mod scenario;
pub mod step;

pub use env::{Credentials, TestAccounts};
pub use error::{E2eError, E2eResult};
pub use runner::ScenarioRunner;
pub use scenario::Scenario;
pub use step::Step;
