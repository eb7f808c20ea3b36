//! Scenario model and the transient UI entities it correlates on
//!
//! Cross-step references are by visible text (community name, record title),
//! mirroring how the target UI is driven. The randomized community slug keeps
//! repeated runs from colliding on the search steps.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::step::Step;

/// A named, ordered list of UI steps executed in one browser session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Random mixed-case alphanumeric identifier.
pub fn random_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// A community created once per run and referenced by name afterwards.
#[derive(Debug, Clone)]
pub struct Community {
    pub name: String,
    pub slug: String,
}

impl Community {
    /// New community with a random 8-character slug and a display name
    /// carrying the same id, so searches find exactly this run's community.
    pub fn random() -> Self {
        let slug = random_id(8);
        Self {
            name: format!("Community Test Playwright {slug}"),
            slug,
        }
    }

    /// The settings page the UI redirects to after creation. The target
    /// lowercases slugs on the server side.
    pub fn settings_path(&self) -> String {
        format!("/communities/{}/settings", self.slug.to_lowercase())
    }
}

/// Metadata for the record upload form.
#[derive(Debug, Clone)]
pub struct RecordMeta {
    pub title: String,
    pub resource_type: String,
    /// Typed into the creator search box.
    pub creator_query: String,
    /// Suggestion entry picked from the search results.
    pub creator_option: String,
    /// Name shown on the published record page.
    pub creator_display: String,
}

impl RecordMeta {
    /// The fixed dataset metadata the scenario publishes.
    pub fn dataset(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            resource_type: "Dataset".to_string(),
            creator_query: "lars holm nielsen".to_string(),
            creator_option: "Nielsen, Lars Holm (0000-0001".to_string(),
            creator_display: "Nielsen, Lars Holm".to_string(),
        }
    }
}
