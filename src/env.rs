//! Credential loading from environment variables
//!
//! The scenarios need two accounts on the target instance: user 1 uploads and
//! submits the record, user 2 owns the community and approves the inclusion
//! request. All four variables are validated eagerly, before any browser
//! action, so a missing secret fails with guidance instead of a selector
//! timeout halfway through a run.

use crate::error::{E2eError, E2eResult};

pub const USER1_EMAIL: &str = "E2E_USER1_EMAIL";
pub const USER1_PASSWORD: &str = "E2E_USER1_PASSWORD";
pub const USER2_EMAIL: &str = "E2E_USER2_EMAIL";
pub const USER2_PASSWORD: &str = "E2E_USER2_PASSWORD";

/// One account on the target instance.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The two accounts the combined scenario switches between.
#[derive(Debug, Clone)]
pub struct TestAccounts {
    /// User 1: uploads the record and submits it to the community.
    pub submitter: Credentials,
    /// User 2: creates the community and accepts the inclusion request.
    pub owner: Credentials,
}

impl TestAccounts {
    /// Load both accounts, failing on the first missing or blank variable.
    pub fn from_env() -> E2eResult<Self> {
        Ok(Self {
            submitter: Credentials {
                email: require_env(USER1_EMAIL)?,
                password: require_env(USER1_PASSWORD)?,
            },
            owner: Credentials {
                email: require_env(USER2_EMAIL)?,
                password: require_env(USER2_PASSWORD)?,
            },
        })
    }
}

/// Read a required environment variable, rejecting absent and
/// whitespace-only values.
pub fn require_env(key: &str) -> E2eResult<String> {
    let ci = std::env::var("CI").map(|v| v == "true").unwrap_or(false);
    validate(key, std::env::var(key).ok().as_deref(), ci)
}

fn validate(key: &str, value: Option<&str>, ci: bool) -> E2eResult<String> {
    let problem = match value {
        None => Some(format!("Environment variable `{key}` not defined.")),
        Some(v) if v.trim().is_empty() => {
            Some(format!("Environment variable `{key}` defined but empty."))
        }
        _ => None,
    };

    if let Some(problem) = problem {
        let extra = if ci {
            "Please define CI secrets as described in the README file."
        } else {
            "Please create an `.env` file as described in the README file."
        };
        return Err(E2eError::Config(format!("{problem} {extra}")));
    }

    // Passwords may legitimately carry leading or trailing spaces.
    Ok(value.unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None ; "not defined")]
    #[test_case(Some("") ; "empty")]
    #[test_case(Some("   ") ; "whitespace only")]
    fn missing_or_blank_is_rejected(value: Option<&str>) {
        let err = validate(USER1_EMAIL, value, false).unwrap_err();
        assert!(matches!(err, E2eError::Config(_)));
    }

    #[test_case(USER1_EMAIL)]
    #[test_case(USER1_PASSWORD)]
    #[test_case(USER2_EMAIL)]
    #[test_case(USER2_PASSWORD)]
    fn error_names_the_variable(key: &str) {
        let err = validate(key, None, false).unwrap_err();
        assert!(err.to_string().contains(&format!("`{key}`")));
    }

    #[test]
    fn local_hint_points_at_env_file() {
        let err = validate(USER2_PASSWORD, Some(""), false).unwrap_err();
        assert!(err.to_string().contains("`.env` file"));
    }

    #[test]
    fn ci_hint_points_at_secrets() {
        let err = validate(USER2_PASSWORD, Some(""), true).unwrap_err();
        assert!(err.to_string().contains("CI secrets"));
    }

    #[test]
    fn present_value_passes_through_untrimmed() {
        let value = validate(USER1_PASSWORD, Some(" hunter2 "), false).unwrap();
        assert_eq!(value, " hunter2 ");
    }
}
