//! Deployment stage selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable naming the deployment stage.
pub const STAGE_ENV_VAR: &str = "PRODUCTSEARCH_STAGE";

/// Stage used when none is configured.
pub const DEFAULT_STAGE: &str = "development";

/// Deployment stage, e.g. `development`, `qa` or `production`.
///
/// The stage picks the `config/{stage}.toml` overlay. Any non-empty name is
/// accepted; it is normalised to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Stage(String);

impl Stage {
    /// Creates a stage from a name, falling back to the default when blank.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        if name.is_empty() {
            Self::default()
        } else {
            Self(name.to_lowercase())
        }
    }

    /// Reads the stage from [`STAGE_ENV_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(STAGE_ENV_VAR).map_or_else(|_| Self::default(), Self::new)
    }

    /// Returns the stage name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the production stage.
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self.0.as_str(), "production" | "prod")
    }

    /// Returns the overlay file name for this stage.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.toml", self.0)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self(DEFAULT_STAGE.to_string())
    }
}

impl From<String> for Stage {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_normalisation() {
        assert_eq!(Stage::new("QA").as_str(), "qa");
        assert_eq!(Stage::new("  ").as_str(), DEFAULT_STAGE);
        assert_eq!(Stage::new("qa").file_name(), "qa.toml");
    }

    #[test]
    fn test_is_production() {
        assert!(Stage::new("production").is_production());
        assert!(Stage::new("PROD").is_production());
        assert!(!Stage::default().is_production());
    }
}
