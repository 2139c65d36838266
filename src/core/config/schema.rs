//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the API base must be an
//! absolute http(s) URL, the page size must be within GitHub's 1..=100, and
//! the remote-tags defaults must be non-empty.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::unpushed::CloneFailurePolicy;

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Configuration file contents.
///
/// # Example
///
/// ```toml
/// [github]
/// api_base = "https://github.example.com/api/v3"
/// per_page = 50
///
/// [unpushed]
/// on_clone_failure = "abort"
///
/// [remote_tags]
/// default_scheme = "https"
/// default_host = "gitlab.com"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// GitHub API settings
    pub github: Option<GitHubConfig>,

    /// Unpushed-commit search settings
    pub unpushed: Option<UnpushedConfig>,

    /// Defaults for completing bare repository names
    pub remote_tags: Option<RemoteTagsConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(github) = &self.github {
            github.validate()?;
        }
        if let Some(remote_tags) = &self.remote_tags {
            remote_tags.validate()?;
        }
        Ok(())
    }
}

/// `[github]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// API base URL (GitHub Enterprise)
    pub api_base: Option<String>,

    /// Page size for paginated requests
    pub per_page: Option<u32>,
}

impl GitHubConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.api_base {
            let parsed = url::Url::parse(base).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid github.api_base '{}': {}", base, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue(format!(
                    "github.api_base must be an http(s) URL, got '{}'",
                    base
                )));
            }
        }

        if let Some(per_page) = self.per_page {
            if per_page == 0 || per_page > MAX_PER_PAGE {
                return Err(ConfigError::InvalidValue(format!(
                    "github.per_page must be between 1 and {}, got {}",
                    MAX_PER_PAGE, per_page
                )));
            }
        }

        Ok(())
    }
}

/// `[unpushed]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UnpushedConfig {
    /// What to do when a remote cannot be cloned
    pub on_clone_failure: Option<CloneFailurePolicy>,
}

/// `[remote_tags]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteTagsConfig {
    /// Scheme for bare `owner/repo` names
    pub default_scheme: Option<String>,

    /// Host for bare `owner/repo` names
    pub default_host: Option<String>,
}

impl RemoteTagsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("remote_tags.default_scheme", &self.default_scheme),
            ("remote_tags.default_host", &self.default_host),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
            }
        }
        Ok(())
    }
}
