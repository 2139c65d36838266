//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order; the first existing file wins:
//! 1. `$GIT_UTILS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/git-utils/config.toml`
//! 3. `~/.git-utils/config.toml`
//!
//! A missing file is not an error.
//!
//! # Example
//!
//! ```no_run
//! use git_utils::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("API base: {}", config.api_base());
//! println!("Clone failures: {:?}", config.clone_failure_policy());
//! ```

pub mod schema;

pub use schema::{FileConfig, GitHubConfig, RemoteTagsConfig, UnpushedConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::unpushed::CloneFailurePolicy;
use crate::forge::{DEFAULT_API_BASE, DEFAULT_PER_PAGE};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GIT_UTILS_CONFIG";

/// Scheme used to complete bare repository names.
pub const DEFAULT_SCHEME: &str = "git";

/// Host used to complete bare repository names.
pub const DEFAULT_HOST: &str = "github.com";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (empty when no file was found)
    pub file: FileConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load() -> Result<Config, ConfigError> {
        let candidates = candidate_paths(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        );

        match candidates.into_iter().find(|path| path.exists()) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// GitHub API base URL.
    ///
    /// Defaults to `https://api.github.com`.
    pub fn api_base(&self) -> &str {
        self.file
            .github
            .as_ref()
            .and_then(|g| g.api_base.as_deref())
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// Page size for paginated requests.
    ///
    /// Defaults to 100.
    pub fn per_page(&self) -> u32 {
        self.file
            .github
            .as_ref()
            .and_then(|g| g.per_page)
            .unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Clone failure handling for `unpushed`.
    ///
    /// Defaults to [`CloneFailurePolicy::Skip`].
    pub fn clone_failure_policy(&self) -> CloneFailurePolicy {
        self.file
            .unpushed
            .as_ref()
            .and_then(|u| u.on_clone_failure)
            .unwrap_or_default()
    }

    /// Scheme for completing bare repository names.
    pub fn default_scheme(&self) -> &str {
        self.file
            .remote_tags
            .as_ref()
            .and_then(|r| r.default_scheme.as_deref())
            .unwrap_or(DEFAULT_SCHEME)
    }

    /// Host for completing bare repository names.
    pub fn default_host(&self) -> &str {
        self.file
            .remote_tags
            .as_ref()
            .and_then(|r| r.default_host.as_deref())
            .unwrap_or(DEFAULT_HOST)
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Config file candidates in search order.
fn candidate_paths(
    explicit: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    paths.extend(explicit);
    paths.extend(xdg_config_home.map(|dir| dir.join("git-utils/config.toml")));
    paths.extend(home.map(|dir| dir.join(".git-utils/config.toml")));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.api_base(), "https://api.github.com");
        assert_eq!(config.per_page(), 100);
        assert_eq!(config.clone_failure_policy(), CloneFailurePolicy::Skip);
        assert_eq!(config.default_scheme(), "git");
        assert_eq!(config.default_host(), "github.com");
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn candidate_order() {
        let paths = candidate_paths(
            Some(PathBuf::from("/explicit.toml")),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/explicit.toml"),
                PathBuf::from("/xdg/git-utils/config.toml"),
                PathBuf::from("/home/u/.git-utils/config.toml"),
            ]
        );
        assert!(candidate_paths(None, None, None).is_empty());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [github]
            per_page = 25

            [unpushed]
            on_clone_failure = "abort"
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.per_page(), 25);
        assert_eq!(config.api_base(), "https://api.github.com");
        assert_eq!(config.clone_failure_policy(), CloneFailurePolicy::Abort);
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[github\nper_page = 1").unwrap();

        match Config::load_from(&path) {
            Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[github]\nper_page = 500\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
