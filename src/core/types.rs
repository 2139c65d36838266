//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CommitId`] - Content-addressed commit identifier (hex SHA)
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so dedup logic can hash and compare them
//! without re-normalizing.
//!
//! # Examples
//!
//! ```
//! use git_utils::core::types::CommitId;
//!
//! let id = CommitId::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! assert_eq!(id.as_str(), "abc123def4567890abc123def4567890abc12345");
//! assert!(CommitId::new("not-a-sha").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),
}

/// A commit identifier (SHA-1 or SHA-256), normalized to lowercase hex.
///
/// Two identifiers are equal iff they name the same commit content, which
/// makes this the equality and hash key throughout the dedup logic.
///
/// # Example
///
/// ```
/// use git_utils::core::types::CommitId;
///
/// let id = CommitId::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// assert_eq!(id.as_str(), "abc123def4567890abc123def4567890abc12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    /// Create a new validated commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitId` if the string is not a 40 or 64
    /// character hex id.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into().to_ascii_lowercase();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if id.len() != 40 && id.len() != 64 {
            return Err(TypeError::InvalidCommitId(format!(
                "expected 40 or 64 hex characters, got {}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidCommitId(
                "commit id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
