//! auth
//!
//! Credentials for GitHub API requests.
//!
//! # Modes
//!
//! - [`Credentials::Basic`] - user name and password/token (HTTP basic auth)
//! - [`Credentials::Bearer`] - personal access or app token
//! - [`Credentials::Anonymous`] - no `Authorization` header
//!
//! Credentials are never stored by this crate; they come from flags or the
//! environment at startup.
//!
//! # Security
//!
//! Secrets must never appear in logs, errors, or debug output. The `Debug`
//! implementation redacts them, and [`Credentials::describe`] shows only the
//! last characters of a token.
//!
//! # Example
//!
//! ```
//! use git_utils::auth::Credentials;
//!
//! let creds = Credentials::bearer("ghp_0123456789abcdef");
//! assert_eq!(creds.describe(), "token ...89abcdef");
//! assert!(!format!("{:?}", creds).contains("ghp_"));
//! ```

/// Default environment variable holding the user for basic auth.
pub const DEFAULT_USER_VAR: &str = "GITHUB_USER";

/// Default environment variable holding the token.
pub const DEFAULT_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// How requests authenticate.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic auth.
    Basic {
        /// User name
        user: String,
        /// Password or token
        password: String,
    },
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// Unauthenticated requests (low rate limits).
    #[default]
    Anonymous,
}

impl Credentials {
    /// Basic auth with a user and password.
    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Bearer token auth.
    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::Bearer(token.into())
    }

    /// No authentication.
    pub fn anonymous() -> Self {
        Credentials::Anonymous
    }

    /// Basic auth from the environment.
    ///
    /// Reads `user_var` and `password_var`; returns [`Credentials::Anonymous`]
    /// unless both are set and non-empty.
    pub fn from_env(user_var: &str, password_var: &str) -> Self {
        let user = std::env::var(user_var).ok().filter(|v| !v.is_empty());
        let password = std::env::var(password_var).ok().filter(|v| !v.is_empty());
        match (user, password) {
            (Some(user), Some(password)) => Credentials::basic(user, password),
            _ => Credentials::Anonymous,
        }
    }

    /// Bearer token from an optional value, anonymous when absent or empty.
    pub fn from_token(token: Option<String>) -> Self {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => Credentials::Bearer(token),
            None => Credentials::Anonymous,
        }
    }

    /// Whether requests will carry an `Authorization` header.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Credentials::Anonymous)
    }

    /// A log-safe description of the credentials.
    pub fn describe(&self) -> String {
        match self {
            Credentials::Basic { user, .. } => format!("user {:?} with password", user),
            Credentials::Bearer(token) => format!("token ...{}", token_suffix(token)),
            Credentials::Anonymous => "anonymous".to_string(),
        }
    }
}

/// Last eight characters of a token, or all of it when shorter.
fn token_suffix(token: &str) -> &str {
    let start = token
        .char_indices()
        .rev()
        .nth(7)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &token[start..]
}

// Custom Debug to avoid exposing secrets
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"[REDACTED]")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Credentials::Anonymous => write!(f, "Anonymous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::basic("octocat", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("octocat"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn debug_redacts_token() {
        let debug = format!("{:?}", Credentials::bearer("secret-token"));
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn from_token_empty_is_anonymous() {
        assert_eq!(Credentials::from_token(None), Credentials::Anonymous);
        assert_eq!(
            Credentials::from_token(Some(String::new())),
            Credentials::Anonymous
        );
        assert!(Credentials::from_token(Some("t".into())).is_authenticated());
    }

    #[test]
    fn from_env_requires_both_vars() {
        assert_eq!(
            Credentials::from_env(
                "GIT_UTILS_TEST_UNSET_USER_VAR",
                "GIT_UTILS_TEST_UNSET_TOKEN_VAR"
            ),
            Credentials::Anonymous
        );
    }

    #[test]
    fn describe_short_token() {
        assert_eq!(Credentials::bearer("abc").describe(), "token ...abc");
        assert_eq!(Credentials::anonymous().describe(), "anonymous");
    }
}
