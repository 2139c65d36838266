//! git::urls
//!
//! Remote URL helpers: scp-like syntax normalization, short host aliases,
//! and completion of bare `owner/repo` paths into full URLs.

use url::Url;

/// Short aliases for well-known hosts.
const HOSTNAME_ALIASES: &[(&str, &str)] = &[
    ("github.com", "github"),
    ("gist.github.com", "gist"),
    ("bitbucket.org", "bitbucket"),
    ("gitlab.com", "gitlab"),
];

/// Rewrite scp-like git URLs (`user@host:path`) as `ssh://` URLs.
///
/// Other inputs are returned unchanged.
///
/// # Example
///
/// ```
/// use git_utils::git::urls::normalize_url;
///
/// assert_eq!(
///     normalize_url("git@github.com:owner/repo.git"),
///     "ssh://git@github.com/owner/repo.git"
/// );
/// assert_eq!(normalize_url("https://example.com/x"), "https://example.com/x");
/// ```
pub fn normalize_url(url: &str) -> String {
    match split_scp_like(url) {
        Some((user, host, path)) => format!("ssh://{}{}/{}", user, host, path),
        None => url.to_string(),
    }
}

/// Split `[user@]host:path` into `(user@, host, path)`.
///
/// The host may not contain `:/?#` and the path must not start with `/`
/// (that form is a local path or a URL with a scheme).
fn split_scp_like(url: &str) -> Option<(&str, &str, &str)> {
    let (before, path) = url.split_once(':')?;
    if path.is_empty() || path.starts_with('/') {
        return None;
    }
    let (user, host) = match before.rfind('@') {
        Some(at) => before.split_at(at + 1),
        None => ("", before),
    };
    let forbidden = |c: char| matches!(c, ':' | '/' | '?' | '#');
    if host.is_empty() || host.contains(forbidden) || user.trim_end_matches('@').contains(forbidden)
    {
        return None;
    }
    Some((user, host, path))
}

/// Shorten a git URL to `alias:owner/repo` when its host is well known.
///
/// # Example
///
/// ```
/// use git_utils::git::urls::alias_url;
///
/// assert_eq!(alias_url("git@github.com:owner/repo.git"), "github:owner/repo");
/// assert_eq!(alias_url("https://example.com/a.git"), "https://example.com/a.git");
/// ```
pub fn alias_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(&normalize_url(url)) else {
        return url.to_string();
    };
    let alias = parsed.host_str().and_then(|host| {
        HOSTNAME_ALIASES
            .iter()
            .find(|(name, _)| *name == host)
            .map(|(_, alias)| *alias)
    });
    match alias {
        Some(alias) => {
            let path = parsed.path().trim_start_matches('/');
            let path = path.strip_suffix(".git").unwrap_or(path);
            format!("{}:{}", alias, path)
        }
        None => url.to_string(),
    }
}

/// Complete a repository argument into a URL.
///
/// Inputs that already name a location (a URL with a scheme, an scp-like
/// address, or an existing filesystem path) are returned unchanged. Anything
/// else is treated as the path part of a URL and gets `default_scheme` and
/// `default_host` added.
///
/// # Example
///
/// ```
/// use git_utils::git::urls::complete_repository_url;
///
/// assert_eq!(
///     complete_repository_url("owner/repo", "git", "github.com"),
///     "git://github.com/owner/repo"
/// );
/// ```
pub fn complete_repository_url(repository: &str, default_scheme: &str, default_host: &str) -> String {
    if repository.contains("://")
        || split_scp_like(repository).is_some()
        || std::path::Path::new(repository).exists()
    {
        return repository.to_string();
    }
    format!(
        "{}://{}/{}",
        default_scheme,
        default_host,
        repository.trim_start_matches('/')
    )
}
