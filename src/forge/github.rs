//! forge::github
//!
//! Paginated client for the GitHub REST API.
//!
//! # Design
//!
//! [`GitHubClient`] issues one request per call and never retries. Every
//! request carries the same headers (`Accept`, `User-Agent`, API version and
//! credentials). Collections are walked with the pagers from
//! [`super::pages`], which follow the `Link: rel="next"` chain one page at a
//! time.
//!
//! # URL resolution
//!
//! A relative path is joined to the API base (`https://api.github.com`
//! unless configured otherwise); an absolute URL is used as-is. Query
//! parameters already in the URL win over request parameters, so following
//! a `next` link never rewrites its `page` or `per_page`.
//!
//! # Example
//!
//! ```no_run
//! use git_utils::auth::Credentials;
//! use git_utils::forge::GitHubClient;
//!
//! # async fn demo() -> Result<(), git_utils::forge::ForgeError> {
//! let client = GitHubClient::new(Credentials::anonymous());
//! let mut branches = client.list_branches("rust-lang", "cargo", None);
//! while let Some(branch) = branches.next_item().await? {
//!     println!("{}", branch["name"]);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::vec::IntoIter;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::error::ForgeError;
use super::pages::{Items, Page, Pages};
use crate::auth::Credentials;
use crate::core::types::CommitId;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Page size requested by the pagination entry points.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// REST API version pinned on every request.
const API_VERSION: &str = "2022-11-28";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("git-utils/", env!("CARGO_PKG_VERSION"));

/// Query parameters and optional JSON body of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters in insertion order
    pub params: Vec<(String, String)>,
    /// JSON request body
    pub body: Option<Value>,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter when `value` is present.
    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether a parameter with this key was set.
    pub fn has_param(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    fn with_default(self, key: &str, value: impl ToString) -> Self {
        if self.has_param(key) {
            self
        } else {
            self.param(key, value)
        }
    }
}

/// Whose repositories [`GitHubClient::list_repos`] lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOwner {
    /// The authenticated caller (`/user/repos`)
    Authenticated,
    /// A user (`/users/{name}/repos`)
    User(String),
    /// An organization (`/orgs/{name}/repos`)
    Org(String),
}

impl RepoOwner {
    fn path(&self) -> String {
        match self {
            RepoOwner::Authenticated => "/user/repos".to_string(),
            RepoOwner::User(name) => format!("/users/{}/repos", name),
            RepoOwner::Org(name) => format!("/orgs/{}/repos", name),
        }
    }
}

/// Filters for repository listings. `None` omits the parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoFilters {
    pub repo_type: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub visibility: Option<String>,
    pub affiliation: Option<String>,
}

/// Filters for commit listings. `None` omits the parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitFilters {
    /// Branch name or sha to start listing from
    pub sha: Option<String>,
    /// Only commits touching this path
    pub path: Option<String>,
    /// GitHub login or email address
    pub author: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// GitHub REST client.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client for making requests
    client: Client,
    credentials: Credentials,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
    per_page: u32,
}

// Custom Debug to avoid exposing credentials
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("credentials", &self.credentials.describe())
            .field("api_base", &self.api_base)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl GitHubClient {
    /// Client for `https://api.github.com`.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Client for a custom API base, e.g. `https://github.example.com/api/v3`.
    pub fn with_api_base(credentials: Credentials, api_base: impl Into<String>) -> Self {
        debug!(credentials = %credentials.describe(), "creating GitHub client");
        Self {
            client: Client::new(),
            credentials,
            api_base: api_base.into(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Override the page size used when none is given.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// The API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(API_VERSION),
        );
        headers
    }

    /// Resolve `path_or_url` against the API base and merge in `params`.
    ///
    /// Keys already present in the URL's query keep their value; other
    /// parameters are appended in order.
    pub fn resolve_url(
        &self,
        path_or_url: &str,
        params: &[(String, String)],
    ) -> Result<Url, ForgeError> {
        let invalid = |message: String| ForgeError::InvalidUrl {
            url: path_or_url.to_string(),
            message,
        };

        let mut url = match Url::parse(path_or_url) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let joined = format!(
                    "{}/{}",
                    self.api_base.trim_end_matches('/'),
                    path_or_url.trim_start_matches('/')
                );
                Url::parse(&joined).map_err(|e| invalid(e.to_string()))?
            }
            Err(e) => return Err(invalid(e.to_string())),
        };

        let present: HashSet<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        let missing: Vec<_> = params
            .iter()
            .filter(|(key, _)| !present.contains(key))
            .collect();
        if !missing.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in missing {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Perform one request.
    ///
    /// # Errors
    ///
    /// - [`ForgeError::Http`] for a non-2xx status
    /// - [`ForgeError::Network`] if the request could not be sent
    /// - [`ForgeError::Decode`] if a non-empty body is not JSON
    pub async fn request(
        &self,
        path_or_url: &str,
        method: Method,
        options: &RequestOptions,
    ) -> Result<Page, ForgeError> {
        let url = self.resolve_url(path_or_url, &options.params)?;
        debug!(%method, %url, "requesting URL");

        let mut builder = self
            .client
            .request(method, url.clone())
            .headers(self.headers());
        builder = match &self.credentials {
            Credentials::Basic { user, password } => builder.basic_auth(user, Some(password)),
            Credentials::Bearer(token) => builder.bearer_auth(token),
            Credentials::Anonymous => builder,
        };
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ForgeError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        debug!(status = status.as_u16(), ?headers, "response headers");

        let text = response
            .text()
            .await
            .map_err(|e| ForgeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ForgeError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ForgeError::Decode(e.to_string()))?
        };

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            headers,
            body,
        })
    }

    /// `GET` a single resource.
    pub async fn get(&self, path_or_url: &str) -> Result<Page, ForgeError> {
        self.request(path_or_url, Method::GET, &RequestOptions::default())
            .await
    }

    /// Pager over `path`, with `per_page` defaulted.
    pub fn pages(&self, path: &str, options: RequestOptions) -> Pages<'_> {
        let options = options.with_default("per_page", self.per_page);
        Pages::new(self, path.to_string(), options)
    }

    /// Elements of every page of `path`; each body must be a JSON array.
    pub fn items(&self, path: &str, options: RequestOptions) -> Items<'_> {
        Items::new(self.pages(path, options))
    }

    /// The first page of `path` and, if there are more, the last one.
    ///
    /// Issues at most two requests; a 409 is not absorbed here.
    pub async fn first_and_last_pages(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<(Page, Option<Page>), ForgeError> {
        let options = options.with_default("per_page", self.per_page);
        let first = self.request(path, Method::GET, &options).await?;

        let links = first.links()?;
        let last = match links.last() {
            Some(last_url) => {
                info!(url = %last_url, "requesting last page");
                Some(self.request(last_url, Method::GET, &options).await?)
            }
            None => None,
        };
        Ok((first, last))
    }

    /// Repositories of a user, an organization, or the caller.
    pub fn list_repos(&self, owner: &RepoOwner, filters: &RepoFilters) -> Items<'_> {
        let options = RequestOptions::new()
            .param_opt("type", filters.repo_type.as_deref())
            .param_opt("sort", filters.sort.as_deref())
            .param_opt("direction", filters.direction.as_deref())
            .param_opt("visibility", filters.visibility.as_deref())
            .param_opt("affiliation", filters.affiliation.as_deref());
        self.items(&owner.path(), options)
    }

    /// Commits of a repository, newest first.
    pub fn list_commits(&self, owner: &str, repo: &str, filters: &CommitFilters) -> Items<'_> {
        let options = RequestOptions::new()
            .param_opt("sha", filters.sha.as_deref())
            .param_opt("path", filters.path.as_deref())
            .param_opt("author", filters.author.as_deref())
            .param_opt("since", filters.since.map(timestamp))
            .param_opt("until", filters.until.map(timestamp));
        self.items(&format!("/repos/{}/{}/commits", owner, repo), options)
    }

    /// Branches of a repository, optionally only (un)protected ones.
    pub fn list_branches(&self, owner: &str, repo: &str, protected: Option<bool>) -> Items<'_> {
        let options = RequestOptions::new().param_opt("protected", protected);
        self.items(&format!("/repos/{}/{}/branches", owner, repo), options)
    }

    /// First and last pages of the commit listing.
    pub async fn commits(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<(Page, Option<Page>), ForgeError> {
        self.first_and_last_pages(
            &format!("/repos/{}/{}/commits", owner, repo),
            RequestOptions::new(),
        )
        .await
    }

    /// First and last pages of the watcher listing.
    pub async fn watchers(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<(Page, Option<Page>), ForgeError> {
        self.first_and_last_pages(
            &format!("/repos/{}/{}/subscribers", owner, repo),
            RequestOptions::new(),
        )
        .await
    }

    /// First and last pages of the contents at `path` (the root when empty).
    pub async fn contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<(Page, Option<Page>), ForgeError> {
        self.first_and_last_pages(
            &format!(
                "/repos/{}/{}/contents/{}",
                owner,
                repo,
                path.trim_start_matches('/')
            ),
            RequestOptions::new(),
        )
        .await
    }

    /// Distinct commits across every branch of a repository.
    pub fn all_commits(&self, owner: &str, repo: &str) -> AllCommits<'_> {
        AllCommits {
            client: self,
            owner: owner.to_string(),
            repo: repo.to_string(),
            branches: None,
            current: None,
            seen: HashSet::new(),
        }
    }
}

/// Union of the commit histories of every branch.
///
/// Branches are walked in listing order, each from its tip. A branch is
/// abandoned at the first commit already yielded by an earlier branch: its
/// older history is assumed to be shared. Merge commits break that
/// assumption (the side of a merge reached first can hide unseen commits on
/// the other side), so the result may miss commits in merge-heavy histories.
pub struct AllCommits<'a> {
    client: &'a GitHubClient,
    owner: String,
    repo: String,
    branches: Option<IntoIter<String>>,
    current: Option<Items<'a>>,
    seen: HashSet<CommitId>,
}

impl<'a> AllCommits<'a> {
    /// The next unseen commit, or `None` when every branch is done.
    pub async fn next_commit(&mut self) -> Result<Option<CommitId>, ForgeError> {
        loop {
            if let Some(items) = self.current.as_mut() {
                match items.next_item().await? {
                    Some(item) => {
                        let sha = commit_sha(&item)?;
                        if self.seen.insert(sha.clone()) {
                            return Ok(Some(sha));
                        }
                        debug!(%sha, "reached a seen commit, leaving branch");
                        self.current = None;
                    }
                    None => self.current = None,
                }
                continue;
            }

            if self.branches.is_none() {
                let names = self
                    .client
                    .list_branches(&self.owner, &self.repo, None)
                    .collect()
                    .await?
                    .iter()
                    .map(branch_name)
                    .collect::<Result<Vec<_>, _>>()?;
                debug!(branches = names.len(), "listing commits per branch");
                self.branches = Some(names.into_iter());
            }

            let Some(branch) = self.branches.as_mut().and_then(Iterator::next) else {
                return Ok(None);
            };
            let filters = CommitFilters {
                sha: Some(branch),
                ..CommitFilters::default()
            };
            self.current = Some(self.client.list_commits(&self.owner, &self.repo, &filters));
        }
    }

    /// Fetch every remaining commit.
    pub async fn collect(mut self) -> Result<Vec<CommitId>, ForgeError> {
        let mut commits = Vec::new();
        while let Some(commit) = self.next_commit().await? {
            commits.push(commit);
        }
        Ok(commits)
    }
}

fn string_field(item: &Value, key: &str) -> Result<String, ForgeError> {
    item.get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| ForgeError::UnexpectedBody(format!("item without a '{}' string", key)))
}

fn branch_name(item: &Value) -> Result<String, ForgeError> {
    string_field(item, "name")
}

fn commit_sha(item: &Value) -> Result<CommitId, ForgeError> {
    let sha = string_field(item, "sha")?;
    CommitId::new(sha).map_err(|e| ForgeError::UnexpectedBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> GitHubClient {
        GitHubClient::new(Credentials::anonymous())
    }

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn relative_path_joins_base() {
        let url = client().resolve_url("/repos/a/b/commits", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/a/b/commits");

        let url = client().resolve_url("repos/a/b", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/a/b");
    }

    #[test]
    fn custom_base_keeps_its_path() {
        let client =
            GitHubClient::with_api_base(Credentials::anonymous(), "https://ghe.example.com/api/v3/");
        let url = client.resolve_url("/user/repos", &[]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/user/repos");
    }

    #[test]
    fn absolute_url_is_kept() {
        let url = client()
            .resolve_url("https://other.example.com/x?page=3", &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://other.example.com/x?page=3");
    }

    #[test]
    fn url_query_wins_over_params() {
        let params = vec![
            ("per_page".to_string(), "100".to_string()),
            ("sha".to_string(), "main".to_string()),
        ];
        let url = client()
            .resolve_url("https://api.github.com/x?per_page=2&page=4", &params)
            .unwrap();
        assert_eq!(
            query(&url),
            vec![
                ("per_page".to_string(), "2".to_string()),
                ("page".to_string(), "4".to_string()),
                ("sha".to_string(), "main".to_string()),
            ]
        );
    }

    #[test]
    fn params_are_encoded() {
        let params = vec![("path".to_string(), "src/a b.rs".to_string())];
        let url = client().resolve_url("/x", &params).unwrap();
        assert_eq!(url.query(), Some("path=src%2Fa+b.rs"));
    }

    #[test]
    fn garbage_url_is_rejected() {
        let err = client().resolve_url("http://[::1", &[]).unwrap_err();
        assert!(matches!(err, ForgeError::InvalidUrl { .. }));
    }

    #[test]
    fn options_default_does_not_override() {
        let options = RequestOptions::new()
            .param("per_page", 5)
            .with_default("per_page", 100);
        assert_eq!(options.params, vec![("per_page".into(), "5".into())]);
    }

    #[test]
    fn param_opt_skips_none() {
        let options = RequestOptions::new()
            .param_opt("a", Some("x"))
            .param_opt("b", None::<&str>)
            .param_opt("protected", Some(true));
        assert_eq!(
            options.params,
            vec![
                ("a".into(), "x".into()),
                ("protected".into(), "true".into())
            ]
        );
    }

    #[test]
    fn repo_owner_paths() {
        assert_eq!(RepoOwner::Authenticated.path(), "/user/repos");
        assert_eq!(RepoOwner::User("octocat".into()).path(), "/users/octocat/repos");
        assert_eq!(RepoOwner::Org("rust-lang".into()).path(), "/orgs/rust-lang/repos");
    }

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(timestamp(time), "2024-01-02T03:04:05Z");
    }

    #[test]
    fn debug_redacts_credentials() {
        let client = GitHubClient::new(Credentials::bearer("ghp_supersecretvalue1234"));
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ghp_supersecret"));
        assert!(debug.contains("api.github.com"));
    }

    #[test]
    fn commit_sha_requires_valid_id() {
        let item = serde_json::json!({"sha": "0123456789abcdef0123456789abcdef01234567"});
        assert!(commit_sha(&item).is_ok());
        assert!(commit_sha(&serde_json::json!({"sha": "xyz"})).is_err());
        assert!(commit_sha(&serde_json::json!({})).is_err());
    }
}
