//! forge::pages
//!
//! Pages of a paginated collection and the pagers that walk them.
//!
//! # Design
//!
//! A [`Pages`] pager holds the URL of the next page. Each call to
//! [`Pages::next_page`] issues one request and advances the URL from the
//! response's `next` link, so long chains never grow the stack. Nothing is
//! fetched ahead of the caller.
//!
//! A `409 Conflict` ends the sequence quietly: GitHub answers 409 when
//! listing the commits of an empty repository. Every other error is
//! returned once and ends the sequence.
//!
//! [`Items`] flattens the JSON array bodies of successive pages into one
//! sequence of elements.

use std::vec::IntoIter;

use reqwest::header::{HeaderMap, LINK};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::error::ForgeError;
use super::github::{GitHubClient, RequestOptions};
use super::links::LinkSet;

/// One HTTP response of a paginated (or single) resource.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL the page was fetched from
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body (`Null` when the body is empty)
    pub body: Value,
}

impl Page {
    /// Parse the `Link` header; a missing header is an empty set.
    pub fn links(&self) -> Result<LinkSet, ForgeError> {
        match self.headers.get(LINK) {
            None => Ok(LinkSet::default()),
            Some(value) => {
                let header = value.to_str().map_err(|_| ForgeError::LinkParse {
                    entry: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                })?;
                LinkSet::parse(header)
            }
        }
    }

    /// Consume the page, returning the elements of an array body.
    ///
    /// # Errors
    ///
    /// [`ForgeError::UnexpectedBody`] if the body is not a JSON array.
    pub fn into_items(self) -> Result<Vec<Value>, ForgeError> {
        match self.body {
            Value::Array(items) => Ok(items),
            other => Err(ForgeError::UnexpectedBody(format!(
                "expected a JSON array from {}, got {}",
                self.url,
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Sequential pager over a paginated resource.
///
/// Restart by calling [`GitHubClient::pages`] again with the original path.
pub struct Pages<'a> {
    client: &'a GitHubClient,
    next: Option<String>,
    options: RequestOptions,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(client: &'a GitHubClient, start: String, options: RequestOptions) -> Self {
        Self {
            client,
            next: Some(start),
            options,
        }
    }

    /// Fetch the next page, or `None` when the chain has ended.
    pub async fn next_page(&mut self) -> Result<Option<Page>, ForgeError> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        let page = match self.client.request(&url, Method::GET, &self.options).await {
            Ok(page) => page,
            Err(err) if err.is_conflict() => {
                debug!(%url, "409 Conflict, ending pagination");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        // The last page has no rel="next" link.
        self.next = page.links()?.next().map(String::from);
        Ok(Some(page))
    }

    /// Fetch every remaining page.
    pub async fn collect(mut self) -> Result<Vec<Page>, ForgeError> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await? {
            pages.push(page);
        }
        Ok(pages)
    }
}

/// Element-wise view of a [`Pages`] pager whose bodies are JSON arrays.
pub struct Items<'a> {
    pages: Pages<'a>,
    buffer: IntoIter<Value>,
}

impl<'a> Items<'a> {
    pub(crate) fn new(pages: Pages<'a>) -> Self {
        Self {
            pages,
            buffer: Vec::new().into_iter(),
        }
    }

    /// The next element, fetching the next page when the current one is spent.
    pub async fn next_item(&mut self) -> Result<Option<Value>, ForgeError> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Ok(Some(item));
            }
            let Some(page) = self.pages.next_page().await? else {
                return Ok(None);
            };
            match page.into_items() {
                Ok(items) => self.buffer = items.into_iter(),
                Err(err) => {
                    // A malformed page ends the sequence like any other error.
                    self.pages.next = None;
                    return Err(err);
                }
            }
        }
    }

    /// Fetch every remaining element.
    pub async fn collect(mut self) -> Result<Vec<Value>, ForgeError> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await? {
            items.push(item);
        }
        Ok(items)
    }
}
