//! Subreddit listing source.
//!
//! Fetches `https://www.reddit.com/r/<name>.json` with a blocking
//! [`reqwest`] client and reduces the listing to post URLs.

use std::error::Error as _;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::StatusCode;

use super::{FeedSource, Listing};
use crate::error::FetchError;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Total time allowed for one listing request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Redirects followed before the request fails.
const MAX_REDIRECTS: usize = 3;

/// Client identification required by the Reddit API rules.
pub const USER_AGENT: &str = concat!(
    "unix:",
    env!("CARGO_PKG_NAME"),
    ":v",
    env!("CARGO_PKG_VERSION"),
    " (by /u/sredd)"
);

const COMMENTS_MARKER: &str = "/comments/";

/// Raised from the redirect policy; recovered from the error chain in
/// [`classify`].
#[derive(Debug, thiserror::Error)]
#[error("{0} consecutive redirects")]
struct TooManyRedirects(usize);

/// Subreddit source over the public JSON endpoint.
pub struct RedditSource {
    client: Client,
    base_url: String,
    filter_comments: bool,
}

impl RedditSource {
    /// Create a source against `www.reddit.com`.
    pub fn new(filter_comments: bool) -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL, filter_comments)
    }

    /// Create a source against another host, e.g. a local test server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        filter_comments: bool,
    ) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, filter_comments, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(
        base_url: impl Into<String>,
        filter_comments: bool,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        // The User-Agent is a client default header, so it is re-sent on
        // every redirect hop.
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect_policy())
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            filter_comments,
        })
    }

    fn endpoint(&self, feed: &str) -> String {
        format!("{}/r/{}.json", self.base_url, feed)
    }
}

impl FeedSource for RedditSource {
    fn fetch(&self, feed: &str) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint(feed);
        tracing::debug!(%url, "fetching listing");

        let response = self.client.get(&url).send().map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.to_string()));
        }

        let body = response.bytes().map_err(classify)?;
        let listing = Listing::from_slice(&body)?;
        let urls = filter_urls(listing.into_urls(), self.filter_comments);

        tracing::debug!(feed, items = urls.len(), "listing fetched");
        Ok(urls)
    }
}

/// Apply the per-item rules to raw listing URLs, keeping their order.
///
/// With `filter_comments`, discussion-thread links are dropped.  Anything
/// not starting with `http://` or `https://` is dropped.  Surviving URLs
/// have `&amp;` unescaped.  Duplicates are kept.
pub fn filter_urls(urls: impl IntoIterator<Item = String>, filter_comments: bool) -> Vec<String> {
    urls.into_iter()
        .filter(|url| !(filter_comments && url.contains(COMMENTS_MARKER)))
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
        .map(|url| url.replace("&amp;", "&"))
        .collect()
}

fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        // `previous` includes the original request.
        let hops = attempt.previous().len();
        if hops > MAX_REDIRECTS {
            attempt.error(TooManyRedirects(hops))
        } else {
            attempt.follow()
        }
    })
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    if err.is_redirect() {
        let mut source = err.source();
        while let Some(cause) = source {
            if let Some(TooManyRedirects(hops)) = cause.downcast_ref::<TooManyRedirects>() {
                return FetchError::Redirects(*hops);
            }
            source = cause.source();
        }
    }
    FetchError::Request(err)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
