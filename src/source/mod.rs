//! Feed source abstraction.
//!
//! A [`FeedSource`] turns a feed name into the ordered list of item URLs the
//! upstream currently lists.  [`RedditSource`] is the only implementation the
//! binary uses; the run loop is written against the trait so tests can swap
//! in canned listings.

mod listing;
mod reddit;
#[cfg(test)]
pub(crate) mod test_server;

pub use listing::Listing;
pub use reddit::RedditSource;

use crate::error::FetchError;

/// Anything that can list the current items of a named feed.
pub trait FeedSource {
    /// Fetch the item URLs for `feed`, in the order the upstream returned
    /// them.  Duplicates are kept.
    fn fetch(&self, feed: &str) -> Result<Vec<String>, FetchError>;
}
