//! Response schema of the `/r/<name>.json` endpoint.
//!
//! Only the path down to each post's `url` is modelled.  Everything else in
//! the (large) listing is ignored, but the path itself is required: a body
//! without `data.children` fails to decode instead of looking like an empty
//! feed.

use serde::Deserialize;

/// Top-level listing object.
#[derive(Debug, Deserialize)]
pub struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    #[serde(default)]
    data: Option<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    // Missing or null on some post kinds; such items decode as "" and fail
    // the prefix check later.
    #[serde(default)]
    url: Option<String>,
}

impl Listing {
    /// Decode a listing from a raw response body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Item URLs in listing order, unfiltered.
    pub fn into_urls(self) -> impl Iterator<Item = String> {
        self.data
            .children
            .into_iter()
            .map(|child| child.data.and_then(|post| post.url).unwrap_or_default())
    }
}
