//! Remote quote source contract and HTTP implementation.
//!
//! The mock server exposes generic posts; only the `title` field matters
//! here. The first [`REMOTE_CANDIDATE_LIMIT`] entries become merge
//! candidates under the fixed `"Server"` category.

use crate::model::quote::Quote;
use crate::sync::SyncError;
use serde::Deserialize;
use std::time::Duration;

/// Default collection endpoint (mock remote API).
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";
/// How many remote entries become merge candidates per round.
pub const REMOTE_CANDIDATE_LIMIT: usize = 5;
/// Category assigned to every remotely sourced quote.
pub const REMOTE_CATEGORY: &str = "Server";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplier of candidate quotes for one merge round.
///
/// The seam for test doubles: tests hand the sync path a mock source the
/// same way production hands it an [`HttpQuoteSource`].
pub trait RemoteQuoteSource {
    fn fetch_quotes(&self) -> Result<Vec<Quote>, SyncError>;
}

#[derive(Debug, Deserialize)]
struct RemotePost {
    title: String,
}

/// Blocking HTTP source against a fixed collection endpoint.
pub struct HttpQuoteSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpQuoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            client,
            url: url.into(),
        }
    }
}

impl Default for HttpQuoteSource {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_URL)
    }
}

impl RemoteQuoteSource for HttpQuoteSource {
    fn fetch_quotes(&self) -> Result<Vec<Quote>, SyncError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(SyncError::Http)?
            .text()
            .map_err(SyncError::Http)?;

        // Entries without a string `title` fail the whole round rather
        // than producing quotes with manufactured empty text.
        let posts: Vec<RemotePost> =
            serde_json::from_str(&body).map_err(|err| SyncError::Decode(err.to_string()))?;

        Ok(posts
            .into_iter()
            .take(REMOTE_CANDIDATE_LIMIT)
            .map(|post| Quote {
                text: post.title,
                category: REMOTE_CATEGORY.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{RemotePost, REMOTE_CANDIDATE_LIMIT, REMOTE_CATEGORY};

    #[test]
    fn remote_post_decodes_from_mock_server_shape() {
        let posts: Vec<RemotePost> = serde_json::from_str(
            r#"[{"userId":1,"id":1,"title":"first","body":"ignored"},
                {"userId":1,"id":2,"title":"second","body":"ignored"}]"#,
        )
        .unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "first");
    }

    #[test]
    fn remote_post_without_title_is_a_decode_failure() {
        let result = serde_json::from_str::<Vec<RemotePost>>(r#"[{"id":1,"body":"no title"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn candidate_limit_and_category_are_fixed() {
        assert_eq!(REMOTE_CANDIDATE_LIMIT, 5);
        assert_eq!(REMOTE_CATEGORY, "Server");
    }
}
