// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::FeedConfig;

/// Query parameter used to defeat HTTP/CDN caches.
pub const CACHE_BUST_PARAM: &str = "t";

/// Create a configured asynchronous HTTP client.
///
/// No timeout is set unless the feed config asks for one.
pub fn create_async_client(config: &FeedConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Copy of `base` with the cache-busting parameter set to `stamp`.
///
/// Existing query parameters are kept; a previous stamp is replaced.
pub fn cache_busted(base: &Url, stamp: i64) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != CACHE_BUST_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(CACHE_BUST_PARAM, &stamp.to_string());
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_busted_appends_stamp() {
        let base = Url::parse("https://example.com/posts.md").unwrap();
        assert_eq!(
            cache_busted(&base, 42).as_str(),
            "https://example.com/posts.md?t=42"
        );
    }

    #[test]
    fn test_cache_busted_keeps_other_params_and_replaces_stamp() {
        let base = Url::parse("https://example.com/posts.md?ref=main&t=1").unwrap();
        assert_eq!(
            cache_busted(&base, 7).as_str(),
            "https://example.com/posts.md?ref=main&t=7"
        );
    }

    #[test]
    fn test_client_without_timeout_builds() {
        assert!(create_async_client(&FeedConfig::default()).is_ok());
    }
}
