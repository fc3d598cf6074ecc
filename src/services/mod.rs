//! Service layer for the blog front end.
//!
//! This module contains the business logic for:
//! - Content fetching (`ContentFetcher`) and payload extraction
//! - Post normalization (`Normalizer`)
//! - Localization, search, sorting and pagination
//! - The writing assistant (`PostAssistant`)
//! - Share actions

pub mod assistant;
pub mod fetcher;
pub mod localize;
pub mod normalizer;
pub mod paginate;
pub mod payload;
pub mod search;
pub mod share;

pub use assistant::{GeminiAssistant, PostAssistant};
pub use fetcher::{ContentFetcher, Feed, FeedSnapshot, FetchOutcome};
pub use localize::{LocalizedPost, resolve_field};
pub use normalizer::{Normalizer, normalize};
pub use paginate::sort_and_page;
pub use payload::parse_embedded_payload;
pub use search::{search, working_set};
pub use share::{ShareOutcome, share_post, share_url};
