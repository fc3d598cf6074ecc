//! Pipeline entry points tying the services together.
//!
//! - `listing`: reader state and view models for listings and articles
//! - `poller`: scheduled background refresh of the feed
//! - `admin`: login, local post management and AI-assisted authoring

pub mod admin;
pub mod listing;
pub mod poller;

pub use admin::{AdminCredentials, AdminDesk, AdminSession, NewPost, TranslationReport};
pub use listing::{ArticleView, BlogController, Card, Listing, ListingState};
pub use poller::{Poller, PollerHandle, Refresh};
