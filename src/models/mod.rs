// src/models/mod.rs

//! Domain models for the blog front end.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod listing;
mod post;

// Re-export all public types
pub use config::{
    AdminConfig, AiConfig, Config, FeedConfig, ListingConfig, LocaleConfig, LoggingConfig,
    Messages,
};
pub use listing::{MatchedField, Page, SearchMatch, SortOrder};
pub use post::{Field, Post, PostDraft, Translation, fallback_image, id_hash};
