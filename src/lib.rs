// src/lib.rs

//! blogfront library
//!
//! Fetches a posts payload embedded in a remote Markdown file, normalizes
//! and localizes it, and serves searchable, paginated listings. An admin
//! desk manages a local copy of the posts with help from a writing
//! assistant.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
