//! Key/value persistence for the admin desk.
//!
//! The admin desk keeps its working copy of the posts and the selected
//! language under fixed keys:
//!
//! ```text
//! {storage_dir}/
//! ├── blog_posts.json       # JSON array of posts
//! └── blog_language.json    # Selected language code
//! ```
//!
//! Values are read once at start-up and written on every change.

pub mod local;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};
use crate::models::Post;

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Key holding the JSON array of posts.
pub const POSTS_KEY: &str = "blog_posts";

/// Key holding the selected language code.
pub const LANGUAGE_KEY: &str = "blog_language";

/// Trait for string key/value backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Keys become file names, so only a safe alphabet is allowed.
pub fn validate_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(AppError::validation(format!("invalid storage key '{key}'")))
    }
}

/// Typed access to the admin desk's persisted state.
#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PostRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string_pretty(value)?;
        self.store.set(key, &raw).await
    }

    /// Persisted posts, `None` if nothing was saved yet.
    pub async fn load_posts(&self) -> Result<Option<Vec<Post>>> {
        self.read_json(POSTS_KEY).await
    }

    pub async fn save_posts(&self, posts: &[Post]) -> Result<()> {
        self.write_json(POSTS_KEY, posts).await?;
        log::debug!("Persisted {} posts", posts.len());
        Ok(())
    }

    pub async fn load_language(&self) -> Result<Option<String>> {
        self.read_json(LANGUAGE_KEY).await
    }

    pub async fn save_language(&self, language: &str) -> Result<()> {
        self.write_json(LANGUAGE_KEY, language).await
    }
}
