//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Content source and refresh settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Listing, pagination and card defaults
    #[serde(default)]
    pub listing: ListingConfig,

    /// Languages and UI strings
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Admin desk credentials and persistence
    #[serde(default)]
    pub admin: AdminConfig,

    /// Writing assistant settings
    #[serde(default)]
    pub ai: AiConfig,

    /// Log verbosity
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.source_url.trim().is_empty() {
            return Err(AppError::validation("feed.source_url is empty"));
        }
        url::Url::parse(&self.feed.source_url)?;
        if self.feed.poll_interval_secs == 0 {
            return Err(AppError::validation("feed.poll_interval_secs must be > 0"));
        }
        if self.feed.timeout_secs == Some(0) {
            return Err(AppError::validation("feed.timeout_secs must be > 0 when set"));
        }
        if self.listing.page_size == 0 {
            return Err(AppError::validation("listing.page_size must be > 0"));
        }
        if self.listing.default_read_time == 0 {
            return Err(AppError::validation(
                "listing.default_read_time must be > 0",
            ));
        }
        if self.listing.fallback_images.is_empty() {
            return Err(AppError::validation("No fallback images defined"));
        }
        if self.locale.languages.is_empty() {
            return Err(AppError::validation("No languages defined"));
        }
        if !self.locale.supports(&self.locale.default_language) {
            return Err(AppError::validation(format!(
                "locale.default_language '{}' is not in locale.languages",
                self.locale.default_language
            )));
        }
        if self.admin.username.trim().is_empty() || self.admin.password.is_empty() {
            return Err(AppError::validation("admin credentials are empty"));
        }
        Ok(())
    }
}

/// Content source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// URL of the Markdown file embedding the posts payload
    #[serde(default = "defaults::source_url")]
    pub source_url: String,

    /// Seconds between background refreshes
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset leaves it to the transport
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source_url: defaults::source_url(),
            poll_interval_secs: defaults::poll_interval(),
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// Listing and card settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Posts per page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Author used when the source omits one
    #[serde(default = "defaults::default_author")]
    pub default_author: String,

    /// Reading time used when the source omits one
    #[serde(default = "defaults::default_read_time")]
    pub default_read_time: u32,

    /// Ordered placeholder images for posts without a cover
    #[serde(default = "defaults::fallback_images")]
    pub fallback_images: Vec<String>,

    /// Public base URL used to build share links
    #[serde(default = "defaults::site_url")]
    pub site_url: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            default_author: defaults::default_author(),
            default_read_time: defaults::default_read_time(),
            fallback_images: defaults::fallback_images(),
            site_url: defaults::site_url(),
        }
    }
}

/// Language selection and UI string tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "defaults::default_language")]
    pub default_language: String,

    /// Languages offered to readers and targeted by translation
    #[serde(default = "defaults::languages")]
    pub languages: Vec<String>,

    /// UI strings keyed by language code
    #[serde(default)]
    pub messages: BTreeMap<String, Messages>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_language: defaults::default_language(),
            languages: defaults::languages(),
            messages: BTreeMap::new(),
        }
    }
}

impl LocaleConfig {
    pub fn supports(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    /// UI strings for a language, falling back to the default language and
    /// then to the built-in English table.
    pub fn messages_for(&self, language: &str) -> Messages {
        self.messages
            .get(language)
            .or_else(|| self.messages.get(&self.default_language))
            .cloned()
            .unwrap_or_default()
    }
}

/// UI strings.
///
/// Supported placeholders: `{count}` in `search_results`, `{minutes}` in
/// `min_read`, `{page}`/`{total}` in `page_of`, `{time}` in `last_updated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "defaults::msg_no_results")]
    pub no_results: String,
    #[serde(default = "defaults::msg_link_copied")]
    pub link_copied: String,
    #[serde(default = "defaults::msg_read_more")]
    pub read_more: String,
    #[serde(default = "defaults::msg_min_read")]
    pub min_read: String,
    #[serde(default = "defaults::msg_last_updated")]
    pub last_updated: String,
    #[serde(default = "defaults::msg_page_of")]
    pub page_of: String,
    #[serde(default = "defaults::msg_search_results")]
    pub search_results: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_results: defaults::msg_no_results(),
            link_copied: defaults::msg_link_copied(),
            read_more: defaults::msg_read_more(),
            min_read: defaults::msg_min_read(),
            last_updated: defaults::msg_last_updated(),
            page_of: defaults::msg_page_of(),
            search_results: defaults::msg_search_results(),
        }
    }
}

/// Admin desk settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "defaults::admin_username")]
    pub username: String,

    #[serde(default = "defaults::admin_password")]
    pub password: String,

    /// Directory backing the admin key/value store
    #[serde(default = "defaults::storage_dir")]
    pub storage_dir: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: defaults::admin_username(),
            password: defaults::admin_password(),
            storage_dir: defaults::storage_dir(),
        }
    }
}

/// Writing assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Base URL of the generative language API
    #[serde(default = "defaults::ai_endpoint")]
    pub endpoint: String,

    #[serde(default = "defaults::ai_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "defaults::ai_api_key_env")]
    pub api_key_env: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::ai_endpoint(),
            model: defaults::ai_model(),
            api_key_env: defaults::ai_api_key_env(),
        }
    }
}

impl AiConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::config(format!("{} is not set", self.api_key_env)))
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Feed defaults
    pub fn source_url() -> String {
        "https://raw.githubusercontent.com/blogfront/content/main/posts.md".into()
    }
    pub fn poll_interval() -> u64 {
        15
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; blogfront/0.1)".into()
    }

    // Listing defaults
    pub fn page_size() -> usize {
        6
    }
    pub fn default_author() -> String {
        "Admin".into()
    }
    pub fn default_read_time() -> u32 {
        5
    }
    pub fn fallback_images() -> Vec<String> {
        vec![
            "https://images.unsplash.com/photo-1499750310107-5fef28a66643?w=800".into(),
            "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?w=800".into(),
            "https://images.unsplash.com/photo-1455390582262-044cdead277a?w=800".into(),
            "https://images.unsplash.com/photo-1432821596592-e2c18b78144f?w=800".into(),
        ]
    }
    pub fn site_url() -> String {
        "https://blog.example.com".into()
    }

    // Locale defaults
    pub fn default_language() -> String {
        "en".into()
    }
    pub fn languages() -> Vec<String> {
        vec!["en".into(), "fr".into(), "es".into(), "de".into()]
    }

    // Message defaults
    pub fn msg_no_results() -> String {
        "No posts found.".into()
    }
    pub fn msg_link_copied() -> String {
        "Link copied to clipboard!".into()
    }
    pub fn msg_read_more() -> String {
        "Read more".into()
    }
    pub fn msg_min_read() -> String {
        "{minutes} min read".into()
    }
    pub fn msg_last_updated() -> String {
        "Last updated: {time}".into()
    }
    pub fn msg_page_of() -> String {
        "Page {page} of {total}".into()
    }
    pub fn msg_search_results() -> String {
        "{count} result(s)".into()
    }

    // Admin defaults
    pub fn admin_username() -> String {
        "admin".into()
    }
    pub fn admin_password() -> String {
        "admin123".into()
    }
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }

    // Assistant defaults
    pub fn ai_endpoint() -> String {
        "https://generativelanguage.googleapis.com/v1beta".into()
    }
    pub fn ai_model() -> String {
        "gemini-2.5-flash".into()
    }
    pub fn ai_api_key_env() -> String {
        "GEMINI_API_KEY".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
