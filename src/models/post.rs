//! Post data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A blog article in canonical form.
///
/// Language-suffixed variants of the text fields (`title_fr`,
/// `content_es`, ...) live in `localized`, keyed by their full field name,
/// and are flattened back into the record when serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable, non-empty identifier
    pub id: String,

    /// Author display name
    pub author: String,

    /// Publication date as supplied by the source
    pub publication_date: String,

    /// Estimated reading time, always >= 1
    pub read_time_minutes: u32,

    /// Base (language-neutral) title
    pub title: String,

    /// Base short description shown on cards
    pub description: String,

    /// Base Markdown body
    pub content: String,

    /// Cover image, `None` when the source left it blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Admin-managed per-language overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, Translation>,

    /// Language-suffixed field values (`<field>_<language>`)
    #[serde(flatten)]
    pub localized: BTreeMap<String, String>,
}

/// Per-language override of a post's display text.
///
/// Also the shape exchanged with the translation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
}

/// A draft produced from a topic by the writing assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// A localizable display field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Content,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Description, Field::Content];

    /// Base field name as it appears in the payload.
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Content => "content",
        }
    }

    /// Field name carrying the variant for `language`.
    pub fn suffixed(self, language: &str) -> String {
        format!("{}_{}", self.key(), language)
    }

    /// Parse a `<field>_<language>` key into its field and language code.
    pub fn split_suffixed(key: &str) -> Option<(Field, &str)> {
        let (base, language) = key.split_once('_')?;
        let field = Self::ALL.into_iter().find(|f| f.key() == base)?;
        let valid = !language.is_empty()
            && language.len() <= 8
            && language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then_some((field, language))
    }

    /// The matching value inside a translation override.
    pub fn from_translation(self, translation: &Translation) -> &str {
        match self {
            Field::Title => &translation.title,
            Field::Description => &translation.excerpt,
            Field::Content => &translation.content,
        }
    }
}

impl Post {
    /// Base value for a field.
    pub fn base(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Content => &self.content,
        }
    }

    /// Language-suffixed value for a field, if the source supplied one.
    pub fn suffixed(&self, field: Field, language: &str) -> Option<&str> {
        self.localized
            .get(&field.suffixed(language))
            .map(String::as_str)
    }

    /// The cover image, falling back to a deterministic placeholder.
    pub fn display_image<'a>(&'a self, fallbacks: &'a [String]) -> Option<&'a str> {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Some(url),
            _ => fallback_image(&self.id, fallbacks),
        }
    }
}

/// 32-bit signed rolling hash over the UTF-16 code units of `id`.
pub fn id_hash(id: &str) -> i32 {
    id.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Pick a placeholder image for a post id; stable for a given id.
pub fn fallback_image<'a>(id: &str, images: &'a [String]) -> Option<&'a str> {
    if images.is_empty() {
        return None;
    }
    let index = id_hash(id).unsigned_abs() as usize % images.len();
    images.get(index).map(String::as_str)
}
