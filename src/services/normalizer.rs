// src/services/normalizer.rs

//! Maps loosely-typed payload entries onto canonical [`Post`] records.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::{Field, ListingConfig, Post, Translation};

/// Defaults applied while normalizing.
#[derive(Debug, Clone)]
pub struct Normalizer {
    default_author: String,
    default_read_time: u32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&ListingConfig::default())
    }
}

impl Normalizer {
    pub fn new(default_author: impl Into<String>, default_read_time: u32) -> Self {
        Self {
            default_author: default_author.into(),
            default_read_time: default_read_time.max(1),
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(config.default_author.clone(), config.default_read_time)
    }

    /// Normalize a list of raw entries. Total and order-preserving.
    pub fn normalize(&self, raw: &[Value]) -> Vec<Post> {
        raw.iter()
            .enumerate()
            .map(|(index, value)| self.normalize_one(index, value))
            .collect()
    }

    /// Normalize one entry; `index` is its position in the payload.
    pub fn normalize_one(&self, index: usize, value: &Value) -> Post {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        let id = scalar_string(obj.get("id"))
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("post-{index}"));

        let author = text(obj, &["author"]).unwrap_or_else(|| self.default_author.clone());
        let publication_date = text(obj, &["publicationDate", "date"]).unwrap_or_default();
        let read_time_minutes = ["readTimeMinutes", "readTime"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(read_minutes))
            .unwrap_or(self.default_read_time);

        let image_url = text(obj, &["imageUrl", "image"]);

        let localized: BTreeMap<String, String> = obj
            .iter()
            .filter(|(key, _)| Field::split_suffixed(key).is_some())
            .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
            .collect();

        Post {
            id,
            author,
            publication_date,
            read_time_minutes,
            title: text(obj, &["title"]).unwrap_or_default(),
            description: text(obj, &["description", "excerpt"]).unwrap_or_default(),
            content: text(obj, &["content"]).unwrap_or_default(),
            image_url,
            translations: translations(obj.get("translations")),
            localized,
        }
    }
}

/// Normalize with the built-in defaults.
pub fn normalize(raw: &[Value]) -> Vec<Post> {
    Normalizer::default().normalize(raw)
}

/// First non-blank string value among `keys`.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| {
            obj.get(*key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
        })
        .map(str::to_string)
}

/// Strings and numbers both make acceptable ids.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Positive minutes from a number or a string such as `"7 min read"`.
fn read_minutes(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f.ceil() as u64))?,
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().ok()?
        }
        _ => return None,
    };
    u32::try_from(minutes).ok().filter(|m| *m >= 1)
}

fn translations(value: Option<&Value>) -> BTreeMap<String, Translation> {
    let Some(Value::Object(map)) = value else {
        return BTreeMap::new();
    };
    map.iter()
        .filter_map(|(language, entry)| {
            let entry = entry.as_object()?;
            Some((
                language.clone(),
                Translation {
                    title: text(entry, &["title"]).unwrap_or_default(),
                    excerpt: text(entry, &["excerpt", "description"]).unwrap_or_default(),
                    content: text(entry, &["content"]).unwrap_or_default(),
                },
            ))
        })
        .collect()
}
