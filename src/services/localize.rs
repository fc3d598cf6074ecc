// src/services/localize.rs

//! Resolves the display text of a post for a language.

use crate::models::{Field, Post};

/// Resolve a display field for `language`.
///
/// Resolution order: the `<field>_<language>` variant, the admin-managed
/// translation override, the base field, and finally the empty string.
/// Blank values fall through to the next step.
pub fn resolve_field(post: &Post, field: Field, language: &str) -> String {
    resolve_str(post, field, language).to_string()
}

/// Borrowing variant of [`resolve_field`].
pub fn resolve_str<'a>(post: &'a Post, field: Field, language: &str) -> &'a str {
    let suffixed = post.suffixed(field, language);
    let translated = post
        .translations
        .get(language)
        .map(|translation| field.from_translation(translation));

    [suffixed, translated]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| post.base(field))
}

/// A post with every display field resolved for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedPost<'a> {
    pub post: &'a Post,
    pub title: &'a str,
    pub description: &'a str,
    pub content: &'a str,
}

impl<'a> LocalizedPost<'a> {
    pub fn new(post: &'a Post, language: &str) -> Self {
        Self {
            post,
            title: resolve_str(post, Field::Title, language),
            description: resolve_str(post, Field::Description, language),
            content: resolve_str(post, Field::Content, language),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::Translation;

    fn post() -> Post {
        let mut localized = BTreeMap::new();
        localized.insert("title_en".to_string(), "English".to_string());
        localized.insert("title_es".to_string(), "  ".to_string());

        let mut translations = BTreeMap::new();
        translations.insert(
            "es".to_string(),
            Translation {
                title: "Título".into(),
                excerpt: "Resumen".into(),
                content: String::new(),
            },
        );
        translations.insert(
            "en".to_string(),
            Translation {
                title: "Translated".into(),
                ..Translation::default()
            },
        );

        Post {
            id: "p".into(),
            author: "Admin".into(),
            publication_date: "2024-01-01".into(),
            read_time_minutes: 5,
            title: "Base".into(),
            description: "Base description".into(),
            content: "Base content".into(),
            image_url: None,
            translations,
            localized,
        }
    }

    #[test]
    fn test_suffixed_field_wins() {
        assert_eq!(resolve_field(&post(), Field::Title, "en"), "English");
    }

    #[test]
    fn test_missing_language_uses_base() {
        assert_eq!(resolve_field(&post(), Field::Title, "fr"), "Base");
    }

    #[test]
    fn test_translation_override_and_blank_fallthrough() {
        let post = post();
        // title_es is blank, so the translation applies
        assert_eq!(resolve_field(&post, Field::Title, "es"), "Título");
        assert_eq!(resolve_field(&post, Field::Description, "es"), "Resumen");
        // empty translated content falls back to the base
        assert_eq!(resolve_field(&post, Field::Content, "es"), "Base content");
    }

    #[test]
    fn test_empty_post_resolves_to_empty_string() {
        let mut post = post();
        post.localized.clear();
        post.translations.clear();
        post.title.clear();
        assert_eq!(resolve_field(&post, Field::Title, "en"), "");
    }

    #[test]
    fn test_localized_post_view() {
        let post = post();
        let view = LocalizedPost::new(&post, "es");
        assert_eq!(view.title, "Título");
        assert_eq!(view.description, "Resumen");
        assert_eq!(view.content, "Base content");
    }
}
