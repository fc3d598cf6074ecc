// src/pipeline/listing.rs

//! View controller for the public listing and article pages.
//!
//! `ListingState` owns the reader's selections (query, sort order, page,
//! language); `BlogController` combines them with the shared feed to build
//! render-ready view models.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{
    Config, Field, ListingConfig, LocaleConfig, MatchedField, Messages, Post, SortOrder,
};
use crate::services::localize::{LocalizedPost, resolve_field};
use crate::services::paginate::sort_and_page;
use crate::services::search::search;
use crate::services::share::share_url;
use crate::services::Feed;

/// Reader selections driving the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    query: String,
    order: SortOrder,
    page: usize,
    language: String,
}

impl ListingState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            order: SortOrder::default(),
            page: 1,
            language: language.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether a search is active (non-blank query).
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Change the query; a different query resets to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    /// Change the sort order; a different order resets to page 1.
    pub fn set_order(&mut self, order: SortOrder) {
        if order != self.order {
            self.order = order;
            self.page = 1;
        }
    }

    /// Change the language; a different language resets to page 1.
    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        if language != self.language {
            self.language = language;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

/// A post as shown on a listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub publication_date: String,
    pub read_time_minutes: u32,
    pub image_url: Option<String>,
    /// Set while searching
    pub matched_field: Option<MatchedField>,
    pub snippet: Option<String>,
}

/// One rendered listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub cards: Vec<Card>,
    /// Page actually served, after clamping
    pub page: usize,
    pub total_pages: usize,
    /// Size of the working set
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub searching: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub messages: Messages,
}

impl Listing {
    /// Render "no results" instead of an empty first page.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

/// A fully resolved article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: String,
    pub publication_date: String,
    pub read_time_minutes: u32,
    pub image_url: Option<String>,
    pub share_url: String,
}

/// Build the listing for `state` over `posts`.
pub fn build_listing(
    posts: &[Post],
    state: &ListingState,
    listing: &ListingConfig,
    locale: &LocaleConfig,
    last_updated: Option<DateTime<Utc>>,
) -> Listing {
    let language = state.language();
    let searching = state.is_searching();

    let matches = if searching {
        search(posts, state.query(), language)
    } else {
        Vec::new()
    };
    let working: Vec<&Post> = if searching {
        matches.iter().map(|m| m.post).collect()
    } else {
        posts.iter().collect()
    };

    let page = sort_and_page(working, state.order(), state.page(), listing.page_size);

    let cards = page
        .items
        .iter()
        .map(|post| {
            let hit = matches.iter().find(|m| std::ptr::eq(m.post, *post));
            let view = LocalizedPost::new(post, language);
            Card {
                id: post.id.clone(),
                title: view.title.to_string(),
                description: view.description.to_string(),
                author: post.author.clone(),
                publication_date: post.publication_date.clone(),
                read_time_minutes: post.read_time_minutes,
                image_url: post.display_image(&listing.fallback_images).map(str::to_string),
                matched_field: hit.map(|m| m.matched_field),
                snippet: hit.and_then(|m| m.snippet.clone()),
            }
        })
        .collect();

    Listing {
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        cards,
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
        searching,
        last_updated,
        messages: locale.messages_for(language),
    }
}

/// Resolve one article for `language`.
pub fn build_article(
    posts: &[Post],
    id: &str,
    language: &str,
    listing: &ListingConfig,
) -> Result<ArticleView> {
    let post = find_post(posts, id).ok_or_else(|| AppError::not_found(id))?;
    Ok(ArticleView {
        id: post.id.clone(),
        title: resolve_field(post, Field::Title, language),
        description: resolve_field(post, Field::Description, language),
        content: resolve_field(post, Field::Content, language),
        author: post.author.clone(),
        publication_date: post.publication_date.clone(),
        read_time_minutes: post.read_time_minutes,
        image_url: post.display_image(&listing.fallback_images).map(str::to_string),
        share_url: share_url(&listing.site_url, &post.id),
    })
}

pub fn find_post<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.id == id)
}

/// Owner of the listing state, reading posts from the shared feed.
pub struct BlogController {
    feed: Feed,
    state: ListingState,
    listing: ListingConfig,
    locale: LocaleConfig,
}

impl BlogController {
    pub fn new(config: &Config, feed: Feed) -> Self {
        Self {
            feed,
            state: ListingState::new(config.locale.default_language.clone()),
            listing: config.listing.clone(),
            locale: config.locale.clone(),
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ListingState {
        &mut self.state
    }

    /// Switch language if it is one of the configured languages.
    pub fn select_language(&mut self, language: &str) -> Result<()> {
        if !self.locale.supports(language) {
            return Err(AppError::validation(format!(
                "unsupported language '{language}'"
            )));
        }
        self.state.set_language(language);
        Ok(())
    }

    pub fn messages(&self) -> Messages {
        self.locale.messages_for(self.state.language())
    }

    /// Current listing page.
    pub async fn listing(&self) -> Listing {
        let snapshot = self.feed.snapshot().await;
        build_listing(
            &snapshot.posts,
            &self.state,
            &self.listing,
            &self.locale,
            snapshot.last_updated,
        )
    }

    /// Article page for `id` in the current language.
    pub async fn article(&self, id: &str) -> Result<ArticleView> {
        let posts = self.feed.posts().await;
        build_article(&posts, id, self.state.language(), &self.listing)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn post(id: &str, author: &str, date: &str, content: &str) -> Post {
        Post {
            id: id.into(),
            author: author.into(),
            publication_date: date.into(),
            read_time_minutes: 4,
            title: format!("Title {id}"),
            description: format!("About {id}"),
            content: content.into(),
            image_url: None,
            translations: BTreeMap::new(),
            localized: BTreeMap::new(),
        }
    }

    fn thirteen() -> Vec<Post> {
        (1..=13)
            .map(|i| post(&format!("p{i}"), "Ann", &format!("2024-01-{i:02}"), "body"))
            .collect()
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut state = ListingState::new("en");
        state.set_query("rust");
        state.set_page(3);
        state.set_query("tokio");
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.set_query("tokio");
        assert_eq!(state.page(), 2, "same query keeps the page");
    }

    #[test]
    fn test_order_and_language_reset_page() {
        let mut state = ListingState::new("en");
        state.set_page(4);
        state.set_order(SortOrder::Oldest);
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_language("fr");
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_previous_page_never_below_one() {
        let mut state = ListingState::new("en");
        state.previous_page();
        assert_eq!(state.page(), 1);
        state.next_page();
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_listing_pages() {
        let posts = thirteen();
        let mut state = ListingState::new("en");
        state.set_page(3);
        let listing = build_listing(
            &posts,
            &state,
            &ListingConfig::default(),
            &LocaleConfig::default(),
            None,
        );
        assert_eq!(listing.total_pages, 3);
        assert!(listing.has_previous);
        assert!(!listing.has_next);
        assert_eq!(listing.cards.len(), 1);
        assert_eq!(listing.cards[0].id, "p1");
        assert!(listing.cards[0].image_url.is_some());
        assert!(!listing.searching);
    }

    #[test]
    fn test_listing_search_annotates_cards() {
        let posts = vec![
            post("a", "Ann", "2024-01-01", "nothing here"),
            post("b", "Ben", "2024-02-01", "a long body mentioning serde somewhere"),
        ];
        let mut state = ListingState::new("en");
        state.set_query("serde");
        let listing = build_listing(
            &posts,
            &state,
            &ListingConfig::default(),
            &LocaleConfig::default(),
            None,
        );
        assert!(listing.searching);
        assert_eq!(listing.total_items, 1);
        assert_eq!(listing.cards[0].matched_field, Some(MatchedField::Content));
        assert!(listing.cards[0].snippet.is_some());
    }

    #[test]
    fn test_empty_listing() {
        let state = ListingState::new("en");
        let listing = build_listing(
            &[],
            &state,
            &ListingConfig::default(),
            &LocaleConfig::default(),
            None,
        );
        assert!(listing.is_empty());
        assert_eq!(listing.total_pages, 1);
        assert_eq!(listing.messages.no_results, "No posts found.");
    }

    #[test]
    fn test_article_view() {
        let mut p = post("x", "Ann", "2024-01-01", "Body");
        p.localized.insert("title_fr".into(), "Titre".into());
        let posts = vec![p];

        let article = build_article(&posts, "x", "fr", &ListingConfig::default()).unwrap();
        assert_eq!(article.title, "Titre");
        assert_eq!(article.content, "Body");
        assert_eq!(article.share_url, "https://blog.example.com/post/x");

        assert!(matches!(
            build_article(&posts, "missing", "fr", &ListingConfig::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_controller_rejects_unknown_language() {
        let mut controller = BlogController::new(&Config::default(), Feed::new());
        assert!(controller.select_language("xx").is_err());
        assert!(controller.select_language("fr").is_ok());
        assert_eq!(controller.state().language(), "fr");
        assert!(controller.listing().await.is_empty());
    }
}
