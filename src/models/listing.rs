//! Listing-related types: sort order, search matches and pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Post;

/// Ordering of the working set by publication date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(AppError::validation(format!(
                "unknown sort order '{other}' (expected newest or oldest)"
            ))),
        }
    }
}

/// Which field caused a search hit, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Author,
    Title,
    Description,
    Content,
}

impl MatchedField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchedField::Author => "author",
            MatchedField::Title => "title",
            MatchedField::Description => "description",
            MatchedField::Content => "content",
        }
    }
}

impl fmt::Display for MatchedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post that matched a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch<'a> {
    pub post: &'a Post,
    pub matched_field: MatchedField,
    /// Title resolved in the search language
    pub title: String,
    pub author: String,
    /// Excerpt around the hit, only for content-only matches
    pub snippet: Option<String>,
}

/// One page of a sorted working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page actually served (after clamping)
    pub page: usize,
    /// Always >= 1
    pub total_pages: usize,
    /// Size of the working set before slicing
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Whether the working set was empty; render "no results" instead.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!(" Oldest ".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_page_navigation() {
        let page: Page<u8> = Page {
            items: vec![1],
            page: 2,
            total_pages: 3,
            total_items: 13,
        };
        assert!(page.has_next());
        assert!(page.has_previous());
        assert!(!page.is_empty());
    }
}
