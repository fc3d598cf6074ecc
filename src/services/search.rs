// src/services/search.rs

//! Case-insensitive substring search over localized posts.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Field, MatchedField, Post, SearchMatch};
use crate::services::localize::resolve_str;
use crate::utils::normalize_whitespace;

/// Grapheme clusters kept on each side of a content hit.
pub const SNIPPET_RADIUS: usize = 40;

const ELLIPSIS: &str = "...";

/// Search `posts` for `query` in `language`.
///
/// Fields are tested in priority order (author, title, description,
/// content) and the first hit is reported. A blank query yields no matches.
/// Output keeps input order.
pub fn search<'a>(posts: &'a [Post], query: &str, language: &str) -> Vec<SearchMatch<'a>> {
    let needle = fold_case(query.trim());
    if needle.is_empty() {
        return Vec::new();
    }
    posts
        .iter()
        .filter_map(|post| match_post(post, &needle, language))
        .collect()
}

/// Posts feeding sort and pagination: everything for a blank query, the
/// matched posts otherwise.
pub fn working_set<'a>(posts: &'a [Post], query: &str, language: &str) -> Vec<&'a Post> {
    if query.trim().is_empty() {
        posts.iter().collect()
    } else {
        search(posts, query, language)
            .into_iter()
            .map(|m| m.post)
            .collect()
    }
}

fn match_post<'a>(post: &'a Post, needle: &str, language: &str) -> Option<SearchMatch<'a>> {
    let title = resolve_str(post, Field::Title, language);
    let description = resolve_str(post, Field::Description, language);
    let content = resolve_str(post, Field::Content, language);

    let candidates = [
        (MatchedField::Author, post.author.as_str()),
        (MatchedField::Title, title),
        (MatchedField::Description, description),
        (MatchedField::Content, content),
    ];
    let (matched_field, _) = candidates
        .into_iter()
        .find(|(_, text)| fold_case(text).contains(needle))?;

    let snippet = match matched_field {
        MatchedField::Content => excerpt(content, needle, SNIPPET_RADIUS),
        _ => None,
    };

    Some(SearchMatch {
        post,
        matched_field,
        title: title.to_string(),
        author: post.author.clone(),
        snippet,
    })
}

/// Context-free lowercasing, one `char` at a time.
///
/// `str::to_lowercase` maps a word-final `Σ` to `ς`, which would make the
/// folded text depend on where it was cut. Folding per char (and treating
/// `ς` as `σ`) gives the same result for a whole field and for each of its
/// graphemes.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

/// Window of `radius` grapheme clusters around the first occurrence of
/// `needle` (already folded with [`fold_case`]), whitespace collapsed, with ellipses where
/// the window was cut.
pub fn excerpt(text: &str, needle: &str, radius: usize) -> Option<String> {
    let graphemes: Vec<&str> = text.graphemes(true).collect();

    // Lowercasing may change byte lengths, so keep the start offset of
    // every grapheme inside the lowered text.
    let mut lowered = String::with_capacity(text.len());
    let mut starts = Vec::with_capacity(graphemes.len());
    for g in &graphemes {
        starts.push(lowered.len());
        lowered.push_str(&fold_case(g));
    }

    let hit_byte = lowered.find(needle)?;
    let hit = starts.partition_point(|&s| s <= hit_byte).saturating_sub(1);
    let hit_end = starts.partition_point(|&s| s < hit_byte + needle.len().max(1));

    let start = hit.saturating_sub(radius);
    let end = (hit_end + radius).min(graphemes.len());

    let window = graphemes[start..end].concat();
    let collapsed = normalize_whitespace(&window);

    let mut snippet = String::with_capacity(collapsed.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&collapsed);
    if end < graphemes.len() {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}
