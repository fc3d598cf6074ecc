// src/services/paginate.rs

//! Date ordering and fixed-size pagination of the working set.

use crate::models::{Page, Post, SortOrder};
use crate::utils::date::sort_key;

/// Stable sort by parsed publication date.
pub fn sort_posts<'a>(posts: Vec<&'a Post>, order: SortOrder) -> Vec<&'a Post> {
    let mut keyed: Vec<(i64, &Post)> = posts
        .into_iter()
        .map(|post| (sort_key(&post.publication_date), post))
        .collect();

    match order {
        SortOrder::Newest => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        SortOrder::Oldest => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    keyed.into_iter().map(|(_, post)| post).collect()
}

/// Number of pages for `count` items; never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice one 1-indexed page out of `items`, clamping `page` into range.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let items_on_page = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items: items_on_page,
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Sort the working set and return the requested page.
pub fn sort_and_page<'a>(
    posts: Vec<&'a Post>,
    order: SortOrder,
    page: usize,
    page_size: usize,
) -> Page<&'a Post> {
    let sorted = sort_posts(posts, order);
    paginate(&sorted, page, page_size)
}
