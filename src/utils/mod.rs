//! Utility functions and helpers.

pub mod date;
pub mod http;

/// Estimated reading time in minutes at 200 words per minute; at least 1.
pub fn estimate_read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    u32::try_from(words.div_ceil(200)).unwrap_or(u32::MAX).max(1)
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
