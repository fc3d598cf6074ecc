// src/services/share.rs

//! Share actions: native share sheet first, clipboard copy as fallback.

use std::io::Write;

use crate::error::{AppError, Result};

/// Public link to an article.
pub fn share_url(site_url: &str, post_id: &str) -> String {
    format!("{}/post/{}", site_url.trim_end_matches('/'), post_id)
}

/// Operating-system share sheet.
pub trait ShareSheet {
    /// Whether a share sheet exists on this host at all.
    fn is_available(&self) -> bool;

    fn share(&self, title: &str, url: &str) -> Result<()>;
}

/// Clipboard access.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<()>;
}

/// How a share request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share sheet took the link
    Shared,
    /// The link was copied; `message` is the transient confirmation
    Copied { message: String },
    /// Neither path worked
    Failed { reason: String },
}

/// Best-effort share of `url`.
///
/// Tries the share sheet when available and falls back to copying the
/// link, returning `copied_message` for display.
pub fn share_post(
    sheet: &dyn ShareSheet,
    clipboard: &dyn Clipboard,
    title: &str,
    url: &str,
    copied_message: &str,
) -> ShareOutcome {
    if sheet.is_available() {
        match sheet.share(title, url) {
            Ok(()) => return ShareOutcome::Shared,
            Err(e) => log::debug!("Share sheet failed, falling back to clipboard: {}", e),
        }
    }

    match clipboard.copy(url) {
        Ok(()) => ShareOutcome::Copied {
            message: copied_message.to_string(),
        },
        Err(e) => {
            log::warn!("Could not copy link {}: {}", url, e);
            ShareOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Host without a share sheet.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _title: &str, _url: &str) -> Result<()> {
        Err(AppError::config("no share sheet on this host"))
    }
}

/// "Clipboard" that writes the text to standard output, for terminals.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}
