//! Plain-text rendering of the application state.
//!
//! Everything here is a pure function of its inputs; the shell decides when
//! to print.

use std::fmt::Write;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::AppState;

mod overlay;
mod row;

pub use overlay::render_overlay;
pub use row::render_row;

/// Shown in place of a missing cover image.
pub const DEFAULT_COVER_URL: &str =
    "https://islandpress.org/sites/default/files/default_book_cover_2015.jpg";

/// Total width of rendered lines, in terminal columns.
pub const SCREEN_WIDTH: usize = 72;

const TITLE: &str = "Book Library";

/// Renders the navigation bar, the result list and the "load more" control.
pub fn render_screen(state: &AppState) -> String {
    let mut out = String::new();
    let heart = format!("\u{2665} {}", state.favorites().len());
    let gap = SCREEN_WIDTH.saturating_sub(TITLE.width() + heart.width());
    let _ = writeln!(out, "{TITLE}{}{heart}", " ".repeat(gap));
    let _ = writeln!(out, "{}", "=".repeat(SCREEN_WIDTH));

    if state.query().is_empty() {
        let _ = writeln!(out, "Search for books...");
        return out;
    }

    let _ = writeln!(
        out,
        "Results for \"{}\": {} of {} (page {})",
        truncate(state.query(), SCREEN_WIDTH / 2),
        state.results().len(),
        state.total_items(),
        state.page()
    );
    if state.results().is_empty() {
        let _ = writeln!(out, "No books found.");
        return out;
    }

    for (i, volume) in state.results().iter().enumerate() {
        if let Some(row) = render_row(i + 1, volume) {
            out.push_str(&row);
        }
    }

    if (state.results().len() as u64) < state.total_items() {
        let _ = writeln!(out, "[more] Load More");
    }
    out
}

/// Cuts `text` to at most `width` columns, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// Pads `text` with spaces to exactly `width` columns, truncating if needed.
pub(crate) fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}
