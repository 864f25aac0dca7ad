use std::fmt::Write;

use super::{pad, truncate, DEFAULT_COVER_URL, SCREEN_WIDTH};
use crate::catalog::Volume;

const INDENT: &str = "    ";

/// Renders one search result. Returns `None` when the volume has nothing to
/// show.
pub fn render_row(position: usize, volume: &Volume) -> Option<String> {
    if !volume.has_display_metadata() {
        return None;
    }

    let title = volume.title.as_deref().unwrap_or("No Title");
    let authors = if volume.authors.is_empty() {
        "Unknown Author".to_string()
    } else {
        volume.authors.join(", ")
    };
    let cover = volume.cover_url.as_deref().unwrap_or(DEFAULT_COVER_URL);

    let mut actions = format!("[fav {position}]");
    if volume.info_link.is_some() {
        let _ = write!(actions, " [open {position}]");
    }

    let label = format!("{position:>2}. ");
    let title_width = SCREEN_WIDTH.saturating_sub(label.len() + actions.len() + 1);

    let mut out = String::new();
    let _ = writeln!(out, "{label}{} {actions}", pad(title, title_width));
    let _ = writeln!(out, "{INDENT}{}", truncate(&authors, SCREEN_WIDTH - INDENT.len()));
    let _ = writeln!(out, "{INDENT}cover: {cover}");
    Some(out)
}
