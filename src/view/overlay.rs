use std::fmt::Write;

use super::{pad, DEFAULT_COVER_URL, SCREEN_WIDTH};
use crate::catalog::Volume;

/// Renders the favorites overlay, or nothing while it is hidden.
///
/// Entries are numbered by their position in `favorites`, which is what
/// `remove <n>` refers to.
pub fn render_overlay(visible: bool, favorites: &[Volume]) -> Option<String> {
    if !visible {
        return None;
    }

    let inner = SCREEN_WIDTH - 4;
    let border = format!("+{}+", "-".repeat(SCREEN_WIDTH - 2));
    let mut out = String::new();

    let mut body = Vec::new();
    for (i, favorite) in favorites.iter().enumerate() {
        if !favorite.has_display_metadata() {
            continue;
        }
        let position = i + 1;
        let action = format!("[rm {position}]");
        let label = format!("{position:>2}. ");
        let title = favorite.title.as_deref().unwrap_or("Unknown Title");
        let title_width = inner.saturating_sub(label.len() + action.len() + 1);
        let cover = favorite.cover_url.as_deref().unwrap_or(DEFAULT_COVER_URL);
        body.push(format!("{label}{} {action}", pad(title, title_width)));
        body.push(format!("{}cover: {cover}", " ".repeat(label.len())));
    }

    let _ = writeln!(out, "{border}");
    line(&mut out, "Favorites", inner);
    let _ = writeln!(out, "{border}");
    if body.is_empty() {
        line(&mut out, "No favorites yet.", inner);
    }
    for entry in &body {
        line(&mut out, entry, inner);
    }
    line(&mut out, "", inner);
    line(&mut out, "[close] Close", inner);
    let _ = writeln!(out, "{border}");

    Some(out)
}

fn line(out: &mut String, text: &str, width: usize) {
    let _ = writeln!(out, "| {} |", pad(text, width));
}
