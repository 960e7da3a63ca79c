//! Shared rendering utilities.
//!
//! Cursor positioning, width-aware truncation and fuzzy match highlighting.
//! Widths are terminal display columns (`unicode-width`), so wide glyphs and
//! combining marks line up.

use crate::ui::theme::Theme;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Moves the cursor to a 1-indexed `row`/`col`.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Display width of `text`.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cuts `text` to at most `max` display columns, ending with `…` when cut.
///
/// # Example
///
/// ```rust
/// use hypothesizer::ui::helpers::truncate_to_width;
///
/// assert_eq!(truncate_to_width("transformers", 6), "trans…");
/// assert_eq!(truncate_to_width("bert", 6), "bert");
/// ```
#[must_use]
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if display_width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Prints `text` cut to `max` columns and returns the columns used.
pub fn print_clipped(text: &str, max: usize) -> usize {
    let clipped = truncate_to_width(text, max);
    print!("{clipped}");
    display_width(&clipped)
}

/// Pads from `used` columns to `cols` with spaces.
pub fn pad_to(used: usize, cols: usize) {
    print!("{}", " ".repeat(cols.saturating_sub(used)));
}

/// Prints `text` (clipped to `max` columns) with `ranges` highlighted.
///
/// Ranges are `(start, end)` character indices, end exclusive. On the cursor
/// row the highlight is skipped so the selection colors stay intact. Returns
/// the columns used.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
    max: usize,
) -> usize {
    let clipped = truncate_to_width(text, max);
    let width = display_width(&clipped);

    if ranges.is_empty() || is_selected {
        print!("{clipped}");
        return width;
    }

    let chars: Vec<char> = clipped.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        let normal: String = chars[current_pos..start].iter().collect();
        print!("{normal}");

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted: String = chars[start..end].iter().collect();
        print!("{highlighted}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    let remaining: String = chars[current_pos..].iter().collect();
    print!("{remaining}");
    width
}
