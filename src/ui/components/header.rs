//! Header component renderer.

use crate::ui::helpers::{display_width, pad_to, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title bar centered at `row` and returns the next free row.
///
/// Odd leftover columns go to the right of the title.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate_to_width(&header.title, cols);
    let title_width = display_width(&title);
    let padding = cols.saturating_sub(title_width) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{title}");
    pad_to(padding + title_width, cols);

    print!("{}", Theme::reset());
    row + 1
}
