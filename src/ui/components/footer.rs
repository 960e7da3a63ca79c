//! Footer component renderer.

use crate::ui::helpers::{display_width, pad_to, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, NoticeInfo, ScrollInfo};

/// Renders the dimmed keybinding hints centered at `row`.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text = truncate_to_width(&footer.keybindings, cols);
    let text_width = display_width(&help_text);
    let padding = cols.saturating_sub(text_width) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(padding));
    print!("{help_text}");
    pad_to(padding + text_width, cols);
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the notice line, with a scroll position hint on the right when the
/// page overflows.
pub fn render_status(row: usize, notice: Option<&NoticeInfo>, scroll: &ScrollInfo, theme: &Theme, cols: usize) {
    let hint = if scroll.can_scroll() {
        format!(
            "{}-{}/{} ",
            scroll.offset + 1,
            (scroll.offset + scroll.visible).min(scroll.total),
            scroll.total
        )
    } else {
        String::new()
    };
    let hint_width = display_width(&hint);

    position_cursor(row, 1);
    let mut used = 0;
    if let Some(notice) = notice {
        let color = if notice.is_error {
            &theme.colors.error_fg
        } else {
            &theme.colors.success_fg
        };
        print!("{}", Theme::fg(color));
        let text = truncate_to_width(&format!(" {}", notice.text), cols.saturating_sub(hint_width));
        used = display_width(&text);
        print!("{text}{}", Theme::reset());
    }
    pad_to(used + hint_width, cols);
    print!("{}{hint}{}", Theme::fg(&theme.colors.text_dim), Theme::reset());
}
