//! Analysis viewer overlay.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ 📖 Literature Survey                     │
//! │ Deep Learning Ethics                     │
//! ├──────────────────────────────────────────┤
//! │ body (scrolls independently)             │
//! ├──────────────────────────────────────────┤
//! │ [e] Export survey-deep-….md  [q] Close   │
//! └──────────────────────────────────────────┘
//! ```

use super::page::print_markdown_line;
use crate::ui::helpers::{display_width, pad_to, position_cursor, print_clipped};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{AnalysisOverlay, Frame};

/// Draws the viewer inside `overlay.frame`.
pub fn render_overlay(overlay: &AnalysisOverlay, theme: &Theme) {
    let Frame { row, col, width, height } = overlay.frame;
    let inner = width.saturating_sub(2);
    let content = inner.saturating_sub(2);
    let border = Theme::fg(&theme.colors.input_border);

    let edge = |r: usize, left: &str, right: &str| {
        position_cursor(r, col);
        print!("{border}{left}{}{right}{}", "─".repeat(inner), Theme::reset());
    };
    let open_row = |r: usize| {
        position_cursor(r, col);
        print!("{border}│{} ", Theme::reset());
    };
    let close_row = |used: usize| {
        print!("{}", Theme::reset());
        pad_to(used, content);
        print!(" {border}│{}", Theme::reset());
    };

    edge(row, "┌", "┐");

    open_row(row + 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.heading_fg));
    close_row(print_clipped(&format!("{} {}", overlay.icon, overlay.heading), content));

    open_row(row + 2);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    close_row(print_clipped(&overlay.title, content));

    edge(row + 3, "├", "┤");

    let body_top = row + 4;
    for i in 0..overlay.scroll.visible {
        open_row(body_top + i);
        let used = overlay
            .body
            .get(i)
            .map_or(0, |line| print_markdown_line(line, theme, content));
        close_row(used);
    }

    let footer_row = body_top + overlay.scroll.visible;
    edge(footer_row, "├", "┤");

    open_row(footer_row + 1);
    let position = if overlay.scroll.can_scroll() {
        format!(
            "{}/{}",
            (overlay.scroll.offset + overlay.scroll.visible).min(overlay.scroll.total),
            overlay.scroll.total
        )
    } else {
        String::new()
    };
    let position_width = display_width(&position);
    print!("{}", Theme::fg(&theme.colors.accent));
    let actions = format!("[e] Export {}  [q] Close", overlay.export_filename);
    let used = print_clipped(&actions, content.saturating_sub(position_width + 1));
    print!("{}", Theme::reset());
    pad_to(used + position_width, content);
    print!("{}{position}", Theme::fg(&theme.colors.text_dim));
    close_row(content);

    edge(row + height.saturating_sub(1), "└", "┘");
}
