//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Centered title bar
//! - [`page`]: One workflow page row (sections, inputs, papers, buttons, markdown)
//! - [`footer`]: Notice/scroll status line and keybinding hints
//! - [`overlay`]: Analysis viewer frame
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Page rows]
//! [Notice / scroll position]
//! [Border]
//! [Footer]
//! ```
//!
//! The viewer, when open, is drawn last over the page rows.

mod footer;
mod header;
mod overlay;
mod page;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use footer::{render_footer, render_status};
use header::render_header;
use overlay::render_overlay;
use page::render_page_line;

/// Renders a horizontal border line at `row` and returns the next free row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full workflow screen.
pub fn render_workflow(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    for line in &vm.page {
        render_page_line(current_row, line, theme, cols);
        current_row += 1;
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);

    render_status(status_row, vm.notice.as_ref(), &vm.page_scroll, theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);

    if let Some(overlay) = &vm.overlay {
        render_overlay(overlay, theme);
    }
}
