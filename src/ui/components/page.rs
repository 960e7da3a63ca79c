//! Workflow page row renderer.
//!
//! Every [`PageLine`] occupies exactly one terminal row. Rows are indented by
//! a fixed margin and padded to the full width so stale content from the
//! previous frame never shows through.

use crate::ui::helpers::{self, pad_to, position_cursor, print_clipped};
use crate::ui::markdown::{LineStyle, StyledLine};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{ButtonState, InputInfo, PageLine, PaperRow, RowMarker, Tone};

const MARGIN: usize = 2;

/// Renders one page row at `row`.
pub fn render_page_line(row: usize, line: &PageLine, theme: &Theme, cols: usize) {
    position_cursor(row, 1);
    print!("{}", " ".repeat(MARGIN));
    let avail = cols.saturating_sub(MARGIN * 2);

    let used = match line {
        PageLine::Blank => 0,
        PageLine::SectionTitle(title) => {
            print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.section_fg));
            print_clipped(title, avail)
        }
        PageLine::Subheading(text) => {
            print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal));
            print_clipped(text, avail)
        }
        PageLine::Text { text, tone } => {
            let color = match tone {
                Tone::Dim => &theme.colors.text_dim,
                Tone::Error => &theme.colors.error_fg,
            };
            print!("{}", Theme::fg(color));
            print_clipped(text, avail)
        }
        PageLine::Input(input) => render_input(input, theme, avail),
        PageLine::Paper(paper) => render_paper(paper, theme, avail),
        PageLine::Caption { text, is_cursor } => {
            if *is_cursor {
                print!("{}", Theme::fg(&theme.colors.selection_fg));
                print!("{}", Theme::bg(&theme.colors.selection_bg));
            } else {
                print!("{}", Theme::fg(&theme.colors.text_dim));
            }
            print!("  ");
            let used = 2 + print_clipped(text, avail.saturating_sub(2));
            pad_to(used, avail);
            avail
        }
        PageLine::Button { label, state } => render_button(label, *state, theme, avail),
        PageLine::Markdown(styled) => render_markdown_line(styled, theme, avail),
    };

    print!("{}", Theme::reset());
    pad_to(MARGIN + used, cols);
}

fn render_input(input: &InputInfo, theme: &Theme, avail: usize) -> usize {
    let border = if input.focused {
        &theme.colors.input_border
    } else {
        &theme.colors.border
    };

    print!("{}", Theme::fg(&theme.colors.text_normal));
    let label = format!("{}: ", input.label);
    let mut used = print_clipped(&label, avail);

    print!("{}[{}", Theme::fg(border), Theme::reset());
    used += 1;
    let inner = avail.saturating_sub(used + 1);

    let text_used = if input.value.is_empty() {
        print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
        print_clipped(&input.placeholder, inner)
    } else {
        // Keep the tail visible while typing past the field width.
        print!("{}", Theme::fg(&theme.colors.text_normal));
        let value = tail_to_width(&input.value, inner.saturating_sub(1));
        print_clipped(&value, inner)
    };
    print!("{}", Theme::reset());

    let mut field_used = text_used;
    if input.focused && field_used < inner {
        print!("{}▏{}", Theme::fg(&theme.colors.input_border), Theme::reset());
        field_used += 1;
    }
    pad_to(field_used, inner);
    print!("{}]", Theme::fg(border));
    used + inner + 1
}

fn tail_to_width(text: &str, max: usize) -> String {
    let mut out: Vec<char> = Vec::new();
    let mut used = 0;
    for c in text.chars().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.into_iter().rev().collect()
}

fn render_paper(paper: &PaperRow, theme: &Theme, avail: usize) -> usize {
    if paper.is_cursor {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    }

    let marker_color = if paper.is_disabled {
        &theme.colors.text_dim
    } else {
        match paper.marker {
            RowMarker::Remove => &theme.colors.error_fg,
            RowMarker::Add | RowMarker::Added => &theme.colors.success_fg,
        }
    };
    if !paper.is_cursor {
        print!("{}", Theme::fg(marker_color));
    }
    print!("{} ", paper.marker.glyph());

    if paper.is_cursor {
        print!("{}", Theme::bold());
    } else if paper.is_disabled {
        print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }

    let used = 2 + helpers::render_highlighted_text(
        &paper.title,
        &paper.highlight_ranges,
        theme,
        paper.is_cursor || paper.is_disabled,
        avail.saturating_sub(2),
    );

    if paper.is_cursor {
        pad_to(used, avail);
        avail
    } else {
        used
    }
}

fn render_button(label: &str, state: ButtonState, theme: &Theme, avail: usize) -> usize {
    let (glyph, style) = match state {
        ButtonState::Enabled => ("💡", format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.accent))),
        ButtonState::Disabled => ("💡", format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim))),
        ButtonState::Busy => ("⟳", Theme::fg(&theme.colors.text_dim)),
    };
    print!("{style}");
    print_clipped(&format!("[ {glyph} {label} ]"), avail)
}

fn render_markdown_line(line: &StyledLine, theme: &Theme, avail: usize) -> usize {
    match line.style {
        LineStyle::Heading(_) => print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.heading_fg)),
        LineStyle::Code => print!("{}", Theme::fg(&theme.colors.code_fg)),
        LineStyle::Quote | LineStyle::Rule => print!("{}", Theme::fg(&theme.colors.text_dim)),
        LineStyle::Paragraph | LineStyle::ListItem | LineStyle::Blank => {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
    }
    print_clipped(&line.text, avail)
}

/// Prints a markdown line for the viewer overlay; shares styling with the page.
pub fn print_markdown_line(line: &StyledLine, theme: &Theme, avail: usize) -> usize {
    let used = render_markdown_line(line, theme, avail);
    print!("{}", Theme::reset());
    used
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_last_columns() {
        assert_eq!(tail_to_width("deep learning", 5), "rning");
        assert_eq!(tail_to_width("ab", 5), "ab");
        assert_eq!(tail_to_width("日本語", 4), "本語");
    }
}
